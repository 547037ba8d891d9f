//! Read-only operations over prayer requests, comments and prayers

use std::sync::Arc;

use tracing::debug;

use crate::model::{parse_id, Comment, Prayer, PrayerRequest, PrayerStats, Priority};
use crate::store::{PrayerStore, RequestFilter};
use crate::types::{IntercedeError, Result};

use super::DEFAULT_RECENT_LIMIT;

#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn PrayerStore>,
    default_recent_limit: u64,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn PrayerStore>) -> Self {
        Self {
            store,
            default_recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Override the `list_recent` fallback size; zero keeps the current one
    pub fn with_default_recent_limit(mut self, limit: u64) -> Self {
        if limit > 0 {
            self.default_recent_limit = limit;
        }
        self
    }

    /// Fetch one request
    ///
    /// A malformed id is `InvalidArgument`; a well-formed id with no document
    /// is `NotFound`.
    pub async fn get_by_id(&self, id: &str) -> Result<PrayerRequest> {
        let oid = parse_id(id)?;
        self.store
            .find_request(oid)
            .await?
            .ok_or_else(|| IntercedeError::request_not_found(oid))
    }

    /// Every request, in storage order
    pub async fn list_all(&self) -> Result<Vec<PrayerRequest>> {
        self.store.find_requests(&RequestFilter::All).await
    }

    /// Case-insensitive substring over title and description, or exact tag
    ///
    /// The empty string matches every request; rejecting it is up to callers.
    pub async fn search(&self, query: &str) -> Result<Vec<PrayerRequest>> {
        let results = self
            .store
            .find_requests(&RequestFilter::Text(query.to_string()))
            .await?;
        debug!("Search '{}' matched {} request(s)", query, results.len());
        Ok(results)
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<PrayerRequest>> {
        self.store
            .find_requests(&RequestFilter::Category(category.to_string()))
            .await
    }

    /// Newest first; a missing or non-positive limit falls back to the default
    pub async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<PrayerRequest>> {
        let limit = match limit {
            Some(n) if n > 0 => n as u64,
            _ => self.default_recent_limit,
        };
        self.store.find_recent(limit).await
    }

    /// Roll up the collection
    ///
    /// Each figure is its own store read, so concurrent writes can leave the
    /// figures mutually inconsistent. `recent_activity` is always empty.
    pub async fn compute_stats(&self) -> Result<PrayerStats> {
        let total_prayers = self.store.count_requests(&RequestFilter::All).await?;
        let answered_prayers = self
            .store
            .count_requests(&RequestFilter::Answered(true))
            .await?;
        let urgent_prayers = self
            .store
            .count_requests(&RequestFilter::Priority(Priority::Urgent))
            .await?;
        let total_pray_count = self.store.sum_pray_count().await?;
        let categories_count = self.store.count_by_category().await?;

        Ok(PrayerStats {
            total_prayers,
            total_pray_count,
            answered_prayers,
            urgent_prayers,
            categories_count,
            recent_activity: Vec::new(),
        })
    }

    /// Comments referencing the request; the request itself need not exist
    pub async fn list_comments_by_prayer_id(&self, prayer_id: &str) -> Result<Vec<Comment>> {
        let oid = parse_id(prayer_id)?;
        self.store.find_comments(oid).await
    }

    /// Prayer records referencing the request; the request itself need not exist
    pub async fn list_prayers_by_request_id(&self, request_id: &str) -> Result<Vec<Prayer>> {
        let oid = parse_id(request_id)?;
        self.store.find_prayers(oid).await
    }
}
