//! Write operations
//!
//! `update` is a read-modify-replace with no version check: a concurrent
//! writer between the read and the replace is silently overwritten.
//! `increment_pray_count` is a single atomic store update and never loses
//! an increment.

use std::sync::Arc;

use tracing::{debug, info};

use crate::model::{
    advance, now, parse_id, Comment, CreateCommentInput, CreatePrayerRequestInput, ObjectId,
    Prayer, PrayerRequest, PrayerRequestPatch, RecordPrayerInput,
};
use crate::store::PrayerStore;
use crate::types::{IntercedeError, Result};

#[derive(Clone)]
pub struct MutationEngine {
    store: Arc<dyn PrayerStore>,
}

impl MutationEngine {
    pub fn new(store: Arc<dyn PrayerStore>) -> Self {
        Self { store }
    }

    /// Validate, assign a fresh id and timestamps, and persist
    pub async fn create(&self, input: CreatePrayerRequestInput) -> Result<PrayerRequest> {
        input.validate()?;
        let request = PrayerRequest::from_input(input, now());
        self.store.insert_request(&request).await?;
        info!("Created prayer request {}", request.id);
        Ok(request)
    }

    /// Merge the present fields of `patch` into the stored request
    ///
    /// `updated_at` is refreshed even when the patch is empty, and always
    /// moves strictly forward.
    pub async fn update(&self, id: &str, patch: PrayerRequestPatch) -> Result<PrayerRequest> {
        let oid = parse_id(id)?;
        patch.validate()?;

        let mut request = self
            .store
            .find_request(oid)
            .await?
            .ok_or_else(|| IntercedeError::request_not_found(oid))?;

        patch.apply_to(&mut request);
        request.updated_at = advance(request.updated_at, now());

        // Deleted between the read and the replace
        if !self.store.replace_request(&request).await? {
            return Err(IntercedeError::request_not_found(oid));
        }

        debug!("Updated prayer request {}", oid);
        Ok(request)
    }

    /// Remove the request; its comments and prayers stay behind
    pub async fn delete(&self, id: &str) -> Result<()> {
        let oid = parse_id(id)?;
        if !self.store.delete_request(oid).await? {
            return Err(IntercedeError::request_not_found(oid));
        }
        info!("Deleted prayer request {}", oid);
        Ok(())
    }

    pub async fn increment_pray_count(&self, id: &str) -> Result<()> {
        let oid = parse_id(id)?;
        if !self.store.increment_pray_count(oid, now()).await? {
            return Err(IntercedeError::request_not_found(oid));
        }
        debug!("Incremented pray count for {}", oid);
        Ok(())
    }

    /// Attach a comment to an existing request
    pub async fn add_comment(&self, prayer_id: &str, input: CreateCommentInput) -> Result<Comment> {
        let oid = parse_id(prayer_id)?;
        input.validate()?;
        self.require_request(oid).await?;

        let comment = Comment::from_input(oid, input, now());
        self.store.insert_comment(&comment).await?;
        debug!("Added comment {} to {}", comment.id, oid);
        Ok(comment)
    }

    /// Record that someone prayed, then bump the request's counter
    ///
    /// The record and the increment are two writes; if the request is deleted
    /// in between, the record is kept and `NotFound` is returned.
    pub async fn record_prayer(&self, request_id: &str, input: RecordPrayerInput) -> Result<Prayer> {
        let oid = parse_id(request_id)?;
        self.require_request(oid).await?;

        let prayer = Prayer::from_input(oid, input, now());
        self.store.insert_prayer(&prayer).await?;
        if !self.store.increment_pray_count(oid, prayer.created_at).await? {
            return Err(IntercedeError::request_not_found(oid));
        }
        debug!("Recorded prayer {} for {}", prayer.id, oid);
        Ok(prayer)
    }

    async fn require_request(&self, id: ObjectId) -> Result<()> {
        match self.store.find_request(id).await? {
            Some(_) => Ok(()),
            None => Err(IntercedeError::request_not_found(id)),
        }
    }
}
