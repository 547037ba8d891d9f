//! In-memory prayer store for tests and local development

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{PrayerStore, RequestFilter};
use crate::model::{advance, Comment, ObjectId, Prayer, PrayerRequest};
use crate::types::{IntercedeError, Result};

/// Process-local store with the same observable semantics as MongoDB
///
/// Each method takes its lock once, so every call is atomic on its own and
/// read-modify-write sequences across calls can interleave exactly as they
/// would against a real server. [`set_available`](Self::set_available) makes
/// every operation fail with `Unavailable`.
pub struct InMemoryPrayerStore {
    requests: RwLock<BTreeMap<ObjectId, PrayerRequest>>,
    comments: RwLock<Vec<Comment>>,
    prayers: RwLock<Vec<Prayer>>,
    available: AtomicBool,
}

impl InMemoryPrayerStore {
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(BTreeMap::new()),
            comments: RwLock::new(Vec::new()),
            prayers: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the storage connection
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(IntercedeError::Unavailable(
                "in-memory store marked unavailable".into(),
            ))
        }
    }
}

impl Default for InMemoryPrayerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrayerStore for InMemoryPrayerStore {
    async fn insert_request(&self, request: &PrayerRequest) -> Result<()> {
        self.check_available()?;
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id) {
            return Err(IntercedeError::Internal(format!(
                "duplicate key: prayer request {}",
                request.id
            )));
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_request(&self, id: ObjectId) -> Result<Option<PrayerRequest>> {
        self.check_available()?;
        Ok(self.requests.read().await.get(&id).cloned())
    }

    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<PrayerRequest>> {
        self.check_available()?;
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<PrayerRequest>> {
        self.check_available()?;
        let mut all: Vec<PrayerRequest> = self.requests.read().await.values().cloned().collect();
        // Stable: equal timestamps keep ascending id order
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(all)
    }

    async fn replace_request(&self, request: &PrayerRequest) -> Result<bool> {
        self.check_available()?;
        match self.requests.write().await.get_mut(&request.id) {
            Some(stored) => {
                *stored = request.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_request(&self, id: ObjectId) -> Result<bool> {
        self.check_available()?;
        Ok(self.requests.write().await.remove(&id).is_some())
    }

    async fn increment_pray_count(&self, id: ObjectId, now: DateTime<Utc>) -> Result<bool> {
        self.check_available()?;
        match self.requests.write().await.get_mut(&id) {
            Some(stored) => {
                stored.pray_count += 1;
                stored.updated_at = advance(stored.updated_at, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_requests(&self, filter: &RequestFilter) -> Result<u64> {
        self.check_available()?;
        let requests = self.requests.read().await;
        Ok(requests.values().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn sum_pray_count(&self) -> Result<u64> {
        self.check_available()?;
        Ok(self.requests.read().await.values().map(|r| r.pray_count).sum())
    }

    async fn count_by_category(&self) -> Result<HashMap<String, u64>> {
        self.check_available()?;
        let mut counts = HashMap::new();
        for request in self.requests.read().await.values() {
            *counts.entry(request.category.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        self.check_available()?;
        self.comments.write().await.push(comment.clone());
        Ok(())
    }

    async fn find_comments(&self, prayer_request_id: ObjectId) -> Result<Vec<Comment>> {
        self.check_available()?;
        Ok(self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| c.prayer_request_id == prayer_request_id)
            .cloned()
            .collect())
    }

    async fn insert_prayer(&self, prayer: &Prayer) -> Result<()> {
        self.check_available()?;
        self.prayers.write().await.push(prayer.clone());
        Ok(())
    }

    async fn find_prayers(&self, prayer_request_id: ObjectId) -> Result<Vec<Prayer>> {
        self.check_available()?;
        Ok(self
            .prayers
            .read()
            .await
            .iter()
            .filter(|p| p.prayer_request_id == prayer_request_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{now, CreatePrayerRequestInput};
    use crate::types::ErrorKind;
    use chrono::Duration;

    fn request_at(title: &str, created_at: DateTime<Utc>) -> PrayerRequest {
        PrayerRequest::from_input(CreatePrayerRequestInput::new(title, "d"), created_at)
    }

    #[tokio::test]
    async fn test_find_recent_orders_newest_first() {
        let store = InMemoryPrayerStore::new();
        let base = now();
        for (i, title) in ["old", "mid", "new"].iter().enumerate() {
            store
                .insert_request(&request_at(title, base + Duration::seconds(i as i64)))
                .await
                .unwrap();
        }

        let recent = store.find_recent(2).await.unwrap();
        let titles: Vec<_> = recent.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn test_replace_and_delete_report_missing_ids() {
        let store = InMemoryPrayerStore::new();
        let req = request_at("a", now());
        assert!(!store.replace_request(&req).await.unwrap());
        assert!(!store.delete_request(req.id).await.unwrap());
        assert!(!store.increment_pray_count(req.id, now()).await.unwrap());

        store.insert_request(&req).await.unwrap();
        assert!(store.replace_request(&req).await.unwrap());
        assert!(store.delete_request(req.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = InMemoryPrayerStore::new();
        let req = request_at("a", now());
        store.insert_request(&req).await.unwrap();
        let err = store.insert_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let store = InMemoryPrayerStore::new();
        store.set_available(false);

        let err = store.find_requests(&RequestFilter::All).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert!(store.ping().await.is_err());

        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_count_by_category_includes_empty() {
        let store = InMemoryPrayerStore::new();
        let mut a = request_at("a", now());
        a.category = "health".into();
        store.insert_request(&a).await.unwrap();
        store.insert_request(&request_at("b", now())).await.unwrap();

        let counts = store.count_by_category().await.unwrap();
        assert_eq!(counts.get("health"), Some(&1));
        assert_eq!(counts.get(""), Some(&1));
    }
}
