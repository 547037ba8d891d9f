//! Storage capability
//!
//! [`PrayerStore`] is the single seam between the engines and persistence.
//! Production wires in [`MongoPrayerStore`]; tests and the `memory` backend use
//! [`InMemoryPrayerStore`]. Stores perform no validation and no existence
//! checks across collections; those belong to the engines.

mod memory;
mod mongo;

pub use memory::InMemoryPrayerStore;
pub use mongo::MongoPrayerStore;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Comment, ObjectId, Prayer, PrayerRequest, Priority};
use crate::types::Result;

/// Selection over the prayer request collection
#[derive(Debug, Clone, PartialEq)]
pub enum RequestFilter {
    All,
    /// Case-insensitive substring of title or description, or an exact tag
    ///
    /// ASCII folds identically in every store. Beyond ASCII the in-memory
    /// store uses Unicode simple lowercasing while MongoDB's `$regex` `i`
    /// option applies its own folding, so characters such as `ß` or `İ` can
    /// match in one store and not the other.
    Text(String),
    /// Exact, case-sensitive category
    Category(String),
    Answered(bool),
    Priority(Priority),
}

impl RequestFilter {
    /// Evaluate the filter against one request
    pub fn matches(&self, request: &PrayerRequest) -> bool {
        match self {
            RequestFilter::All => true,
            RequestFilter::Text(term) => {
                let needle = term.to_lowercase();
                request.title.to_lowercase().contains(&needle)
                    || request.description.to_lowercase().contains(&needle)
                    || request.tags.iter().any(|tag| tag == term)
            }
            RequestFilter::Category(category) => &request.category == category,
            RequestFilter::Answered(answered) => request.is_answered == *answered,
            RequestFilter::Priority(priority) => request.priority == Some(*priority),
        }
    }
}

/// Document store operations the engines are written against
///
/// Reads reflect all writes acknowledged before they began. Each method is a
/// single storage round trip; none spans two documents atomically.
#[async_trait]
pub trait PrayerStore: Send + Sync {
    async fn insert_request(&self, request: &PrayerRequest) -> Result<()>;

    async fn find_request(&self, id: ObjectId) -> Result<Option<PrayerRequest>>;

    /// Every matching request, in unspecified order
    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<PrayerRequest>>;

    /// At most `limit` requests, newest `created_at` first
    async fn find_recent(&self, limit: u64) -> Result<Vec<PrayerRequest>>;

    /// Overwrite the stored document wholesale; `false` if no document had the id
    async fn replace_request(&self, request: &PrayerRequest) -> Result<bool>;

    /// `false` if no document had the id
    async fn delete_request(&self, id: ObjectId) -> Result<bool>;

    /// Atomically add one to `pray_count` and move `updated_at` to `now`, or
    /// one millisecond past its stored value if that is later
    ///
    /// Concurrent calls never lose an increment. `false` if no document had
    /// the id.
    async fn increment_pray_count(&self, id: ObjectId, now: DateTime<Utc>) -> Result<bool>;

    async fn count_requests(&self, filter: &RequestFilter) -> Result<u64>;

    /// Sum of `pray_count` across every request
    async fn sum_pray_count(&self) -> Result<u64>;

    /// Request count per category value, `""` included
    async fn count_by_category(&self) -> Result<HashMap<String, u64>>;

    async fn insert_comment(&self, comment: &Comment) -> Result<()>;

    async fn find_comments(&self, prayer_request_id: ObjectId) -> Result<Vec<Comment>>;

    async fn insert_prayer(&self, prayer: &Prayer) -> Result<()>;

    async fn find_prayers(&self, prayer_request_id: ObjectId) -> Result<Vec<Prayer>>;

    /// Cheap reachability probe
    async fn ping(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{now, CreatePrayerRequestInput};

    fn request(title: &str, description: &str, tags: &[&str]) -> PrayerRequest {
        PrayerRequest::from_input(
            CreatePrayerRequestInput::new(title, description).with_tags(tags.iter().copied()),
            now(),
        )
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let filter = RequestFilter::Text("grace".into());
        assert!(filter.matches(&request("Please pray for GRACE", "x", &[])));
        assert!(filter.matches(&request("x", "a disgraceful week", &[])));
        assert!(!filter.matches(&request("healing", "for my aunt", &[])));
    }

    #[test]
    fn test_text_filter_folds_non_ascii_lowercase() {
        let filter = RequestFilter::Text("ÉGLISE".into());
        assert!(filter.matches(&request("Prière à l'église", "x", &[])));
    }

    #[test]
    fn test_text_filter_tag_match_is_exact() {
        let filter = RequestFilter::Text("grace".into());
        assert!(filter.matches(&request("x", "y", &["grace"])));
        assert!(!filter.matches(&request("x", "y", &["Grace"])));
        assert!(!filter.matches(&request("x", "y", &["graceful"])));
    }

    #[test]
    fn test_category_filter_is_case_sensitive() {
        let mut req = request("x", "y", &[]);
        req.category = "Health".into();
        assert!(!RequestFilter::Category("health".into()).matches(&req));
        assert!(RequestFilter::Category("Health".into()).matches(&req));
    }

    #[test]
    fn test_priority_filter_skips_unset() {
        let mut req = request("x", "y", &[]);
        assert!(!RequestFilter::Priority(Priority::Urgent).matches(&req));
        req.priority = Some(Priority::Urgent);
        assert!(RequestFilter::Priority(Priority::Urgent).matches(&req));
    }
}
