//! Aggregate statistics over the request collection

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived roll-up; never persisted
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PrayerStats {
    /// Number of prayer request documents
    pub total_prayers: u64,

    /// Sum of `pray_count` across all requests
    pub total_pray_count: u64,

    pub answered_prayers: u64,

    pub urgent_prayers: u64,

    /// Requests per category, including `""` for unset
    pub categories_count: HashMap<String, u64>,

    /// Declared but never populated
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PrayerCreated,
    PrayerAnswered,
    PrayCountIncreased,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_activity_serializes_as_empty_list() {
        let json = serde_json::to_value(PrayerStats::default()).unwrap();
        assert_eq!(json["recent_activity"], serde_json::json!([]));
        assert_eq!(json["categories_count"], serde_json::json!({}));
    }

    #[test]
    fn test_activity_kind_wire_name() {
        let item = ActivityItem {
            kind: ActivityKind::PrayCountIncreased,
            message: "someone prayed".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "pray_count_increased");
    }
}
