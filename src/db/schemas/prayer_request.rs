//! Prayer request document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::model::{PrayerRequest, Priority};
use crate::types::{IntercedeError, Result};

/// Collection name for prayer requests
pub const PRAYER_REQUEST_COLLECTION: &str = "prayer_requests";

/// Prayer request document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrayerRequestDoc {
    pub _id: ObjectId,

    pub title: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub user_name: String,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub is_anonymous: bool,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub is_answered: bool,

    /// `low|medium|high|urgent`, or `""` when unset
    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub priority: String,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub category: String,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub tags: Vec<String>,

    /// Older documents may lack the counter; it reads as zero
    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub pray_count: i64,

    pub created_at: DateTime,

    pub updated_at: DateTime,
}

impl From<&PrayerRequest> for PrayerRequestDoc {
    fn from(req: &PrayerRequest) -> Self {
        Self {
            _id: req.id,
            title: req.title.clone(),
            description: req.description.clone(),
            user_id: req.user_id,
            user_name: req.user_name.clone(),
            is_anonymous: req.is_anonymous,
            is_answered: req.is_answered,
            priority: req.priority.map(|p| p.as_str()).unwrap_or("").to_string(),
            category: req.category.clone(),
            tags: req.tags.clone(),
            pray_count: i64::try_from(req.pray_count).unwrap_or(i64::MAX),
            created_at: DateTime::from_chrono(req.created_at),
            updated_at: DateTime::from_chrono(req.updated_at),
        }
    }
}

impl TryFrom<PrayerRequestDoc> for PrayerRequest {
    type Error = IntercedeError;

    fn try_from(doc: PrayerRequestDoc) -> Result<Self> {
        let priority = Priority::parse_optional(&doc.priority).map_err(|e| {
            IntercedeError::Internal(format!("prayer request {}: {}", doc._id, e))
        })?;

        Ok(Self {
            id: doc._id,
            title: doc.title,
            description: doc.description,
            user_id: doc.user_id,
            user_name: doc.user_name,
            is_anonymous: doc.is_anonymous,
            is_answered: doc.is_answered,
            priority,
            category: doc.category,
            tags: doc.tags,
            pray_count: u64::try_from(doc.pray_count).unwrap_or(0),
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}

impl IntoIndexes for PrayerRequestDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Newest-first listing
            (
                doc! { "created_at": -1 },
                Some(
                    IndexOptions::builder()
                        .name("created_at_desc".to_string())
                        .build(),
                ),
            ),
            // Category filter and group-by
            (
                doc! { "category": 1 },
                Some(
                    IndexOptions::builder()
                        .name("category_index".to_string())
                        .build(),
                ),
            ),
            // Exact tag match in search
            (
                doc! { "tags": 1 },
                Some(
                    IndexOptions::builder()
                        .name("tags_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
