//! Prayer document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::model::Prayer;

/// Collection name for prayer records
pub const PRAYER_COLLECTION: &str = "prayers";

/// Prayer document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrayerDoc {
    pub _id: ObjectId,

    pub prayer_request_id: ObjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub user_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub is_anonymous: bool,

    pub created_at: DateTime,
}

impl From<&Prayer> for PrayerDoc {
    fn from(prayer: &Prayer) -> Self {
        Self {
            _id: prayer.id,
            prayer_request_id: prayer.prayer_request_id,
            user_id: prayer.user_id,
            user_name: prayer.user_name.clone(),
            message: prayer.message.clone(),
            is_anonymous: prayer.is_anonymous,
            created_at: DateTime::from_chrono(prayer.created_at),
        }
    }
}

impl From<PrayerDoc> for Prayer {
    fn from(doc: PrayerDoc) -> Self {
        Self {
            id: doc._id,
            prayer_request_id: doc.prayer_request_id,
            user_id: doc.user_id,
            user_name: doc.user_name,
            message: doc.message,
            is_anonymous: doc.is_anonymous,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

impl IntoIndexes for PrayerDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "prayer_request_id": 1 },
            Some(
                IndexOptions::builder()
                    .name("prayer_request_id_index".to_string())
                    .build(),
            ),
        )]
    }
}
