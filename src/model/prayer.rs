//! A single act of praying for a request

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of someone praying; distinct from the request itself
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prayer {
    #[serde(with = "super::id_hex")]
    pub id: ObjectId,

    /// Not enforced by the store; checked by the engine before insert
    #[serde(with = "super::id_hex")]
    pub prayer_request_id: ObjectId,

    #[serde(
        default,
        with = "super::opt_id_hex",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<ObjectId>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub user_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub is_anonymous: bool,

    pub created_at: DateTime<Utc>,
}

impl Prayer {
    pub fn from_input(
        prayer_request_id: ObjectId,
        input: RecordPrayerInput,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            prayer_request_id,
            user_id: input.user_id,
            user_name: input.user_name,
            message: input.message.filter(|m| !m.trim().is_empty()),
            is_anonymous: input.is_anonymous,
            created_at: now,
        }
    }
}

/// Input for recording a prayer; every field is optional
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RecordPrayerInput {
    #[serde(default, with = "super::opt_id_hex")]
    pub user_id: Option<ObjectId>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub user_name: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub is_anonymous: bool,
}
