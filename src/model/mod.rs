//! Entity model
//!
//! Plain data shapes exchanged between the engines, the stores and the HTTP
//! layer. Identifiers are 12-byte [`ObjectId`]s rendered as 24 hex characters
//! on the wire; timestamps are UTC instants truncated to millisecond precision
//! so that a stored document reads back exactly as it was written.

mod comment;
mod prayer;
mod request;
mod stats;

pub use bson::oid::ObjectId;
pub use comment::{Comment, CreateCommentInput};
pub use prayer::{Prayer, RecordPrayerInput};
pub use request::{CreatePrayerRequestInput, PrayerRequest, PrayerRequestPatch, Priority};
pub use stats::{ActivityItem, ActivityKind, PrayerStats};

use chrono::{DateTime, Utc};

use crate::types::Result;

/// Parse the canonical textual form of an id
pub fn parse_id(id: &str) -> Result<ObjectId> {
    Ok(ObjectId::parse_str(id)?)
}

/// Current instant at storage resolution (milliseconds)
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Refreshed `updated_at`: `now`, or one millisecond past `previous` when
/// the clock has not moved past it
pub fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + chrono::Duration::milliseconds(1))
}

/// Read an explicit `null` as the field's default, like an absent field
///
/// Older writers store empty slices and strings as `null`.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    use serde::Deserialize;

    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serialize an ObjectId as its hex string rather than extended JSON
pub(crate) mod id_hex {
    use bson::oid::ObjectId;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let hex = String::deserialize(deserializer)?;
        ObjectId::parse_str(&hex).map_err(D::Error::custom)
    }
}

/// Same as [`id_hex`] for optional references; empty string reads as `None`
pub(crate) mod opt_id_hex {
    use bson::oid::ObjectId;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        id: &Option<ObjectId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_some(&id.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ObjectId>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(hex) if !hex.is_empty() => ObjectId::parse_str(&hex)
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}
