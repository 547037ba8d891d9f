//! Prayer requests, their create input and the partial-update patch

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{IntercedeError, Result};

/// Urgency of a prayer request
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Parse a stored or submitted priority; the empty string means unset
    pub fn parse_optional(s: &str) -> Result<Option<Self>> {
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl FromStr for Priority {
    type Err = IntercedeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(IntercedeError::InvalidArgument(format!(
                "unknown priority '{}' (expected low, medium, high or urgent)",
                other
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unset priority travels as `""`, matching what clients already send
pub(crate) mod priority_field {
    use super::Priority;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        priority: &Option<Priority>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(priority.as_ref().map(Priority::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Priority>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => Priority::parse_optional(&s).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}

/// The primary posted item users pray for
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrayerRequest {
    #[serde(with = "super::id_hex")]
    pub id: ObjectId,

    pub title: String,

    pub description: String,

    /// Author account, when the client supplied one
    #[serde(
        default,
        with = "super::opt_id_hex",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<ObjectId>,

    /// Free-text author name; kept even when `is_anonymous` is set
    #[serde(default, deserialize_with = "super::null_default")]
    pub user_name: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub is_anonymous: bool,

    #[serde(default, deserialize_with = "super::null_default")]
    pub is_answered: bool,

    #[serde(default, with = "priority_field")]
    pub priority: Option<Priority>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub category: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub pray_count: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl PrayerRequest {
    /// Build a fresh request from validated input with a newly assigned id
    pub fn from_input(input: CreatePrayerRequestInput, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            user_id: input.user_id,
            user_name: input.user_name,
            is_anonymous: input.is_anonymous,
            is_answered: false,
            priority: input.priority,
            category: input.category,
            tags: input.tags,
            pray_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a prayer request
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CreatePrayerRequestInput {
    pub title: String,

    pub description: String,

    #[serde(default, with = "super::opt_id_hex")]
    pub user_id: Option<ObjectId>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub user_name: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub is_anonymous: bool,

    #[serde(default, deserialize_with = "priority_field::deserialize")]
    pub priority: Option<Priority>,

    #[serde(default, deserialize_with = "super::null_default")]
    pub category: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub tags: Vec<String>,
}

impl CreatePrayerRequestInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_author(mut self, user_name: impl Into<String>, is_anonymous: bool) -> Self {
        self.user_name = user_name.into();
        self.is_anonymous = is_anonymous;
        self
    }

    /// Title and description are required
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)
    }
}

/// Partial update: `None` leaves the stored field untouched
///
/// Absent and `null` JSON fields both read as `None`. Priority carries a second
/// level so that `""` can clear it. Tags replace the whole sequence.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PrayerRequestPatch {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_answered: Option<bool>,

    #[serde(default, deserialize_with = "priority_patch")]
    pub priority: Option<Option<Priority>>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

fn priority_patch<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Option<Priority>>, D::Error> {
    use serde::de::Error;

    match Option::<String>::deserialize(deserializer)? {
        Some(s) => Priority::parse_optional(&s)
            .map(Some)
            .map_err(D::Error::custom),
        None => Ok(None),
    }
}

impl PrayerRequestPatch {
    /// A present title or description must not be blank
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        Ok(())
    }

    /// Field-level merge into `request`; does not touch `updated_at`
    pub fn apply_to(self, request: &mut PrayerRequest) {
        if let Some(title) = self.title {
            request.title = title;
        }
        if let Some(description) = self.description {
            request.description = description;
        }
        if let Some(is_answered) = self.is_answered {
            request.is_answered = is_answered;
        }
        if let Some(priority) = self.priority {
            request.priority = priority;
        }
        if let Some(category) = self.category {
            request.category = category;
        }
        if let Some(tags) = self.tags {
            request.tags = tags;
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IntercedeError::InvalidArgument(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::now;

    fn sample() -> PrayerRequest {
        PrayerRequest::from_input(
            CreatePrayerRequestInput::new("A", "first")
                .with_category("health")
                .with_tags(["grace", "healing"]),
            now(),
        )
    }

    #[test]
    fn test_from_input_defaults() {
        let req = sample();
        assert_eq!(req.pray_count, 0);
        assert!(!req.is_answered);
        assert_eq!(req.priority, None);
        assert_eq!(req.created_at, req.updated_at);
    }

    #[test]
    fn test_validate_requires_title_and_description() {
        assert!(CreatePrayerRequestInput::new("t", "d").validate().is_ok());

        let err = CreatePrayerRequestInput::new("", "d").validate().unwrap_err();
        assert!(err.to_string().contains("title"));

        let err = CreatePrayerRequestInput::new("t", "   ").validate().unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut req = sample();
        let patch = PrayerRequestPatch {
            title: Some("B".into()),
            ..Default::default()
        };
        patch.apply_to(&mut req);

        assert_eq!(req.title, "B");
        assert_eq!(req.description, "first");
        assert_eq!(req.category, "health");
        assert_eq!(req.tags, vec!["grace", "healing"]);
    }

    #[test]
    fn test_patch_replaces_tags_wholesale() {
        let mut req = sample();
        PrayerRequestPatch {
            tags: Some(vec!["family".into()]),
            ..Default::default()
        }
        .apply_to(&mut req);
        assert_eq!(req.tags, vec!["family"]);
    }

    #[test]
    fn test_patch_json_presence() {
        let patch: PrayerRequestPatch =
            serde_json::from_str(r#"{"title": null, "is_answered": true, "priority": ""}"#)
                .unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.is_answered, Some(true));
        assert_eq!(patch.priority, Some(None));
        assert_eq!(patch.tags, None);

        let patch: PrayerRequestPatch = serde_json::from_str(r#"{"priority": "urgent"}"#).unwrap();
        assert_eq!(patch.priority, Some(Some(Priority::Urgent)));

        let empty: PrayerRequestPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PrayerRequestPatch::default());
    }

    #[test]
    fn test_create_input_accepts_nulls() {
        let input: CreatePrayerRequestInput = serde_json::from_str(
            r#"{"title": "t", "description": "d", "tags": null, "category": null,
                "user_name": null, "is_anonymous": null, "priority": null, "user_id": null}"#,
        )
        .unwrap();
        assert_eq!(input, CreatePrayerRequestInput::new("t", "d"));
    }

    #[test]
    fn test_unknown_priority_rejected() {
        let result: std::result::Result<CreatePrayerRequestInput, _> = serde_json::from_str(
            r#"{"title": "t", "description": "d", "priority": "whenever"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_json_shape() {
        let req = sample();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["id"], req.id.to_hex());
        assert_eq!(json["priority"], "");
        assert_eq!(json["pray_count"], 0);
        assert!(json.get("user_id").is_none());

        let back: PrayerRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, req);
    }
}
