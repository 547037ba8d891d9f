//! Comments attached to a prayer request

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{IntercedeError, Result};

/// A message left on a prayer request; never edited once written
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Comment {
    #[serde(with = "super::id_hex")]
    pub id: ObjectId,

    #[serde(with = "super::id_hex")]
    pub prayer_request_id: ObjectId,

    #[serde(default, deserialize_with = "super::null_default")]
    pub user_name: String,

    pub message: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub is_anonymous: bool,

    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_input(
        prayer_request_id: ObjectId,
        input: CreateCommentInput,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            prayer_request_id,
            user_name: input.user_name,
            message: input.message,
            is_anonymous: input.is_anonymous,
            created_at: now,
        }
    }
}

/// Input for adding a comment
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CreateCommentInput {
    pub message: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub user_name: String,

    #[serde(default, deserialize_with = "super::null_default")]
    pub is_anonymous: bool,
}

impl CreateCommentInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, user_name: impl Into<String>, is_anonymous: bool) -> Self {
        self.user_name = user_name.into();
        self.is_anonymous = is_anonymous;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.message.trim().is_empty() {
            return Err(IntercedeError::InvalidArgument("message is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_required() {
        assert!(CreateCommentInput::new("praying with you").validate().is_ok());
        assert!(CreateCommentInput::new("").validate().is_err());
    }

    #[test]
    fn test_missing_message_fails_to_parse() {
        let result: std::result::Result<CreateCommentInput, _> =
            serde_json::from_str(r#"{"user_name": "Eli"}"#);
        assert!(result.is_err());
    }
}
