//! Comment document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::model::Comment;

/// Collection name for comments
pub const COMMENT_COLLECTION: &str = "comments";

/// Comment document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CommentDoc {
    pub _id: ObjectId,

    /// Parent prayer request
    pub prayer_request_id: ObjectId,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub user_name: String,

    pub message: String,

    #[serde(default, deserialize_with = "crate::model::null_default")]
    pub is_anonymous: bool,

    pub created_at: DateTime,
}

impl From<&Comment> for CommentDoc {
    fn from(comment: &Comment) -> Self {
        Self {
            _id: comment.id,
            prayer_request_id: comment.prayer_request_id,
            user_name: comment.user_name.clone(),
            message: comment.message.clone(),
            is_anonymous: comment.is_anonymous,
            created_at: DateTime::from_chrono(comment.created_at),
        }
    }
}

impl From<CommentDoc> for Comment {
    fn from(doc: CommentDoc) -> Self {
        Self {
            id: doc._id,
            prayer_request_id: doc.prayer_request_id,
            user_name: doc.user_name,
            message: doc.message,
            is_anonymous: doc.is_anonymous,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

impl IntoIndexes for CommentDoc {
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
