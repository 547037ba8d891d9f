//! Database schemas
//!
//! Stored document shapes for the `prayer_requests`, `comments` and `prayers`
//! collections, with conversions to and from the entity model.

mod comment;
mod prayer;
mod prayer_request;

pub use comment::{CommentDoc, COMMENT_COLLECTION};
pub use prayer::{PrayerDoc, PRAYER_COLLECTION};
pub use prayer_request::{PrayerRequestDoc, PRAYER_REQUEST_COLLECTION};
