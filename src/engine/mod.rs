//! Query and mutation engines
//!
//! Both engines hold an `Arc<dyn PrayerStore>` handed to them at startup and
//! keep no other state, so any number of requests may drive them concurrently.
//! Identifier parsing, validation and existence checks live here rather than
//! in the stores.

mod mutation;
mod query;

pub use mutation::MutationEngine;
pub use query::QueryEngine;

/// `ListRecent` size when the caller gives none (or a non-positive one)
pub const DEFAULT_RECENT_LIMIT: u64 = 10;
