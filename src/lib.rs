//! Intercede - prayer request storage and query service
//!
//! "Pray for one another" - James 5:16
//!
//! Intercede keeps prayer requests, the comments left on them and the prayers
//! recorded against them in a document store, and serves them over a small
//! JSON API.
//!
//! ## Layers
//!
//! - **Model**: entity shapes and the partial-update patch
//! - **Store**: the `PrayerStore` capability, backed by MongoDB or memory
//! - **Engine**: query and mutation operations over any store
//! - **Routes/Server**: hyper HTTP surface

pub mod config;
pub mod db;
pub mod engine;
pub mod model;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use engine::{MutationEngine, QueryEngine};
pub use server::{run, AppState};
pub use store::{InMemoryPrayerStore, MongoPrayerStore, PrayerStore, RequestFilter};
pub use types::{ErrorKind, IntercedeError, Result};
