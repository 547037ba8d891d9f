//! MongoDB access
//!
//! Client/collection wrappers and the stored document shapes.

pub mod mongo;
pub mod schemas;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection};
