//! Configuration for Intercede
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

/// Which [`PrayerStore`](crate::store::PrayerStore) backs the engines
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// MongoDB at `--mongodb-uri`
    Mongo,
    /// Process-local; lost on exit
    Memory,
}

/// Intercede - prayer request storage and query service
///
/// "Pray for one another" - James 5:16
#[derive(Parser, Debug, Clone)]
#[command(name = "intercede")]
#[command(about = "Prayer request storage and query service")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "DB_NAME", default_value = "prayerreq")]
    pub mongodb_db: String,

    /// Storage backend
    #[arg(long, env = "STORE", value_enum, default_value = "mongo")]
    pub store: StoreBackend,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Size of /prayers/recent when no limit is given
    #[arg(long, env = "RECENT_LIMIT", default_value = "10")]
    pub recent_limit: u64,

    /// Value of Access-Control-Allow-Origin on every response
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "*")]
    pub allowed_origin: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.store == StoreBackend::Mongo && self.mongodb_db.trim().is_empty() {
            return Err("DB_NAME must not be empty".to_string());
        }

        if self.recent_limit == 0 {
            return Err("RECENT_LIMIT must be at least 1".to_string());
        }

        if hyper::header::HeaderValue::from_str(&self.allowed_origin).is_err() {
            return Err("ALLOWED_ORIGIN is not a valid header value".to_string());
        }

        Ok(())
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_db: "prayerreq".to_string(),
            store: StoreBackend::Memory,
            log_level: "info".to_string(),
            recent_limit: 10,
            allowed_origin: "*".to_string(),
        }
    }
}
