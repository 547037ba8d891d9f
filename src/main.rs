//! Intercede - prayer request storage and query service
//!
//! "Pray for one another" - James 5:16

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intercede::{
    config::{Args, StoreBackend},
    db::MongoClient,
    server, AppState, InMemoryPrayerStore, MongoPrayerStore, PrayerStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("intercede={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Intercede - Prayer Request Service");
    info!("  \"Pray for one another\"");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Store: {:?}", args.store);
    info!("Recent limit: {}", args.recent_limit);
    info!("Allowed origin: {}", args.allowed_origin);

    let store: Arc<dyn PrayerStore> = match args.store {
        StoreBackend::Mongo => {
            info!("MongoDB: {} (db '{}')", args.mongodb_uri, args.mongodb_db);
            info!("======================================");

            // The document store is required; there is no degraded mode
            let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
                Ok(client) => client,
                Err(e) => {
                    error!("MongoDB connection failed: {}", e);
                    std::process::exit(1);
                }
            };

            match MongoPrayerStore::new(&mongo).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Failed to prepare prayer collections: {}", e);
                    std::process::exit(1);
                }
            }
        }
        StoreBackend::Memory => {
            info!("======================================");
            warn!("In-memory store selected - data is lost on exit");
            Arc::new(InMemoryPrayerStore::new())
        }
    };

    let state = Arc::new(AppState::new(args, store));

    server::run(state).await?;

    Ok(())
}
