//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the
//! REST server (with OpenAPI/Swagger UI) against an existing data directory.
//! Unlike the workspace's main `medrec-run` binary it refuses to start when
//! the data directory does not exist, so a typo in `MEDREC_DATA_DIR` cannot
//! silently create an empty store.

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medrec_core::{
    config::cache_ttl_from_env_value, constants::DEFAULT_DATA_DIR, CoreConfig, RecordService,
};
use medrec_store::{FileStore, MemoryCache};

/// Main entry point for the medrec REST API server
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000) and serves the record endpoints with OpenAPI/Swagger
/// documentation.
///
/// # Environment Variables
/// - `MEDREC_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MEDREC_DATA_DIR`: Record data directory (default: "record_data", must exist)
/// - `MEDREC_CACHE_TTL_SECS`: Single-record cache TTL in seconds (default: 600)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory does not exist or the cache TTL is malformed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDREC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting medrec REST API on {}", addr);

    let data_dir = std::env::var("MEDREC_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    if !Path::new(&data_dir).exists() {
        anyhow::bail!("Record data directory does not exist: {data_dir}");
    }

    let cache_ttl = cache_ttl_from_env_value(std::env::var("MEDREC_CACHE_TTL_SECS").ok())?;
    let cfg = Arc::new(CoreConfig::new(cache_ttl));

    let store = Arc::new(FileStore::open(&data_dir)?);
    let cache = Arc::new(MemoryCache::new());
    let state = AppState {
        record_service: Arc::new(RecordService::new(cfg, store, cache)),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
