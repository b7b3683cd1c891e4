use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use medrec_core::{CoreConfig, RecordService, config::cache_ttl_from_env_value};
use medrec_core::constants::DEFAULT_DATA_DIR;
use medrec_store::{FileStore, MemoryCache};

/// Main entry point for the medrec application
///
/// Starts the REST server and serves the medical-record store over HTTP,
/// including OpenAPI/Swagger documentation. The data directory is created on
/// first start if it does not exist yet.
///
/// # Environment Variables
/// - `MEDREC_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDREC_DATA_DIR`: Directory for record data storage (default: "record_data")
/// - `MEDREC_CACHE_TTL_SECS`: Single-record cache TTL in seconds (default: 600)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medrec_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDREC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("MEDREC_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let cache_ttl = cache_ttl_from_env_value(std::env::var("MEDREC_CACHE_TTL_SECS").ok())?;

    tracing::info!("++ Starting medrec REST on {}", rest_addr);
    tracing::info!("++ Record data directory: {}", data_dir);

    let cfg = Arc::new(CoreConfig::new(cache_ttl));
    let store = Arc::new(FileStore::open(&data_dir)?);
    let cache = Arc::new(MemoryCache::new());

    let state = AppState {
        record_service: Arc::new(RecordService::new(cfg, store, cache)),
    };

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
