//! Corkscan scan-event aggregation engine
//!
//! Batch analytics pipeline for QR wine-label scans:
//! - Hourly aggregation of raw scan events into per-day facet collections
//! - Idempotent upserts keyed by natural keys, safe to re-run
//! - Read-side dashboard summaries with sample-data fallback
//! - Manual trigger and health endpoints over HTTP

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use aggregator::{Aggregator, WorkerConfig, WorkerScheduler};
use api::{router, AppState};
use scan_store::{CollectionConfig, MemoryStore};
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Seconds between scheduled aggregation runs
    #[serde(default = "default_aggregation_interval_secs")]
    aggregation_interval_secs: u64,

    #[serde(default)]
    collections: CollectionConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_aggregation_interval_secs() -> u64 {
    3600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            aggregation_interval_secs: default_aggregation_interval_secs(),
            collections: CollectionConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Corkscan aggregation engine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // In-process store. Deployments back the EventStore and
    // AggregateStore traits with their document database adapter.
    let store = Arc::new(MemoryStore::new(config.collections.clone()));
    health().event_store.set_healthy();
    health().aggregate_store.set_healthy();

    // Create application state
    let state = AppState::new(store.clone(), store.clone());

    // Start background aggregation worker
    let worker_scheduler = Arc::new(WorkerScheduler::new(
        WorkerConfig {
            aggregation_interval: Duration::from_secs(config.aggregation_interval_secs),
        },
        state.aggregator.clone(),
    ));
    let _worker_handles = worker_scheduler.start();

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("CORKSCAN")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
