//! Claims Portal - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory store, default port
//! cargo run --bin claims-portal
//!
//! # Persist claims to a JSON document
//! PORTAL_STORE_PATH=./data/claims.json PORTAL_PORT=3000 cargo run --bin claims-portal
//! ```
//!
//! # Environment Variables
//!
//! * `PORTAL_HOST` - Server host (default: 0.0.0.0)
//! * `PORTAL_PORT` - Server port (default: 8080)
//! * `PORTAL_LOG_LEVEL` - Log level or filter directive (default: info)
//! * `PORTAL_LOG_JSON` - Emit JSON log lines (default: false)
//! * `PORTAL_STORE_PATH` - Claim document path; in-memory when unset
//! * `PORTAL_AUTO_START_DELAY_MS` - Delay before an auto-started run begins (default: 1000)
//! * `PORTAL_COMMERCIAL_REDIRECT_SECS` - Commercial flow redirect delay (default: 15)
//! * `PORTAL_TICK_INCREMENT_PCT` - In-stage progress per tick (default: 2)
//! * `PORTAL_RUN_IDLE_TTL_SECS` - Idle time before a run is evicted (default: 600)
//! * `PORTAL_RUN_SWEEP_INTERVAL_SECS` - Idle-run sweep period (default: 60)

use std::net::SocketAddr;
use std::sync::Arc;

use domain_claims::ClaimRecordPort;
use infra_store::{InMemoryClaimStore, JsonFileClaimStore};
use interface_api::{clock::RuntimeClock, config::PortalConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.store_path,
        "Starting claims portal"
    );

    let store = open_store(&config).await?;
    let state = AppState::new(store, Arc::new(RuntimeClock::new()), config.clone());
    state.runs.spawn_sweeper(config.run_sweep_interval());
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads `PORTAL_*` configuration, falling back to defaults when the
/// environment cannot be parsed.
fn load_config() -> PortalConfig {
    PortalConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Ignoring invalid PORTAL_* configuration: {}", err);
        PortalConfig::default()
    })
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured log level.
fn init_tracing(config: &PortalConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn open_store(config: &PortalConfig) -> Result<Arc<dyn ClaimRecordPort>, Box<dyn std::error::Error>> {
    match &config.store_path {
        Some(path) => {
            let store = JsonFileClaimStore::open(path).await?;
            tracing::info!(path = %path.display(), "Claim document opened");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("Using in-memory claim store");
            Ok(Arc::new(InMemoryClaimStore::new()))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
