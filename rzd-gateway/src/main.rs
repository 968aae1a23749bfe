use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rzd_gateway::cache::{CacheConfig, CachedRzdClient};
use rzd_gateway::rzd::{RzdClient, RzdConfig};
use rzd_gateway::web::{AppState, create_router};

/// Default listen address when `LISTEN_ADDR` is unset.
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    let config = match RzdConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // RUST_LOG wins; otherwise RZD_DEBUG_MODE picks the level
    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let addr: SocketAddr = std::env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
        .expect("LISTEN_ADDR must be a socket address");

    let client = RzdClient::new(&config).expect("Failed to create timetable client");
    let cached = CachedRzdClient::new(client, &CacheConfig::default());

    let shutdown = CancellationToken::new();
    let state = AppState::new(cached, shutdown.clone());
    let app = create_router(state);

    info!(
        %addr,
        base_path = %config.base_path,
        language = %config.language,
        max_retries = config.max_retries,
        "timetable gateway listening"
    );
    info!("endpoints: /health /api/routes /api/routes/return /api/carriages /api/stations");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
            shutdown.cancel();
        })
        .await;

    if let Err(e) = served {
        error!(error = %e, "server error");
    }
}
