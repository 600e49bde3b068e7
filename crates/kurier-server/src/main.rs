//! # kurier-server
//!
//! HTTP command server for the kurier messaging / device-control backend.
//!
//! This binary provides:
//! - **Command API** (axum) — GET endpoints with query-string parameters,
//!   answering JSON envelopes for the user, message, and device collections
//! - **In-memory stores** seeded with the admin user, the admin's test
//!   message, and device slot 0; nothing survives a restart
//! - **Static info page** served at `/` describing the available commands
//! - **Permissive CORS** so browser clients on other origins can talk to it

mod api;
mod config;
mod error;
mod net;
mod pages;
mod params;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use kurier_store::{DeviceStore, MessageStore, UserStore};

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,kurier_server=debug")),
        )
        .init();

    info!("Starting kurier server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");
    info!(
        instance = %config.instance_name,
        page = %config.index_page_path.display(),
        "Instance settings"
    );

    // -----------------------------------------------------------------------
    // 3. Initialize the seeded in-memory stores
    // -----------------------------------------------------------------------
    let app_state = AppState {
        users: UserStore::new(),
        messages: MessageStore::new(),
        devices: DeviceStore::new(),
        config: Arc::new(config.clone()),
    };

    // Tell the operator where to point a browser on the local network.
    net::log_host_address(config.http_addr.port());

    // -----------------------------------------------------------------------
    // 4. Run the HTTP command server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
