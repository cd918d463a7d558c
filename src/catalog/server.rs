use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use super::api;

/// Configuration for the catalog server.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub port: u16,
    pub dev_mode: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            dev_mode: false,
        }
    }
}

/// Build the full router. Dev mode adds a permissive CORS layer.
pub fn build_router(dev_mode: bool) -> Router {
    let app = api::api_router();
    if dev_mode {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the catalog server and run until Ctrl-C.
pub async fn start_server(config: ServeConfig) -> Result<()> {
    let app = build_router(config.dev_mode);

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, dev = config.dev_mode, "catalog service listening");
    println!("Parts catalog running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}
