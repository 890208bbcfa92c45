/// Axum webserver implementation
///
/// Server lifecycle management: bind, serve, graceful shutdown on ctrl-c.
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::webserver::{ routes, state::AppState };

/// Start the webserver
///
/// This function blocks until the server is shut down.
pub async fn start_server(state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        match e.kind() {
            std::io::ErrorKind::AddrInUse =>
                anyhow::anyhow!(
                    "Failed to bind to {}: address already in use (is another instance running?)",
                    addr
                ),
            _ => anyhow::anyhow!("Failed to bind to {}: {}", addr, e),
        }
    })?;

    log::info!("Token metrics API listening on http://{}", addr);
    log::info!("Endpoints available under http://{}/api/v1", addr);

    let app = routes::create_router(state);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    log::info!("Webserver stopped gracefully");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::info!("Received shutdown signal, stopping webserver...");
    }
}
