use crate::config::ScoutConfig;
use crate::services::Services;
use anyhow::{Context, Result};
use scout_server::{ServerConfig, create_app};
use std::path::PathBuf;

/// Run the HTTP API until Ctrl+C, then release pooled agent sessions.
pub async fn run_serve(
    mut config: ScoutConfig,
    port: Option<u16>,
    cache_path: Option<PathBuf>,
) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(path) = cache_path {
        config.cache.path = path;
    }

    let services = Services::build(&config)?;
    let server_config =
        ServerConfig::new(services.pipeline.clone()).with_security(config.security_config());
    let app = create_app(server_config);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        addr = %addr,
        remote_search = services.search.is_remote_enabled(),
        live_analysis = services.pipeline.is_ready(),
        "Server started"
    );
    println!("idea-scout API listening on http://{addr}");
    println!("Press Ctrl+C to stop");

    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    services.shutdown().await;
    tracing::info!("Server stopped");
    served.context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
