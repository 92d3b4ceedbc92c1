use anyhow::{Context, Result};
use portfolio_edge::{config::Config, server};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_edge=info".parse()?),
        )
        .init();

    info!("Starting portfolio edge server");

    // Load configuration from environment
    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    if config.resend_api_key.is_none() {
        warn!("RESEND_API_KEY not set, contact submissions will be accepted but not emailed");
    }

    let state = server::AppState::from_config(config)?;
    let app = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
