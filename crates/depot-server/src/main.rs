//! Depot server
//!
//! Loads the shared configuration document and keeps resolution statistics
//! flushed until interrupted.

use anyhow::Result;
use depot_server::{Depot, ServerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!("Loaded configuration: {:?}", config);

    let depot = Depot::bootstrap(&config)?;
    info!(
        "✓ Depot ready, flushing statistics every {}s",
        config.flush_interval().as_secs()
    );

    depot
        .run_until(config.flush_interval(), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await;

    info!("Depot stopped");
    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(log_level: &str) -> Result<()> {
    let fallback = format!(
        "depot_server={level},depot_settings={level},depot_statistics={level},depot_parser={level}",
        level = log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
