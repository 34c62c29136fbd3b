//! spam-api: Spam Detection Server
//!
//! Classifies messages as spam or legitimate with logistic regression,
//! Naive Bayes or k-means models trained on first use.

use spam_api::{ApiConfig, ApiServer};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spam_api=info,spam_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting spam-api v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if let Some(config_path) = std::env::args().nth(1) {
        info!("Loading configuration from {}", config_path);
        ApiConfig::from_file(Path::new(&config_path))?
    } else {
        info!("No config file specified, using development defaults");
        ApiConfig::development()
    };
    config.apply_env_overrides()?;
    config.validate()?;

    info!(
        "Training data: {} (models are trained on first request)",
        config.training.dataset_path.display()
    );

    let server = ApiServer::new(&config);
    server.run().await?;

    Ok(())
}
