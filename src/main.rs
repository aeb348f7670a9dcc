//! Knowledge Center - HTTP Server Entry Point
//!
//! Builds the index from the source page, then serves the question page.

use knowledge_center::{api, config::Config, startup};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowledge_center=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration before touching the network
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={} source={}",
        config.provider.chat_model, config.retrieval.source_url
    );

    let components = startup::build(&config).await?;
    info!(
        "Index ready: {} chunks, dimension {}",
        components.chunk_count, components.dimension
    );

    api::serve(&config, components.into()).await?;

    Ok(())
}
