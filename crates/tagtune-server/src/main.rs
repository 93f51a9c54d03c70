//! # Tagtune
//!
//! Audio metadata and lyrics extraction server.

use anyhow::Result;
use tagtune_server::{load_config, run};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tagtune=info,tagtune_server=info,tagtune_extractor=debug".into()
            }),
        )
        .init();

    info!("Starting Tagtune v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    run(listener, config).await
}
