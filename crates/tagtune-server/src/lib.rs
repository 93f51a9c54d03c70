//! # tagtune-server
//!
//! HTTP front end for the Tagtune extraction engine: `GET /api/info?url=`
//! returns the audio metadata declared by a web page.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

use tokio::net::TcpListener;
use tracing::{debug, info};

pub use self::config::{load_config, ServerConfig};
pub use errors::ApiError;
pub use router::create_router;
pub use state::{build_app_state, AppState};

/// Serve the application on an already-bound listener.
pub async fn run(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    debug!(?config, "Server configuration loaded");

    let state = build_app_state(&config)?;
    serve(listener, state).await
}

/// Serve a prepared state on an already-bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
