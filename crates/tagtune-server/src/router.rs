use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{get_info, health_check};
use crate::state::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/info", get(get_info))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
