//! Request handlers.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tagtune_core::AudioInfo;
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

/// Identity shared by callers that arrive without a client-IP header.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Fallback header set by common reverse proxies.
const REAL_IP_HEADER: &str = "x-real-ip";

/// Query string for `/api/info`.
#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    url: Option<String>,
}

/// Liveness check.
pub async fn health_check() -> &'static str {
    "OK"
}

/// `GET /api/info?url=<page>`: audio metadata for a page.
pub async fn get_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<InfoQuery>,
) -> Result<Json<AudioInfo>, ApiError> {
    let client = client_identity(&headers, &state.client_ip_header);
    if !state.limiter.allow(&client) {
        return Err(ApiError::RateLimited);
    }

    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(ApiError::MissingUrl)?;

    info!("Info request from {client} for {url}");
    let audio = state.extractor.get_audio_info(&url).await?;
    Ok(Json(audio))
}

/// Best-effort caller address from proxy headers.
///
/// Takes the first entry of the configured header, then `x-real-ip`, then
/// falls back to [`UNKNOWN_CLIENT`].
pub fn client_identity(headers: &HeaderMap, ip_header: &str) -> String {
    [ip_header, REAL_IP_HEADER]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), str::to_string)
}
