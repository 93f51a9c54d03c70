//! Shared application state.

use std::sync::Arc;

use tagtune_cache::RateLimiter;
use tagtune_extractor::Extractor;

use crate::config::ServerConfig;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub limiter: Arc<RateLimiter>,
    /// Lowercased proxy header consulted for the caller's address.
    pub client_ip_header: Arc<str>,
}

impl AppState {
    /// Assemble state from prebuilt parts.
    pub fn new(extractor: Extractor, limiter: RateLimiter, client_ip_header: &str) -> Self {
        Self {
            extractor: Arc::new(extractor),
            limiter: Arc::new(limiter),
            client_ip_header: Arc::from(client_ip_header.trim().to_ascii_lowercase()),
        }
    }
}

/// Build the production state: HTTP fetcher, cache and rate limiter.
pub fn build_app_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let extractor = Extractor::new(config.engine_config())?;
    let limiter = RateLimiter::new(config.rate_limit_config());
    Ok(AppState::new(extractor, limiter, &config.client_ip_header))
}
