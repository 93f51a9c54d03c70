//! Extraction engine settings.

use std::time::Duration;

use tagtune_cache::response::{DEFAULT_SOFT_LIMIT, DEFAULT_TTL};
use tagtune_lyrics::DEFAULT_EMBED_BASE;

/// Default timeout for a single page fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest page body read before giving up.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Desktop browser identity; several audio hosts serve bare pages to
/// unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Settings for [`crate::Extractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_payload_bytes: usize,
    pub cache_ttl: Duration,
    pub cache_soft_limit: usize,
    /// Base URL for lyrics embed pages.
    pub embed_base: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            cache_ttl: DEFAULT_TTL,
            cache_soft_limit: DEFAULT_SOFT_LIMIT,
            embed_base: DEFAULT_EMBED_BASE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the per-fetch timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub const fn with_max_payload_bytes(mut self, limit: usize) -> Self {
        self.max_payload_bytes = limit;
        self
    }

    /// Set the response cache TTL.
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub const fn with_cache_soft_limit(mut self, limit: usize) -> Self {
        self.cache_soft_limit = limit;
        self
    }

    pub fn with_embed_base(mut self, base: impl Into<String>) -> Self {
        self.embed_base = base.into();
        self
    }
}
