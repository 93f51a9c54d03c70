//! # Server Configuration
//!
//! Settings are layered: built-in defaults, then an optional
//! `tagtune.toml`/`tagtune.yaml` in the working directory, then `TAGTUNE_*`
//! environment variables (e.g. `TAGTUNE_PORT=8080`).

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use tagtune_cache::RateLimitConfig;
use tagtune_extractor::config::{
    DEFAULT_MAX_PAYLOAD_BYTES, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
use tagtune_extractor::EngineConfig;

/// Base name of the optional config file.
const CONFIG_FILE: &str = "tagtune";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "TAGTUNE";

/// Root server configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-fetch timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_soft_limit")]
    pub cache_soft_limit: usize,
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,
    /// Header carrying the caller's address when behind a proxy.
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: String,
    /// Override for the lyrics embed base URL.
    #[serde(default)]
    pub embed_base: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

const fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_cache_ttl_secs() -> u64 {
    300
}

const fn default_cache_soft_limit() -> usize {
    200
}

const fn default_rate_limit_window_secs() -> u64 {
    60
}

const fn default_rate_limit_max() -> u32 {
    15
}

fn default_client_ip_header() -> String {
    "x-forwarded-for".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            max_payload_bytes: default_max_payload_bytes(),
            user_agent: default_user_agent(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_soft_limit: default_cache_soft_limit(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_max: default_rate_limit_max(),
            client_ip_header: default_client_ip_header(),
            embed_base: None,
        }
    }
}

impl ServerConfig {
    /// Extraction engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        let engine = EngineConfig::default()
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_user_agent(self.user_agent.clone())
            .with_max_payload_bytes(self.max_payload_bytes)
            .with_cache_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_cache_soft_limit(self.cache_soft_limit);

        match &self.embed_base {
            Some(base) => engine.with_embed_base(base.clone()),
            None => engine,
        }
    }

    /// Rate limiter settings derived from this config.
    pub const fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            window: Duration::from_secs(self.rate_limit_window_secs),
            max_requests: self.rate_limit_max,
        }
    }

    /// Address to bind the listener to.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid host '{}': {e}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Load configuration from the optional file and the environment.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
    from_builder(builder)
}

/// Deserialize a prepared builder, applying serde defaults for missing keys.
pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<ServerConfig, ConfigError> {
    builder.build()?.try_deserialize()
}
