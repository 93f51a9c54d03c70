//! Shared harness for server integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tagtune_cache::{RateLimitConfig, RateLimiter};
use tagtune_core::{Error, HttpError, PageFetcher, Result};
use tagtune_extractor::{EngineConfig, Extractor};
use tagtune_server::{serve, AppState};
use tokio::net::TcpListener;

/// Serves canned pages by URL and counts every fetch.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or(Error::Http(HttpError::StatusError { status: 503 }))
    }
}

/// A running server bound to a random local port.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub fetcher: Arc<MockFetcher>,
}

impl TestApp {
    /// Spawn with default rate limits.
    pub async fn spawn(fetcher: MockFetcher) -> anyhow::Result<Self> {
        Self::spawn_with_limit(fetcher, RateLimitConfig::default()).await
    }

    pub async fn spawn_with_limit(
        fetcher: MockFetcher,
        limits: RateLimitConfig,
    ) -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let fetcher = Arc::new(fetcher);
        let extractor = Extractor::with_fetcher(&EngineConfig::default(), fetcher.clone());
        let state = AppState::new(extractor, RateLimiter::new(limits), "x-forwarded-for");

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            if let Err(e) = serve(listener, state).await {
                eprintln!("Server error: {e}");
            }
        });

        Ok(Self {
            address,
            client: reqwest::Client::new(),
            fetcher,
        })
    }

    /// `GET /api/info` with the given raw query string.
    pub async fn info(&self, query: &str) -> anyhow::Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}/api/info{query}", self.address))
            .send()
            .await?)
    }
}
