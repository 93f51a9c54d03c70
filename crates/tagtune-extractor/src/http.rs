//! reqwest-backed page fetcher.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect;
use tagtune_core::{Error, HttpError, PageFetcher, Result};
use tracing::debug;

use crate::config::EngineConfig;

/// Redirect hops followed before a fetch fails.
const MAX_REDIRECTS: usize = 10;

/// Fetches pages over HTTP(S) with a bounded body size.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    max_payload_bytes: usize,
}

impl HttpFetcher {
    /// Build a fetcher from engine settings.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Internal(format!("Invalid user agent: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    fn too_large(&self) -> Error {
        Error::Http(HttpError::PayloadTooLarge {
            limit: self.max_payload_bytes,
        })
    }
}

fn map_request_error(e: &reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Http(HttpError::Timeout)
    } else if e.is_connect() {
        Error::Http(HttpError::ConnectionFailed(e.to_string()))
    } else {
        Error::Network(e.to_string())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {url} returned {status}");
            return Err(Error::Http(HttpError::StatusError {
                status: status.as_u16(),
            }));
        }

        let limit = self.max_payload_bytes;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| map_request_error(&e))? {
            if body.len() + chunk.len() > limit {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!("GET {url} -> {} bytes", body.len());
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_user_agent() {
        let config = EngineConfig::default().with_user_agent("bad\nagent");
        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_builds_with_defaults() {
        let fetcher = HttpFetcher::new(&EngineConfig::default()).unwrap();
        assert_eq!(fetcher.max_payload_bytes, 2 * 1024 * 1024);
    }
}
