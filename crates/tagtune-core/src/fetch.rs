//! Network seam used by the extraction pipeline.

use async_trait::async_trait;

use crate::Result;

/// Fetches a page body as text.
///
/// Implementations enforce their own size and time bounds and report
/// non-2xx responses as [`crate::HttpError::StatusError`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the decoded body.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
