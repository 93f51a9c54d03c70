//! Error types for Tagtune.

use thiserror::Error;

/// Result type alias using Tagtune's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Tagtune.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("{0}")]
    Validation(String),

    // Extraction outcomes
    #[error("No og:audio or twitter:player:stream meta tag found on this page")]
    NoAudioTag,

    // Network errors
    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// HTTP-specific errors raised while fetching an upstream page.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to fetch page: upstream returned status {status}")]
    StatusError { status: u16 },

    #[error("Failed to fetch page: response exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to fetch page: connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Failed to fetch page: request timed out")]
    Timeout,
}

/// How an error surfaces to callers of the extraction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input; never reached the network.
    Validation,
    /// The page was fetched but declares no audio.
    NotFound,
    /// The upstream page could not be fetched.
    Upstream,
    /// The caller exceeded its request budget.
    RateLimited,
    /// A bug or misconfiguration on our side.
    Internal,
}

impl Error {
    /// Shorthand for a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Classifies this error into one of the caller-visible outcomes.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::NoAudioTag => ErrorClass::NotFound,
            Self::Http(_) | Self::Network(_) => ErrorClass::Upstream,
            Self::RateLimited => ErrorClass::RateLimited,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Returns true if the upstream page could not be fetched.
    pub const fn is_upstream(&self) -> bool {
        matches!(self.class(), ErrorClass::Upstream)
    }
}
