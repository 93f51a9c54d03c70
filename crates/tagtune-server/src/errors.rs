use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tagtune_core::{Error, ErrorClass};
use tracing::{error, warn};

/// Message returned when the `url` query parameter is absent or blank.
pub const MISSING_URL: &str = "Missing url parameter";

/// Errors surfaced by the HTTP layer.
///
/// Every variant renders as a JSON body of the form `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// The request had no usable `url` parameter.
    MissingUrl,
    /// The caller exhausted its rate-limit window.
    RateLimited,
    /// The extraction engine failed.
    Engine(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Engine(err)
    }
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Engine(err) => match err.class() {
                ErrorClass::Validation => StatusCode::BAD_REQUEST,
                ErrorClass::NotFound => StatusCode::NOT_FOUND,
                ErrorClass::Upstream => StatusCode::BAD_GATEWAY,
                ErrorClass::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingUrl => MISSING_URL.to_string(),
            Self::RateLimited => Error::RateLimited.to_string(),
            Self::Engine(err) if err.class() == ErrorClass::Internal => {
                "An internal server error occurred.".to_string()
            }
            Self::Engine(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Engine(err) if status.is_server_error() => error!("Extraction failed: {err}"),
            other => warn!("Request rejected ({status}): {}", other.message()),
        }

        let body = Json(json!({
            "error": self.message(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagtune_core::HttpError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::from(Error::validation("Invalid URL")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(Error::NoAudioTag).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(Error::Http(HttpError::Timeout)).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(Error::Internal("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = ApiError::from(Error::Internal("secret path".into()));
        assert!(!err.message().contains("secret"));
        assert_eq!(
            ApiError::RateLimited.message(),
            "Too many requests. Please wait a moment and try again."
        );
    }
}
