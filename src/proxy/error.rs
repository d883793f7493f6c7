//! Error types for proxied provider calls and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::InvalidRequest;
use crate::providers::ProviderKind;

/// Errors that can occur while serving a provider route
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Client body failed validation
    #[error("invalid request: {0}")]
    InvalidInput(#[from] InvalidRequest),

    /// A credential or setting the provider needs is absent
    #[error("provider is not configured: missing {0}")]
    NotConfigured(&'static str),

    /// Connect, timeout, body read or JSON decode failure
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("upstream returned {status}: {body}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type ProxyResult<T> = Result<T, ProxyError>;

/// A [`ProxyError`] bound to the provider whose route produced it.
///
/// Validation failures become 400 with a message naming the provider. All
/// other failures are logged here and become a generic 500 so upstream
/// details never reach the browser.
#[derive(Debug)]
pub struct ApiError {
    pub provider: ProviderKind,
    pub error: ProxyError,
}

impl ApiError {
    pub fn new(provider: ProviderKind, error: impl Into<ProxyError>) -> Self {
        Self {
            provider,
            error: error.into(),
        }
    }

    /// Status code the client will see
    pub fn status(&self) -> StatusCode {
        match self.error {
            ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body
    pub fn client_message(&self) -> String {
        let label = self.provider.label();
        match self.error {
            ProxyError::InvalidInput(InvalidRequest::Query) => {
                format!("Invalid {} for {}", self.provider.query_noun(), label)
            }
            ProxyError::InvalidInput(InvalidRequest::Page) => format!("Invalid page for {}", label),
            _ => format!("Failed to fetch from {}", label),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(provider = self.provider.name(), error = %self.error, "{} API error", self.provider.label());
        } else {
            tracing::debug!(provider = self.provider.name(), error = %self.error, "Rejected client request");
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_messages() {
        let err = ApiError::new(ProviderKind::Unsplash, InvalidRequest::Query);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Invalid query for Unsplash");

        let err = ApiError::new(ProviderKind::Pixabay, InvalidRequest::Query);
        assert_eq!(err.client_message(), "Invalid query for Pixabay");

        let err = ApiError::new(ProviderKind::Runware, InvalidRequest::Query);
        assert_eq!(err.client_message(), "Invalid prompt for Runware");
    }

    #[test]
    fn test_invalid_page_message() {
        let err = ApiError::new(ProviderKind::Unsplash, InvalidRequest::Page);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Invalid page for Unsplash");
    }

    #[test]
    fn test_upstream_errors_are_generic() {
        let err = ApiError::new(
            ProviderKind::Pixabay,
            ProxyError::UpstreamStatus {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "[ERROR 400] \"key\" is invalid".to_string(),
            },
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Failed to fetch from Pixabay");

        let err = ApiError::new(ProviderKind::Runware, ProxyError::NotConfigured("RUNWARE_MODEL"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Failed to fetch from Runware");
    }

    #[test]
    fn test_proxy_error_display_keeps_detail() {
        let err = ProxyError::UpstreamStatus {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }
}
