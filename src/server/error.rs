//! HTTP error mapping.
//!
//! The library reports failures as typed errors; this is the one place they
//! become status codes and response bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::oauth::OAuthError;
use crate::webhooks::WebhookError;

/// Errors a request handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A step of the install flow failed.
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// A webhook delivery was not authentic.
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl ApiError {
    /// Status code and plain-text body sent to the client.
    ///
    /// Upstream failures get a fixed message per step; the detailed error
    /// is logged instead of echoed.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::OAuth(
                err @ (OAuthError::InvalidShop { .. } | OAuthError::InvalidCallback { .. }),
            ) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::OAuth(OAuthError::TokenExchangeFailed { .. }) => (
                StatusCode::BAD_GATEWAY,
                "Error retrieving access token from Shopify".to_string(),
            ),
            Self::OAuth(OAuthError::MissingAccessToken) => (
                StatusCode::BAD_GATEWAY,
                "Failed to retrieve access token from Shopify".to_string(),
            ),
            Self::OAuth(OAuthError::StoreInfoFailed { .. }) => (
                StatusCode::BAD_GATEWAY,
                "Error retrieving store information from Shopify".to_string(),
            ),
            Self::Webhook(_) => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "Upstream request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, message).into_response()
    }
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;
