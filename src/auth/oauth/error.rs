//! OAuth-specific error types.
//!
//! Each step of the install flow fails with its own variant so the caller
//! can tell the merchant exactly which step broke.
//!
//! # Error Types
//!
//! - [`OAuthError::InvalidShop`]: the `shop` parameter is not a `*.myshopify.com` domain
//! - [`OAuthError::InvalidCallback`]: callback parameters are missing or malformed
//! - [`OAuthError::TokenExchangeFailed`]: the code-for-token request failed
//! - [`OAuthError::MissingAccessToken`]: the token response had no access token
//! - [`OAuthError::StoreInfoFailed`]: the `shop.json` lookup failed
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::auth::oauth::OAuthError;
//!
//! let error = OAuthError::TokenExchangeFailed {
//!     status: 400,
//!     message: "invalid_request".to_string(),
//! };
//! assert!(error.to_string().contains("400"));
//! ```

use thiserror::Error;

/// Errors that can occur during the OAuth install flow.
///
/// No variant is retried. A failure ends the request it occurred in and has
/// no effect on later requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// The shop parameter is not a valid Shopify shop domain.
    #[error("Invalid shop domain: '{shop}'")]
    InvalidShop {
        /// The value that was supplied.
        shop: String,
    },

    /// Callback parameters are invalid or missing.
    #[error("Invalid callback: {reason}")]
    InvalidCallback {
        /// Description of what's invalid about the callback.
        reason: String,
    },

    /// Token exchange request failed.
    ///
    /// `status` is `0` when no HTTP response was received at all.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The response body or transport error.
        message: String,
    },

    /// The token endpoint answered `200` without an access token.
    #[error("Token exchange response did not contain an access token")]
    MissingAccessToken,

    /// Fetching store metadata with the new token failed.
    ///
    /// `status` is `0` when no HTTP response was received at all.
    #[error("Store information request failed with status {status}: {message}")]
    StoreInfoFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The response body, parse error or transport error.
        message: String,
    },
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
