//! Webhook-specific error types.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::webhooks::WebhookError;
//!
//! let error = WebhookError::InvalidHmac;
//! assert_eq!(error.to_string(), "Webhook signature verification failed");
//! ```

use thiserror::Error;

/// Reasons an inbound webhook is rejected.
///
/// Both variants are expected outcomes for forged, replayed-with-edits or
/// malformed traffic. The server maps either one to `401 Unauthorized`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WebhookError {
    /// The request carried no `X-Shopify-Hmac-SHA256` header.
    #[error("Webhook request is missing the HMAC signature header")]
    MissingHmacHeader,

    /// The signature did not match the body under any configured secret.
    #[error("Webhook signature verification failed")]
    InvalidHmac,
}

// Verify WebhookError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebhookError>();
};
