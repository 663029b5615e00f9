//! Inbound webhook authentication.
//!
//! Shopify delivers webhooks as `POST` requests whose raw body is signed with
//! HMAC-SHA256. This module decides whether a delivery is authentic; it does
//! not interpret the payload.
//!
//! - [`verify_hmac`]: pure signature check, `true`/`false`
//! - [`verify_webhook`]: config-driven check returning a [`WebhookContext`]
//! - [`WebhookRequest`]: raw body plus Shopify headers
//! - [`WebhookError`]: why a delivery was rejected
//!
//! Verification is synchronous, allocation-light and holds no state, so it
//! can run on any number of request tasks at once.

mod errors;
mod verification;

pub use errors::WebhookError;
pub use verification::{
    compute_signature_base64, constant_time_compare, verify_hmac, verify_webhook, WebhookContext,
    WebhookRequest, HEADER_API_VERSION, HEADER_HMAC, HEADER_SHOP_DOMAIN, HEADER_TOPIC,
    HEADER_WEBHOOK_ID,
};
