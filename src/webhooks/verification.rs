//! Webhook signature verification.
//!
//! Shopify signs every webhook delivery with HMAC-SHA256 over the raw request
//! body and sends the base64-encoded digest in the `X-Shopify-Hmac-SHA256`
//! header. This module recomputes that digest and compares it in constant
//! time.
//!
//! - [`verify_hmac`]: low-level check of one signature against one secret
//! - [`verify_webhook`]: high-level check using [`AppConfig`], with
//!   fallback to the previous secret during rotation
//!
//! # Raw Body Requirement
//!
//! The body passed in must be the exact bytes received on the wire. Parsing
//! the JSON and re-serializing it changes whitespace and key order, which
//! changes the digest.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::webhooks::{compute_signature_base64, verify_hmac};
//!
//! let body = br#"{"id":1}"#;
//! let signature = compute_signature_base64(body, b"whsec_test");
//!
//! assert!(verify_hmac(Some(&signature), body, b"whsec_test"));
//! assert!(!verify_hmac(Some(&signature), br#"{"id":2}"#, b"whsec_test"));
//! assert!(!verify_hmac(None, body, b"whsec_test"));
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::AppConfig;
use crate::webhooks::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// HTTP header carrying the base64-encoded HMAC-SHA256 signature.
///
/// Header names are case-insensitive; Shopify documents this spelling.
pub const HEADER_HMAC: &str = "X-Shopify-Hmac-SHA256";

/// HTTP header carrying the webhook topic (e.g., `orders/create`).
pub const HEADER_TOPIC: &str = "X-Shopify-Topic";

/// HTTP header carrying the `*.myshopify.com` domain of the sending shop.
pub const HEADER_SHOP_DOMAIN: &str = "X-Shopify-Shop-Domain";

/// HTTP header carrying the API version of the payload.
pub const HEADER_API_VERSION: &str = "X-Shopify-API-Version";

/// HTTP header carrying the unique delivery ID.
pub const HEADER_WEBHOOK_ID: &str = "X-Shopify-Webhook-Id";

// ============================================================================
// Signature primitives
// ============================================================================

/// Computes `base64(HMAC-SHA256(secret, message))`.
///
/// # Example
///
/// ```rust
/// use shopify_connect::webhooks::compute_signature_base64;
///
/// let sig = compute_signature_base64(b"webhook payload", b"secret-key");
/// assert_eq!(sig.len(), 44); // 32 bytes, base64 with padding
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature_base64(message: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// Unequal lengths return `false`; only the length itself is observable.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Verifies a webhook signature against a single secret.
///
/// Returns `true` only when `hmac_header` is present, non-empty, and equal to
/// the base64 HMAC-SHA256 of `raw_body` keyed with `secret`. An empty secret
/// always fails; an unconfigured key must never authenticate anything.
///
/// This function never panics and never errors: a bad signature is an
/// ordinary outcome.
///
/// # Example
///
/// ```rust
/// use shopify_connect::webhooks::{compute_signature_base64, verify_hmac};
///
/// let body = b"payload";
/// let sig = compute_signature_base64(body, b"secret");
///
/// assert!(verify_hmac(Some(&sig), body, b"secret"));
/// assert!(!verify_hmac(Some(""), body, b"secret"));
/// assert!(!verify_hmac(Some(&compute_signature_base64(body, b"")), body, b""));
/// ```
#[must_use]
pub fn verify_hmac(hmac_header: Option<&str>, raw_body: &[u8], secret: &[u8]) -> bool {
    let Some(received) = hmac_header.filter(|h| !h.is_empty()) else {
        return false;
    };
    if secret.is_empty() {
        return false;
    }

    let expected = compute_signature_base64(raw_body, secret);
    constant_time_compare(&expected, received)
}

// ============================================================================
// WebhookRequest
// ============================================================================

/// An inbound webhook delivery: raw body plus the Shopify headers.
///
/// Exists only for the duration of one verification.
///
/// # Example
///
/// ```rust
/// use shopify_connect::webhooks::WebhookRequest;
///
/// let request = WebhookRequest::new(b"{}".to_vec(), Some("c2ln".to_string()))
///     .with_topic("orders/create")
///     .with_shop_domain("example.myshopify.com");
///
/// assert_eq!(request.body(), b"{}");
/// assert_eq!(request.topic(), Some("orders/create"));
/// assert_eq!(request.webhook_id(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    body: Vec<u8>,
    hmac_header: Option<String>,
    topic: Option<String>,
    shop_domain: Option<String>,
    api_version: Option<String>,
    webhook_id: Option<String>,
}

impl WebhookRequest {
    /// Creates a request from the raw body and the signature header, if any.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>, hmac_header: Option<String>) -> Self {
        Self {
            body: body.into(),
            hmac_header,
            ..Self::default()
        }
    }

    /// Sets the `X-Shopify-Topic` value.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the `X-Shopify-Shop-Domain` value.
    #[must_use]
    pub fn with_shop_domain(mut self, shop_domain: impl Into<String>) -> Self {
        self.shop_domain = Some(shop_domain.into());
        self
    }

    /// Sets the `X-Shopify-API-Version` value.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Sets the `X-Shopify-Webhook-Id` value.
    #[must_use]
    pub fn with_webhook_id(mut self, webhook_id: impl Into<String>) -> Self {
        self.webhook_id = Some(webhook_id.into());
        self
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the signature header value, if present.
    #[must_use]
    pub fn hmac_header(&self) -> Option<&str> {
        self.hmac_header.as_deref()
    }

    /// Returns the topic header value, if present.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Returns the shop domain header value, if present.
    #[must_use]
    pub fn shop_domain(&self) -> Option<&str> {
        self.shop_domain.as_deref()
    }

    /// Returns the API version header value, if present.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Returns the delivery ID header value, if present.
    #[must_use]
    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id.as_deref()
    }
}

// ============================================================================
// WebhookContext
// ============================================================================

/// Metadata of a delivery whose signature has been verified.
///
/// Only obtainable from [`verify_webhook`], so holding one means the headers
/// came with an authentic body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookContext {
    topic: Option<String>,
    shop_domain: Option<String>,
    api_version: Option<String>,
    webhook_id: Option<String>,
}

impl WebhookContext {
    /// Returns the topic, if the delivery carried one.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Returns the sending shop's domain, if present.
    #[must_use]
    pub fn shop_domain(&self) -> Option<&str> {
        self.shop_domain.as_deref()
    }

    /// Returns the payload API version, if present.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Returns the delivery ID, if present.
    ///
    /// Duplicate deliveries share an ID. Nothing here deduplicates them.
    #[must_use]
    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id.as_deref()
    }
}

// ============================================================================
// High-level verification
// ============================================================================

/// Verifies a webhook delivery using the configured secret(s).
///
/// The primary webhook secret is tried first, then the previous secret if
/// one is configured.
///
/// # Errors
///
/// - [`WebhookError::MissingHmacHeader`] if the request has no (or an empty)
///   signature header
/// - [`WebhookError::InvalidHmac`] if no configured secret produces a match
///
/// # Example
///
/// ```rust
/// use shopify_connect::webhooks::{compute_signature_base64, verify_webhook, WebhookRequest};
/// use shopify_connect::{AppConfig, ApiKey, ApiSecretKey, RedirectUri, WebhookSecret};
///
/// let config = AppConfig::builder()
///     .client_id(ApiKey::new("CID").unwrap())
///     .client_secret(ApiSecretKey::new("client-secret").unwrap())
///     .scopes("read_products".parse().unwrap())
///     .redirect_uri(RedirectUri::new("https://app.example.com/callback").unwrap())
///     .webhook_secret(WebhookSecret::new("whsec_test").unwrap())
///     .build()
///     .unwrap();
///
/// let body = br#"{"id":1}"#;
/// let request = WebhookRequest::new(
///     body.to_vec(),
///     Some(compute_signature_base64(body, b"whsec_test")),
/// )
/// .with_topic("orders/create");
///
/// let context = verify_webhook(&config, &request).unwrap();
/// assert_eq!(context.topic(), Some("orders/create"));
/// ```
pub fn verify_webhook(
    config: &AppConfig,
    request: &WebhookRequest,
) -> Result<WebhookContext, WebhookError> {
    let hmac_header = request
        .hmac_header()
        .filter(|h| !h.is_empty())
        .ok_or(WebhookError::MissingHmacHeader)?;

    let verified = std::iter::once(config.webhook_secret())
        .chain(config.previous_webhook_secret())
        .any(|secret| verify_hmac(Some(hmac_header), request.body(), secret.as_bytes()));

    if !verified {
        return Err(WebhookError::InvalidHmac);
    }

    Ok(WebhookContext {
        topic: request.topic().map(String::from),
        shop_domain: request.shop_domain().map(String::from),
        api_version: request.api_version().map(String::from),
        webhook_id: request.webhook_id().map(String::from),
    })
}
