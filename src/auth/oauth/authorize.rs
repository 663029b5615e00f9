//! OAuth authorization URL generation.
//!
//! The first step of an install: send the merchant to their shop's consent
//! screen, which will redirect back to the configured callback with a code.

use crate::auth::oauth::error::OAuthError;
use crate::config::{AppConfig, ShopDomain};

/// Parses a user- or Shopify-supplied `shop` parameter.
///
/// # Errors
///
/// Returns [`OAuthError::InvalidShop`] unless the value is a bare shop name
/// or a `*.myshopify.com` domain. Anything else would let a caller point the
/// redirect or the token exchange at an arbitrary host.
pub fn parse_shop(raw: &str) -> Result<ShopDomain, OAuthError> {
    ShopDomain::new(raw).map_err(|_| OAuthError::InvalidShop {
        shop: raw.to_string(),
    })
}

/// Builds the Shopify authorization URL for `shop`.
///
/// Produces
/// `https://{shop}/admin/oauth/authorize?client_id={id}&scope={scopes}&redirect_uri={uri}`.
/// The configured values are validated at startup and inserted as-is.
///
/// # Example
///
/// ```rust
/// use shopify_connect::{AppConfig, ApiKey, ApiSecretKey, RedirectUri, ShopDomain, WebhookSecret};
/// use shopify_connect::auth::oauth::authorization_url;
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
/// let shop = ShopDomain::new("example.myshopify.com").unwrap();
/// assert_eq!(
///     authorization_url(&config, &shop),
///     "https://example.myshopify.com/admin/oauth/authorize?client_id=CID&scope=read_products&redirect_uri=https://app.example.com/callback"
/// );
/// ```
#[must_use]
pub fn authorization_url(config: &AppConfig, shop: &ShopDomain) -> String {
    format!(
        "https://{shop}/admin/oauth/authorize?client_id={client_id}&scope={scope}&redirect_uri={redirect_uri}",
        client_id = config.client_id().as_ref(),
        scope = config.scopes(),
        redirect_uri = config.redirect_uri().as_ref(),
    )
}
