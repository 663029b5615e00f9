//! Authorization code exchange and store lookup.
//!
//! After the merchant approves the install, Shopify redirects to the callback
//! with `code` and `shop`. [`ShopifyClient::connect_store`] then:
//!
//! 1. POSTs the code to `https://{shop}/admin/oauth/access_token`
//! 2. GETs `https://{shop}/admin/api/{version}/shop.json` with the new token
//! 3. Returns a [`StoreConnection`] summarizing the result
//!
//! Each step fails with its own [`OAuthError`] variant. Nothing is retried
//! and nothing is stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auth::oauth::error::OAuthError;
use crate::auth::AuthScopes;
use crate::config::{AppConfig, ShopDomain};

/// Header used to authenticate Admin API requests.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Message returned alongside a successful connection.
pub const CONNECTED_MESSAGE: &str = "Successfully connected to Shopify";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShopEnvelope {
    #[serde(default)]
    shop: ShopInfo,
}

/// An offline access token for one shop.
///
/// The token value is masked in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    scopes: AuthScopes,
}

impl AccessToken {
    /// Returns the raw token for use in the access token header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Returns the scopes Shopify reported as granted.
    ///
    /// Empty if the response did not list them.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"*****")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Store metadata from `shop.json`.
///
/// Only the fields this service reads are modeled; the rest are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ShopInfo {
    /// The permanent `*.myshopify.com` domain.
    pub myshopify_domain: Option<String>,
    /// The store's display name.
    pub name: Option<String>,
    /// The store's primary (possibly custom) domain.
    pub domain: Option<String>,
}

/// The result of a completed install, returned to the caller as JSON.
///
/// Field names follow the hosting platform's store credentials shape:
/// `hostname` is the store's myshopify domain, `password` the access token
/// and `api_key` the app's client ID.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct StoreConnection {
    /// Human-readable status.
    pub message: String,
    /// The store's `myshopify_domain`, if Shopify returned one.
    pub hostname: Option<String>,
    /// The access token.
    pub password: String,
    /// The app's client ID.
    pub api_key: String,
}

impl fmt::Debug for StoreConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConnection")
            .field("message", &self.message)
            .field("hostname", &self.hostname)
            .field("password", &"*****")
            .field("api_key", &self.api_key)
            .finish()
    }
}

/// HTTP client for the Shopify OAuth and Admin endpoints.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_connect::auth::oauth::{parse_shop, ShopifyClient};
///
/// let client = ShopifyClient::new();
/// let shop = parse_shop("example.myshopify.com")?;
/// let connection = client.connect_store(&config, &shop, "auth-code").await?;
/// println!("Connected {:?}", connection.hostname);
/// ```
#[derive(Clone, Debug)]
pub struct ShopifyClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl Default for ShopifyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ShopifyClient {
    /// Creates a client that talks to `https://{shop}` directly.
    #[must_use]
    pub fn new() -> Self {
        let http = match reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build HTTP client, using defaults");
                reqwest::Client::default()
            }
        };

        Self {
            http,
            base_url: None,
        }
    }

    /// Creates a client that sends every shop's requests to `base_url`.
    ///
    /// Used to point the client at a mock server in tests.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
            ..Self::new()
        }
    }

    fn shop_url(&self, shop: &ShopDomain, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}{path}"),
            None => format!("https://{shop}{path}"),
        }
    }

    /// Exchanges an authorization code for an offline access token.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::InvalidCallback`] if `code` is empty
    /// - [`OAuthError::TokenExchangeFailed`] on a transport error or any
    ///   status other than `200`
    /// - [`OAuthError::MissingAccessToken`] if the response carries no token
    pub async fn exchange_code(
        &self,
        config: &AppConfig,
        shop: &ShopDomain,
        code: &str,
    ) -> Result<AccessToken, OAuthError> {
        if code.trim().is_empty() {
            return Err(OAuthError::InvalidCallback {
                reason: "authorization code is empty".to_string(),
            });
        }

        let url = self.shop_url(shop, "/admin/oauth/access_token");
        tracing::debug!(shop = %shop, "Exchanging authorization code for access token");

        let form: [(&str, &str); 3] = [
            ("client_id", config.client_id().as_ref()),
            ("client_secret", config.client_secret().as_ref()),
            ("code", code),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed {
                status: 0,
                message: format!("Network error: {e}"),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(shop = %shop, status = status.as_u16(), "Token exchange rejected");
            return Err(OAuthError::TokenExchangeFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body: AccessTokenResponse = response.json().await.map_err(|e| {
            OAuthError::TokenExchangeFailed {
                status: status.as_u16(),
                message: format!("Failed to parse token response: {e}"),
            }
        })?;

        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingAccessToken)?;

        let scopes = body
            .scope
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Ok(AccessToken { token, scopes })
    }

    /// Fetches store metadata using an access token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::StoreInfoFailed`] on a transport error, any
    /// status other than `200`, or a body that is not JSON.
    pub async fn fetch_shop(
        &self,
        config: &AppConfig,
        shop: &ShopDomain,
        token: &AccessToken,
    ) -> Result<ShopInfo, OAuthError> {
        let url = self.shop_url(shop, &config.api_version().admin_path("shop.json"));
        tracing::debug!(
            shop = %shop,
            api_version = %config.api_version(),
            "Fetching store information"
        );

        let response = self
            .http
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, token.as_str())
            .send()
            .await
            .map_err(|e| OAuthError::StoreInfoFailed {
                status: 0,
                message: format!("Network error: {e}"),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(
                shop = %shop,
                status = status.as_u16(),
                "Store information request rejected"
            );
            return Err(OAuthError::StoreInfoFailed {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ShopEnvelope = response.json().await.map_err(|e| {
            OAuthError::StoreInfoFailed {
                status: status.as_u16(),
                message: format!("Failed to parse shop response: {e}"),
            }
        })?;

        Ok(envelope.shop)
    }

    /// Runs the full callback flow: code exchange, then store lookup.
    ///
    /// Logs a warning when Shopify granted fewer scopes than were requested;
    /// the connection still succeeds.
    ///
    /// # Errors
    ///
    /// Propagates the [`OAuthError`] of whichever step failed.
    pub async fn connect_store(
        &self,
        config: &AppConfig,
        shop: &ShopDomain,
        code: &str,
    ) -> Result<StoreConnection, OAuthError> {
        let token = self.exchange_code(config, shop, code).await?;

        if !token.scopes().is_empty() && !token.scopes().covers(config.scopes()) {
            tracing::warn!(
                shop = %shop,
                requested = %config.scopes(),
                granted = %token.scopes(),
                "Granted scopes do not cover requested scopes"
            );
        }

        let info = self.fetch_shop(config, shop, &token).await?;
        tracing::info!(shop = %shop, name = ?info.name, "Store connected");

        Ok(StoreConnection {
            message: CONNECTED_MESSAGE.to_string(),
            hostname: info.myshopify_domain,
            password: token.token,
            api_key: config.client_id().as_ref().to_string(),
        })
    }
}

// Verify ShopifyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyClient>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, RedirectUri, WebhookSecret};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> AppConfig {
        AppConfig::builder()
            .client_id(ApiKey::new("CID").unwrap())
            .client_secret(ApiSecretKey::new("client-secret").unwrap())
            .scopes("read_products".parse().unwrap())
            .redirect_uri(RedirectUri::new("https://app.example.com/callback").unwrap())
            .webhook_secret(WebhookSecret::new("whsec_test").unwrap())
            .build()
            .unwrap()
    }

    fn test_shop() -> ShopDomain {
        ShopDomain::new("example.myshopify.com").unwrap()
    }

    #[test]
    fn test_shop_url_targets_shop_by_default() {
        let client = ShopifyClient::new();
        assert_eq!(
            client.shop_url(&test_shop(), "/admin/oauth/access_token"),
            "https://example.myshopify.com/admin/oauth/access_token"
        );
    }

    #[test]
    fn test_shop_url_uses_base_url_override() {
        let client = ShopifyClient::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(
            client.shop_url(&test_shop(), "/admin/api/2023-04/shop.json"),
            "http://127.0.0.1:9999/admin/api/2023-04/shop.json"
        );
    }

    #[test]
    fn test_debug_output_masks_tokens() {
        let token = AccessToken {
            token: "shpat_secret".to_string(),
            scopes: AuthScopes::new(),
        };
        assert!(!format!("{token:?}").contains("shpat_secret"));

        let connection = StoreConnection {
            message: CONNECTED_MESSAGE.to_string(),
            hostname: None,
            password: "shpat_secret".to_string(),
            api_key: "CID".to_string(),
        };
        assert!(!format!("{connection:?}").contains("shpat_secret"));
    }

    #[test]
    fn test_store_connection_serializes_expected_fields() {
        let connection = StoreConnection {
            message: CONNECTED_MESSAGE.to_string(),
            hostname: Some("example.myshopify.com".to_string()),
            password: "shpat_123".to_string(),
            api_key: "CID".to_string(),
        };

        let json = serde_json::to_value(&connection).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Successfully connected to Shopify",
                "hostname": "example.myshopify.com",
                "password": "shpat_123",
                "api_key": "CID"
            })
        );
    }

    #[tokio::test]
    async fn test_exchange_code_rejects_empty_code_without_network() {
        let client = ShopifyClient::with_base_url("http://127.0.0.1:9");
        let result = client
            .exchange_code(&create_test_config(), &test_shop(), "  ")
            .await;

        assert!(matches!(result, Err(OAuthError::InvalidCallback { .. })));
    }

    #[tokio::test]
    async fn test_exchange_code_posts_form_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("client_id=CID"))
            .and(body_string_contains("client_secret=client-secret"))
            .and(body_string_contains("code=auth-code-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "shpat_123",
                "scope": "write_products"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ShopifyClient::with_base_url(mock_server.uri());
        let token = client
            .exchange_code(&create_test_config(), &test_shop(), "auth-code-123")
            .await
            .unwrap();

        assert_eq!(token.as_str(), "shpat_123");
        assert!(token.scopes().covers(&"read_products".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_requests_carry_crate_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "shpat_123"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ShopifyClient::with_base_url(mock_server.uri());
        let token = client
            .exchange_code(&create_test_config(), &test_shop(), "auth-code")
            .await
            .unwrap();

        assert_eq!(token.as_str(), "shpat_123");
    }

    #[tokio::test]
    async fn test_exchange_code_maps_non_200_to_token_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_request"))
            .mount(&mock_server)
            .await;

        let client = ShopifyClient::with_base_url(mock_server.uri());
        let result = client
            .exchange_code(&create_test_config(), &test_shop(), "bad-code")
            .await;

        assert_eq!(
            result.unwrap_err(),
            OAuthError::TokenExchangeFailed {
                status: 400,
                message: "invalid_request".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_exchange_code_requires_access_token_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "scope": "read_products"
            })))
            .mount(&mock_server)
            .await;

        let client = ShopifyClient::with_base_url(mock_server.uri());
        let result = client
            .exchange_code(&create_test_config(), &test_shop(), "code")
            .await;

        assert_eq!(result.unwrap_err(), OAuthError::MissingAccessToken);
    }

    #[tokio::test]
    async fn test_fetch_shop_sends_token_header_and_versioned_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/2023-04/shop.json"))
            .and(header(ACCESS_TOKEN_HEADER, "shpat_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shop": {
                    "id": 1,
                    "name": "Example",
                    "myshopify_domain": "example.myshopify.com",
                    "domain": "shop.example.com"
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ShopifyClient::with_base_url(mock_server.uri());
        let token = AccessToken {
            token: "shpat_123".to_string(),
            scopes: AuthScopes::new(),
        };
        let info = client
            .fetch_shop(&create_test_config(), &test_shop(), &token)
            .await
            .unwrap();

        assert_eq!(info.myshopify_domain.as_deref(), Some("example.myshopify.com"));
        assert_eq!(info.name.as_deref(), Some("Example"));
        assert_eq!(info.domain.as_deref(), Some("shop.example.com"));
    }

    #[tokio::test]
    async fn test_fetch_shop_tolerates_missing_shop_object() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/2023-04/shop.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = ShopifyClient::with_base_url(mock_server.uri());
        let token = AccessToken {
            token: "shpat_123".to_string(),
            scopes: AuthScopes::new(),
        };
        let info = client
            .fetch_shop(&create_test_config(), &test_shop(), &token)
            .await
            .unwrap();

        assert_eq!(info, ShopInfo::default());
    }
}
