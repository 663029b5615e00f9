//! Configuration for the store connector.
//!
//! # Overview
//!
//! - [`AppConfig`]: every credential and setting the service needs
//! - [`AppConfigBuilder`]: a builder for constructing [`AppConfig`] instances
//! - [`ApiKey`], [`ApiSecretKey`], [`WebhookSecret`]: validated credentials
//! - [`ShopDomain`]: a validated `*.myshopify.com` domain
//! - [`RedirectUri`]: the OAuth callback URL
//! - [`ApiVersion`]: the Admin API version used for the store lookup
//!
//! Configuration is loaded once at startup, either from the process
//! environment via [`AppConfig::from_env`] or from any key/value source via
//! [`AppConfig::from_lookup`]. It is then shared read-only by every request.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{AppConfig, ApiKey, ApiSecretKey, RedirectUri, WebhookSecret};
//!
//! let config = AppConfig::builder()
//!     .client_id(ApiKey::new("CID").unwrap())
//!     .client_secret(ApiSecretKey::new("client-secret").unwrap())
//!     .scopes("read_products".parse().unwrap())
//!     .redirect_uri(RedirectUri::new("https://app.example.com/callback").unwrap())
//!     .webhook_secret(WebhookSecret::new("whsec_test").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.scopes().to_string(), "read_products");
//! ```

mod newtypes;
mod version;

pub use newtypes::{ApiKey, ApiSecretKey, RedirectUri, ShopDomain, WebhookSecret};
pub use version::ApiVersion;

use crate::auth::AuthScopes;
use crate::error::ConfigError;
use std::net::SocketAddr;

/// Environment variable names read by [`AppConfig::from_env`].
pub mod env_vars {
    /// App client ID.
    pub const CLIENT_ID: &str = "CLIENT_ID";
    /// App client secret.
    pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
    /// Comma-separated OAuth scopes.
    pub const SCOPES: &str = "SCOPES";
    /// OAuth callback URL.
    pub const REDIRECT_URI: &str = "REDIRECT_URI";
    /// Webhook HMAC key.
    pub const SHOPIFY_SECRET: &str = "SHOPIFY_SECRET";
    /// Previous webhook HMAC key, accepted during rotation.
    pub const SHOPIFY_SECRET_PREVIOUS: &str = "SHOPIFY_SECRET_PREVIOUS";
    /// Admin API version for the store lookup.
    pub const SHOPIFY_API_VERSION: &str = "SHOPIFY_API_VERSION";
    /// Listen address for the HTTP server.
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
}

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Application configuration.
///
/// Immutable once built. `AppConfig` is `Clone`, `Send`, and `Sync`; the
/// server wraps it in an `Arc` and hands it to handlers through axum state.
///
/// # Secret Rotation
///
/// `previous_webhook_secret` lets webhooks signed with the old key keep
/// verifying while Shopify switches over to the new one.
#[derive(Clone, Debug)]
pub struct AppConfig {
    client_id: ApiKey,
    client_secret: ApiSecretKey,
    scopes: AuthScopes,
    redirect_uri: RedirectUri,
    webhook_secret: WebhookSecret,
    previous_webhook_secret: Option<WebhookSecret>,
    api_version: ApiVersion,
    bind_address: SocketAddr,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing or invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration from an arbitrary key/value source.
    ///
    /// Values that are present but blank are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing or invalid value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use shopify_connect::{AppConfig, ConfigError};
    ///
    /// let vars: HashMap<&str, &str> = HashMap::from([("CLIENT_ID", "CID")]);
    /// let result = AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
    /// assert!(matches!(
    ///     result,
    ///     Err(ConfigError::MissingEnvVar { name: "CLIENT_SECRET" })
    /// ));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let required =
            |name: &'static str| optional(name).ok_or(ConfigError::MissingEnvVar { name });

        let mut builder = AppConfigBuilder::new()
            .client_id(ApiKey::new(required(env_vars::CLIENT_ID)?)?)
            .client_secret(ApiSecretKey::new(required(env_vars::CLIENT_SECRET)?)?)
            .scopes(required(env_vars::SCOPES)?.parse()?)
            .redirect_uri(RedirectUri::new(required(env_vars::REDIRECT_URI)?)?)
            .webhook_secret(WebhookSecret::new(required(env_vars::SHOPIFY_SECRET)?)?);

        if let Some(previous) = optional(env_vars::SHOPIFY_SECRET_PREVIOUS) {
            builder = builder.previous_webhook_secret(WebhookSecret::new(previous)?);
        }

        if let Some(version) = optional(env_vars::SHOPIFY_API_VERSION) {
            builder = builder.api_version(version.parse()?);
        }

        if let Some(address) = optional(env_vars::BIND_ADDRESS) {
            builder = builder.bind_address(parse_bind_address(&address)?);
        }

        builder.build()
    }

    /// Returns the app client ID.
    #[must_use]
    pub const fn client_id(&self) -> &ApiKey {
        &self.client_id
    }

    /// Returns the app client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ApiSecretKey {
        &self.client_secret
    }

    /// Returns the OAuth scopes requested at install.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the OAuth callback URL.
    #[must_use]
    pub const fn redirect_uri(&self) -> &RedirectUri {
        &self.redirect_uri
    }

    /// Returns the webhook HMAC key.
    #[must_use]
    pub const fn webhook_secret(&self) -> &WebhookSecret {
        &self.webhook_secret
    }

    /// Returns the previous webhook HMAC key, if configured.
    #[must_use]
    pub const fn previous_webhook_secret(&self) -> Option<&WebhookSecret> {
        self.previous_webhook_secret.as_ref()
    }

    /// Returns the Admin API version used for the store lookup.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the address the HTTP server listens on.
    #[must_use]
    pub const fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }
}

// Verify AppConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppConfig>();
};

fn parse_bind_address(address: &str) -> Result<SocketAddr, ConfigError> {
    address
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBindAddress {
            address: address.to_string(),
        })
}

/// Builder for constructing [`AppConfig`] instances.
///
/// Required fields are `client_id`, `client_secret`, `scopes`,
/// `redirect_uri` and `webhook_secret`.
///
/// # Defaults
///
/// - `api_version`: [`ApiVersion::DEFAULT`] (`2023-04`)
/// - `bind_address`: `0.0.0.0:8000`
/// - `previous_webhook_secret`: `None`
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    client_id: Option<ApiKey>,
    client_secret: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    redirect_uri: Option<RedirectUri>,
    webhook_secret: Option<WebhookSecret>,
    previous_webhook_secret: Option<WebhookSecret>,
    api_version: Option<ApiVersion>,
    bind_address: Option<SocketAddr>,
}

impl AppConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the app client ID (required).
    #[must_use]
    pub fn client_id(mut self, key: ApiKey) -> Self {
        self.client_id = Some(key);
        self
    }

    /// Sets the app client secret (required).
    #[must_use]
    pub fn client_secret(mut self, key: ApiSecretKey) -> Self {
        self.client_secret = Some(key);
        self
    }

    /// Sets the OAuth scopes (required, non-empty).
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the OAuth callback URL (required).
    #[must_use]
    pub fn redirect_uri(mut self, uri: RedirectUri) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Sets the webhook HMAC key (required).
    #[must_use]
    pub fn webhook_secret(mut self, secret: WebhookSecret) -> Self {
        self.webhook_secret = Some(secret);
        self
    }

    /// Sets the previous webhook HMAC key for rotation.
    #[must_use]
    pub fn previous_webhook_secret(mut self, secret: WebhookSecret) -> Self {
        self.previous_webhook_secret = Some(secret);
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the HTTP listen address.
    #[must_use]
    pub const fn bind_address(mut self, address: SocketAddr) -> Self {
        self.bind_address = Some(address);
        self
    }

    /// Builds the [`AppConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if a required field is
    /// not set, or [`ConfigError::InvalidScopes`] if no scopes are requested.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;
        let scopes = self
            .scopes
            .ok_or(ConfigError::MissingRequiredField { field: "scopes" })?;
        if scopes.is_empty() {
            return Err(ConfigError::InvalidScopes {
                reason: "at least one scope must be requested".to_string(),
            });
        }
        let redirect_uri = self
            .redirect_uri
            .ok_or(ConfigError::MissingRequiredField {
                field: "redirect_uri",
            })?;
        let webhook_secret = self
            .webhook_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "webhook_secret",
            })?;

        let bind_address = match self.bind_address {
            Some(address) => address,
            None => parse_bind_address(DEFAULT_BIND_ADDRESS)?,
        };

        Ok(AppConfig {
            client_id,
            client_secret,
            scopes,
            redirect_uri,
            webhook_secret,
            previous_webhook_secret: self.previous_webhook_secret,
            api_version: self.api_version.unwrap_or_default(),
            bind_address,
        })
    }
}
