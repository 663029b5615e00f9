//! Error types for application configuration.
//!
//! Every value the service needs is validated once at startup. Construction of
//! any configuration type returns `Result<T, ConfigError>` so a misconfigured
//! deployment fails before it binds a socket rather than on the first request.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
///
/// Each variant carries enough context for an operator to fix the
/// deployment without reading the source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Environment variable '{name}' must be set.")]
    MissingEnvVar {
        /// The name of the missing variable.
        name: &'static str,
    },

    /// Client ID cannot be empty.
    #[error("Client ID cannot be empty. Please provide the app's Shopify client ID.")]
    EmptyApiKey,

    /// Client ID contains characters that are not URL-safe.
    #[error("Invalid client ID '{key}'. Only letters, digits, '-', '_', '.' and '~' are allowed.")]
    InvalidApiKey {
        /// The client ID that was provided.
        key: String,
    },

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the app's Shopify client secret.")]
    EmptyApiSecretKey,

    /// Webhook secret cannot be empty.
    #[error("Webhook secret cannot be empty. Unsigned webhooks would be accepted otherwise.")]
    EmptyWebhookSecret,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2024-01') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Scopes are invalid.
    #[error("Invalid scopes: {reason}")]
    InvalidScopes {
        /// The reason the scopes are invalid.
        reason: String,
    },

    /// Redirect URI is invalid.
    #[error("Invalid redirect URI '{url}'. Please provide an absolute URL without '&', '#' or extra query parameters (e.g., 'https://app.example.com/callback').")]
    InvalidRedirectUri {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Bind address is invalid.
    #[error("Invalid bind address '{address}'. Expected 'host:port' (e.g., '0.0.0.0:8000').")]
    InvalidBindAddress {
        /// The invalid address that was provided.
        address: String,
    },

    /// A required builder field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
