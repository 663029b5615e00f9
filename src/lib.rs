//! # Shopify Connect
//!
//! Installs a third-party app into a merchant's Shopify store via the OAuth
//! authorization code flow, and authenticates the webhooks Shopify sends
//! afterwards.
//!
//! ## Overview
//!
//! - Type-safe configuration via [`AppConfig`] and [`AppConfigBuilder`],
//!   loaded once at startup from the environment
//! - Validated newtypes for credentials, shop domains and the callback URL
//! - Authorization URL construction and code-for-token exchange via
//!   [`auth::oauth`]
//! - HMAC-SHA256 webhook verification via [`webhooks`]
//! - An axum router exposing the install and webhook endpoints via [`server`]
//!
//! ## Webhook Verification
//!
//! ```rust
//! use shopify_connect::webhooks::{compute_signature_base64, verify_hmac};
//!
//! let body = br#"{"id":1}"#;
//! let signature = compute_signature_base64(body, b"whsec_test");
//!
//! assert!(verify_hmac(Some(&signature), body, b"whsec_test"));
//! assert!(!verify_hmac(Some(&signature), br#"{"id":2}"#, b"whsec_test"));
//! ```
//!
//! ## Running the Server
//!
//! ```rust,ignore
//! use shopify_connect::{AppConfig, auth::oauth::ShopifyClient, server};
//!
//! let config = AppConfig::from_env()?;
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! let app = server::create_router(server::AppState::new(config, ShopifyClient::new()));
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is built once and passed explicitly
//! - **Fail-fast validation**: misconfiguration stops the process at startup
//! - **Fail closed**: verification failures are values, never panics, and
//!   an empty secret authenticates nothing
//! - **Thread-safe**: all shared types are `Send + Sync`

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod webhooks;

pub use auth::AuthScopes;
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, AppConfig, AppConfigBuilder, RedirectUri, ShopDomain,
    WebhookSecret,
};
pub use error::ConfigError;

pub use auth::oauth::{authorization_url, OAuthError, ShopifyClient, StoreConnection};
pub use webhooks::{verify_hmac, verify_webhook, WebhookError};
