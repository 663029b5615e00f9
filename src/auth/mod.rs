//! Authentication for Shopify store installs.
//!
//! # Overview
//!
//! - [`AuthScopes`]: the OAuth scopes requested at install time
//! - [`oauth`]: authorization URL construction, code exchange and store lookup
//!
//! # Install Flow
//!
//! ```rust,ignore
//! use shopify_connect::auth::oauth::{authorization_url, ShopifyClient};
//!
//! // 1. Send the merchant to Shopify's consent screen
//! let url = authorization_url(&config, &shop);
//!
//! // 2. On the callback, trade the code for a token and look up the store
//! let connection = ShopifyClient::new().connect_store(&config, &shop, &code).await?;
//! ```

pub mod oauth;
mod scopes;

pub use scopes::AuthScopes;
