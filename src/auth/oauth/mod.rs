//! OAuth 2.0 authorization code flow for Shopify app installs.
//!
//! # Flow
//!
//! 1. [`authorization_url`] sends the merchant to
//!    `https://{shop}/admin/oauth/authorize` with the app's client ID,
//!    requested scopes and callback URL.
//! 2. Shopify redirects back with `code` and `shop`;
//!    [`ShopifyClient::connect_store`] exchanges the code for an access token
//!    and looks up the store's metadata.
//!
//! The flow is stateless: no tokens are persisted or refreshed, and a failed
//! call is reported, not retried.

mod authorize;
mod client;
mod error;

pub use authorize::{authorization_url, parse_shop};
pub use client::{
    AccessToken, ShopInfo, ShopifyClient, StoreConnection, ACCESS_TOKEN_HEADER, CONNECTED_MESSAGE,
};
pub use error::OAuthError;
