//! HTTP server: routes, shared state and error mapping.
//!
//! | Route | Method | Purpose |
//! |---|---|---|
//! | `/` | GET | install form |
//! | `/connect` | GET | redirect to Shopify's authorization URL |
//! | `/callback` | GET | exchange the code, return the store connection |
//! | `/webhook` | POST | verify the signature, acknowledge |
//! | `/health` | GET | liveness probe |

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::oauth::ShopifyClient;
use crate::config::AppConfig;

/// Shared application state.
///
/// Everything in here is read-only after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Client for the Shopify OAuth and Admin endpoints
    pub shopify: ShopifyClient,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: AppConfig, shopify: ShopifyClient) -> Self {
        Self {
            config: Arc::new(config),
            shopify,
        }
    }
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/connect", get(handlers::connect))
        .route("/callback", get(handlers::callback))
        .route("/webhook", post(handlers::webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
