//! Request handlers.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::AppState;
use crate::auth::oauth::{authorization_url, parse_shop, OAuthError, StoreConnection};
use crate::webhooks::{
    verify_webhook, WebhookRequest, HEADER_API_VERSION, HEADER_HMAC, HEADER_SHOP_DOMAIN,
    HEADER_TOPIC, HEADER_WEBHOOK_ID,
};

const INSTALL_FORM: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Connect your Shopify store</title></head>
  <body>
    <h1>Connect your Shopify store</h1>
    <form action="/connect" method="GET">
      <input type="text" name="shop" placeholder="example.myshopify.com" required>
      <button type="submit">Connect Shopify</button>
    </form>
  </body>
</html>
"#;

/// Query parameters for `/connect`.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    shop: Option<String>,
}

/// Query parameters Shopify sends to `/callback`.
///
/// Shopify also sends `hmac`, `host`, `state` and `timestamp`; they are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    shop: Option<String>,
}

/// Body returned for an accepted webhook.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    message: &'static str,
}

/// `GET /` - the install form.
pub async fn home() -> Html<&'static str> {
    Html(INSTALL_FORM)
}

/// `GET /health` - liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /connect?shop=` - redirect to Shopify's consent screen.
pub async fn connect(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
) -> ApiResult<impl IntoResponse> {
    let shop = parse_shop(query.shop.as_deref().unwrap_or_default())?;
    let location = authorization_url(&state.config, &shop);

    tracing::info!(shop = %shop, "Redirecting to Shopify authorization");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

/// `GET /callback?code=&shop=` - finish the install.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Json<StoreConnection>> {
    let shop = parse_shop(query.shop.as_deref().unwrap_or_default())?;
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| OAuthError::InvalidCallback {
            reason: "missing 'code' parameter".to_string(),
        })?;

    let connection = state
        .shopify
        .connect_store(&state.config, &shop, &code)
        .await?;

    Ok(Json(connection))
}

/// `POST /webhook` - authenticate and acknowledge a delivery.
///
/// The body is taken as raw bytes so the signature is checked over exactly
/// what Shopify sent.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut request = WebhookRequest::new(body.to_vec(), header_value(HEADER_HMAC));
    if let Some(topic) = header_value(HEADER_TOPIC) {
        request = request.with_topic(topic);
    }
    if let Some(shop_domain) = header_value(HEADER_SHOP_DOMAIN) {
        request = request.with_shop_domain(shop_domain);
    }
    if let Some(api_version) = header_value(HEADER_API_VERSION) {
        request = request.with_api_version(api_version);
    }
    if let Some(webhook_id) = header_value(HEADER_WEBHOOK_ID) {
        request = request.with_webhook_id(webhook_id);
    }

    let context = verify_webhook(&state.config, &request)?;

    tracing::info!(
        topic = context.topic().unwrap_or("-"),
        shop = context.shop_domain().unwrap_or("-"),
        webhook_id = context.webhook_id().unwrap_or("-"),
        bytes = body.len(),
        "Webhook received"
    );

    Ok(Json(WebhookAck {
        message: "Webhook received",
    }))
}
