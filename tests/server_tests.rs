//! Router-level tests for the HTTP endpoints.
//!
//! Requests go through the full axum router via `oneshot`; Shopify is
//! replaced by a wiremock server for `/callback`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopify_connect::auth::oauth::ShopifyClient;
use shopify_connect::server::{create_router, AppState};
use shopify_connect::webhooks::compute_signature_base64;
use shopify_connect::{ApiKey, ApiSecretKey, AppConfig, RedirectUri, WebhookSecret};

const WEBHOOK_SECRET: &str = "whsec_test";

fn test_config() -> AppConfig {
    AppConfig::builder()
        .client_id(ApiKey::new("CID").unwrap())
        .client_secret(ApiSecretKey::new("client-secret").unwrap())
        .scopes("read_products".parse().unwrap())
        .redirect_uri(RedirectUri::new("https://app.example.com/callback").unwrap())
        .webhook_secret(WebhookSecret::new(WEBHOOK_SECRET).unwrap())
        .build()
        .unwrap()
}

fn app() -> Router {
    create_router(AppState::new(test_config(), ShopifyClient::new()))
}

fn app_with_mock(server: &MockServer) -> Router {
    create_router(AppState::new(
        test_config(),
        ShopifyClient::with_base_url(server.uri()),
    ))
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn webhook_request(body: &'static [u8], hmac: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Shopify-Topic", "orders/create")
        .header("X-Shopify-Shop-Domain", "example.myshopify.com");
    if let Some(hmac) = hmac {
        builder = builder.header("X-Shopify-Hmac-SHA256", hmac);
    }
    builder.body(Body::from(body)).unwrap()
}

// === Install form ===

#[tokio::test]
async fn test_home_serves_install_form() {
    let response = get(app(), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let body = body_string(response).await;
    assert!(body.contains(r#"action="/connect""#));
    assert!(body.contains(r#"name="shop""#));
}

#[tokio::test]
async fn test_health() {
    let response = get(app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

// === /connect ===

#[tokio::test]
async fn test_connect_redirects_to_exact_authorization_url() {
    let response = get(app(), "/connect?shop=example.myshopify.com").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.myshopify.com/admin/oauth/authorize?client_id=CID&scope=read_products&redirect_uri=https://app.example.com/callback"
    );
}

#[tokio::test]
async fn test_connect_accepts_bare_shop_name() {
    let response = get(app(), "/connect?shop=example").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .starts_with("https://example.myshopify.com/admin/oauth/authorize?"));
}

#[tokio::test]
async fn test_connect_rejects_foreign_host() {
    let response = get(app(), "/connect?shop=attacker.example.com").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn test_connect_rejects_missing_shop() {
    let response = get(app(), "/connect").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// === /callback ===

#[tokio::test]
async fn test_callback_success_returns_store_connection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "shpat_abc",
            "scope": "read_products"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2023-04/shop.json"))
        .and(header_matcher("X-Shopify-Access-Token", "shpat_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shop": {
                "name": "Example",
                "myshopify_domain": "example.myshopify.com",
                "domain": "example.com"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(
        app_with_mock(&server),
        "/callback?code=auth-code&shop=example.myshopify.com&hmac=ignored&timestamp=1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body,
        json!({
            "message": "Successfully connected to Shopify",
            "hostname": "example.myshopify.com",
            "password": "shpat_abc",
            "api_key": "CID"
        })
    );
}

#[tokio::test]
async fn test_callback_token_exchange_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_request"))
        .mount(&server)
        .await;

    let response = get(
        app_with_mock(&server),
        "/callback?code=bad&shop=example.myshopify.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_string(response).await,
        "Error retrieving access token from Shopify"
    );
}

#[tokio::test]
async fn test_callback_missing_access_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "scope": "read_products" })))
        .mount(&server)
        .await;

    let response = get(
        app_with_mock(&server),
        "/callback?code=auth-code&shop=example.myshopify.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_string(response).await,
        "Failed to retrieve access token from Shopify"
    );
}

#[tokio::test]
async fn test_callback_store_lookup_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "shpat_abc",
            "scope": "read_products"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2023-04/shop.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let response = get(
        app_with_mock(&server),
        "/callback?code=auth-code&shop=example.myshopify.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_string(response).await,
        "Error retrieving store information from Shopify"
    );
}

#[tokio::test]
async fn test_callback_rejects_invalid_shop_without_calling_shopify() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = get(
        app_with_mock(&server),
        "/callback?code=auth-code&shop=attacker.example.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_rejects_missing_code() {
    let response = get(app(), "/callback?shop=example.myshopify.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// === /webhook ===

#[tokio::test]
async fn test_webhook_with_valid_signature_is_acknowledged() {
    let body: &'static [u8] = b"{\"id\":1}";
    let signature = compute_signature_base64(body, WEBHOOK_SECRET.as_bytes());

    let response = app()
        .oneshot(webhook_request(body, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({ "message": "Webhook received" }));
}

#[tokio::test]
async fn test_webhook_with_wrong_body_is_unauthorized() {
    let signature = compute_signature_base64(b"{\"id\":1}", WEBHOOK_SECRET.as_bytes());

    let response = app()
        .oneshot(webhook_request(b"{\"id\":2}", Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(response).await, "Unauthorized");
}

#[tokio::test]
async fn test_webhook_without_signature_is_unauthorized() {
    let response = app()
        .oneshot(webhook_request(b"{\"id\":1}", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_signed_with_client_secret_is_unauthorized() {
    let body: &'static [u8] = b"{\"id\":1}";
    let signature = compute_signature_base64(body, b"client-secret");

    let response = app()
        .oneshot(webhook_request(body, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_accepts_previous_secret_during_rotation() {
    let config = AppConfig::builder()
        .client_id(ApiKey::new("CID").unwrap())
        .client_secret(ApiSecretKey::new("client-secret").unwrap())
        .scopes("read_products".parse().unwrap())
        .redirect_uri(RedirectUri::new("https://app.example.com/callback").unwrap())
        .webhook_secret(WebhookSecret::new("whsec_new").unwrap())
        .previous_webhook_secret(WebhookSecret::new(WEBHOOK_SECRET).unwrap())
        .build()
        .unwrap();
    let app = create_router(AppState::new(config, ShopifyClient::new()));

    let body: &'static [u8] = b"{\"id\":1}";
    let signature = compute_signature_base64(body, WEBHOOK_SECRET.as_bytes());

    let response = app
        .oneshot(webhook_request(body, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_rejects_get() {
    let response = get(app(), "/webhook").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
