//! End-to-end tests of the HTTP surface, driven through the router.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use simpos_core::validation::FieldPolicy;
use simpos_core::SharedRng;
use simpos_server::{router, AppState, ServerConfig, ServerError};
use tokio::time::Instant;
use tower::ServiceExt;

fn app() -> Router {
    app_with(FieldPolicy::Lenient)
}

fn app_with(policy: FieldPolicy) -> Router {
    router(&AppState::new(Arc::new(SharedRng::seeded(2024)), policy))
}

type RawResponse = (StatusCode, HeaderMap, Vec<u8>);

async fn send(app: &Router, method: &str, uri: &str, body: &str) -> RawResponse {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, "POST", uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, "GET", uri, "").await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn is_digits(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

// =============================================================================
// Banner and headers
// =============================================================================

#[tokio::test]
async fn index_serves_banner_with_identification_headers() {
    let app = app();
    let (status, headers, body) = send(&app, "GET", "/", "").await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Simulador POS"));
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert_eq!(headers[header::SERVER], "SimuladorPOS");
    assert_eq!(headers["autor"], "Diego Schulz");
}

#[tokio::test]
async fn error_responses_carry_identification_headers_too() {
    let app = app();
    let (status, headers, _) = send(&app, "POST", "/pos/venta-qr", "garbage").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[header::SERVER], "SimuladorPOS");
}

// =============================================================================
// Echo
// =============================================================================

#[tokio::test(start_paused = true)]
async fn echo_returns_input_for_whole_range() {
    let app = app();

    for eco in 0..100 {
        let body = json!({ "eco": eco, "tag": "ping" });
        let (status, reply) = post_json(&app, "/pos/eco", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK, "eco = {eco}");
        assert_eq!(reply, body);
    }
}

#[tokio::test(start_paused = true)]
async fn echo_out_of_range_is_bad_request() {
    let app = app();

    for eco in [150, -1, 100] {
        let (status, reply) = post_json(&app, "/pos/eco", &json!({ "eco": eco }).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["statusCode"], 400);
        assert!(reply["message"].as_str().unwrap().contains("out of accepted range"));
    }
}

#[tokio::test]
async fn echo_rejects_non_json_and_non_numeric() {
    let app = app();

    let (status, reply) = post_json(&app, "/pos/eco", "this is not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["statusCode"], 400);
    assert!(reply["message"].as_str().unwrap().contains("malformed JSON"));

    let (status, reply) = post_json(&app, "/pos/eco", r#"{"eco": "hola"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "Bad Request");
}

// =============================================================================
// Acknowledged sales
// =============================================================================

#[tokio::test]
async fn credit_sale_returns_numeric_nsu_and_bin() {
    let app = app();
    let (status, reply) = post_json(
        &app,
        "/pos/venta/credito",
        r#"{"facturaNro": 123, "cuotas": 5, "plan": 0}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_digits(&reply["nsu"]));
    assert!(is_digits(&reply["bin"]));
}

#[tokio::test]
async fn credit_sale_with_invoice_zero_is_not_acceptable() {
    let app = app();
    let (status, reply) = post_json(
        &app,
        "/pos/venta/credito",
        r#"{"facturaNro": 0, "cuotas": 5, "plan": 0}"#,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(reply["statusCode"], 406);
    assert_eq!(reply["error"], "Not Acceptable");
    assert!(reply["message"].as_str().unwrap().contains("invoice number"));
}

#[tokio::test]
async fn debit_sale_only_checks_invoice() {
    let app = app();

    let (status, reply) = post_json(&app, "/pos/venta/debito", r#"{"facturaNro": 77}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(is_digits(&reply["nsu"]));

    let (status, _) = post_json(&app, "/pos/venta/debito", r#"{"facturaNro": 100000000000}"#).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);

    let (status, _) = post_json(&app, "/pos/venta/debito", "[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn venta_ux_applies_double_delay() {
    let app = app();
    let start = Instant::now();

    let (status, reply) = post_json(
        &app,
        "/pos/venta-ux",
        r#"{"facturaNro": 9, "cuotas": 3, "plan": 1}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_digits(&reply["bin"]));
    assert!(start.elapsed() >= Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn concurrent_requests_are_not_serialized() {
    let app = app();
    let start = Instant::now();

    let mut set = tokio::task::JoinSet::new();
    for n in 1..=10 {
        let app = app.clone();
        set.spawn(async move {
            let body = json!({ "facturaNro": n, "cuotas": 1, "plan": 0 }).to_string();
            post_json(&app, "/pos/venta-ux", &body).await.0
        });
    }

    while let Some(status) = set.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed < Duration::from_millis(6000), "took {elapsed:?}");
}

// =============================================================================
// Authorized sales
// =============================================================================

#[tokio::test]
async fn qr_sale_is_approved_with_bounded_fields() {
    let app = app();
    let body = r#"{"facturaNro": 100, "monto": 5000}"#;
    let (status, reply) = post_json(&app, "/pos/venta-qr", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["mensajeDisplay"], "APROBADA (QR)");
    assert_eq!(reply["issuerId"], "ZZ");

    let code: i64 = reply["codigoAutorizacion"].as_str().unwrap().parse().unwrap();
    assert!((1..=999_999).contains(&code));
    let merchant: i64 = reply["codigoComercio"].as_str().unwrap().parse().unwrap();
    assert!((1..=9_999_999_999).contains(&merchant));
    let receipt: i64 = reply["nroBoleta"].as_str().unwrap().parse().unwrap();
    assert!((1..=9_999_999_999).contains(&receipt));

    assert!((0..=500_000).contains(&reply["montoVuelto"].as_i64().unwrap()));
    assert!((1..=500_000_000).contains(&reply["saldo"].as_i64().unwrap()));
    assert!((1..=9_999).contains(&reply["pan"].as_i64().unwrap()));
    assert!(reply["nombreCliente"].is_string());
    assert!(reply["nombreTarjeta"].is_string());
}

#[tokio::test]
async fn qr_sale_above_ceiling_is_declined_not_rejected() {
    let app = app();
    let (status, reply) = post_json(
        &app,
        "/pos/venta-qr",
        r#"{"facturaNro": 100, "monto": 2000000}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["statusCode"], 400);
    assert_eq!(reply["message"], "insufficient balance");
}

#[tokio::test]
async fn amount_sales_use_their_own_display_text() {
    let app = app();

    for (uri, display) in [
        ("/pos/venta-canje", "APROBADA (CANJE)"),
        ("/pos/venta-billetera", "APROBADA (BILLETERA)"),
    ] {
        let (status, reply) = post_json(&app, uri, r#"{"facturaNro": 10, "monto": 10}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["mensajeDisplay"], display);

        let (status, _) = post_json(&app, uri, r#"{"facturaNro": 10, "monto": 9}"#).await;
        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    }
}

#[tokio::test]
async fn discount_requires_nsu_and_bin() {
    let app = app();

    let (status, reply) = post_json(
        &app,
        "/pos/descuento",
        r#"{"nsu": "000321", "bin": "450799", "monto": 1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["mensajeDisplay"], "APROBADA");

    let body = r#"{"nsu": "", "bin": "450799", "monto": 1}"#;
    let (status, _) = post_json(&app, "/pos/descuento", body).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);

    let (status, reply) = post_json(
        &app,
        "/pos/descuento",
        r#"{"nsu": "1", "bin": "450799", "monto": 1000001}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["message"], "insufficient balance");
}

#[tokio::test]
async fn strict_policy_reports_missing_fields() {
    let app = app_with(FieldPolicy::Strict);
    let (status, reply) = post_json(&app, "/pos/venta-qr", r#"{"facturaNro": 100}"#).await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(reply["message"], "amount (monto) is required");
}

// =============================================================================
// Catalogs
// =============================================================================

#[tokio::test]
async fn catalogs_are_static_and_ordered() {
    let app = app();

    let (status, issuers) = get_json(&app, "/issuers/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issuers.as_array().unwrap().len(), 16);
    assert_eq!(issuers[0], json!({"Marca": "CABAL", "Tipo": "Crédito", "IssuerID": "CB"}));

    let (_, again) = get_json(&app, "/issuers/").await;
    assert_eq!(issuers, again);

    let (status, wallets) = get_json(&app, "/billeteras/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallets.as_array().unwrap().len(), 5);
    assert_eq!(wallets[0]["CodigoBilletera"], "ZIM");
}

#[tokio::test]
async fn wrong_method_is_rejected_by_transport() {
    let app = app();
    let (status, _, _) = send(&app, "GET", "/pos/venta-qr", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Startup
// =============================================================================

#[tokio::test]
async fn bind_failure_is_reported() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let config = ServerConfig {
        bind_addr: "127.0.0.1".to_string(),
        port,
        ..ServerConfig::default()
    };

    let result = simpos_server::serve(&config, std::future::ready(())).await;
    assert!(matches!(result, Err(ServerError::Bind { .. })));
}
