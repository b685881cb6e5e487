//! # HTTP Routes
//!
//! Wires endpoint kinds, catalogs and the banner into an axum `Router`.
//!
//! ```text
//! GET  /                      banner (HTML)
//! POST /pos/eco               ┐
//! POST /pos/venta-ux          │
//! POST /pos/venta/credito     │
//! POST /pos/venta/debito      │  one TransactionEngine each
//! POST /pos/descuento         │
//! POST /pos/venta-qr          │
//! POST /pos/venta-canje       │
//! POST /pos/venta-billetera   ┘
//! GET  /issuers/              static issuer list
//! GET  /billeteras/           static wallet list
//! ```
//!
//! Bodies are read as raw bytes: clients are not required to send a
//! JSON content type, and parse failures are the engine's business.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use simpos_core::catalog;
use simpos_core::types::{Issuer, Wallet};

use crate::engine::TransactionEngine;
use crate::AppState;

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = "SimuladorPOS";

/// Name of the authorship header.
pub const AUTHOR_HEADER: &str = "autor";

/// Value of the authorship header.
pub const AUTHOR_NAME: &str = "Diego Schulz";

const INDEX_HTML: &str = "<head><meta charset=\"UTF-8\"></head><h1>Simulador POS</h1>\
<p>Basado en la especificación del POS de Bancard.</p>\n";

/// Builds the complete router for `state`.
pub fn router(state: &AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/issuers/", get(list_issuers))
        .route("/billeteras/", get(list_wallets));

    for profile in &state.profiles {
        let engine = Arc::new(TransactionEngine::new(
            *profile,
            state.policy,
            Arc::clone(&state.rng),
        ));
        router = router.route(profile.kind.path(), post(simulate).with_state(engine));
    }

    router.layer(middleware::map_response(stamp_headers))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn list_issuers() -> Json<&'static [Issuer]> {
    Json(&catalog::ISSUERS[..])
}

async fn list_wallets() -> Json<&'static [Wallet]> {
    Json(&catalog::WALLETS[..])
}

/// Runs a simulated transaction and maps the reply onto HTTP.
async fn simulate(State(engine): State<Arc<TransactionEngine>>, body: Bytes) -> Response {
    let reply = engine.handle(&body).await;
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(reply.body)).into_response()
}

/// Adds the identification headers to every response.
async fn stamp_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));
    headers.insert(
        HeaderName::from_static(AUTHOR_HEADER),
        HeaderValue::from_static(AUTHOR_NAME),
    );
    response
}
