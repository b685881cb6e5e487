//! # Response Synthesizer
//!
//! Builds what the simulated terminal answers with.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► reject()   ──► ErrorResponse (400 / 406)        │
//! │  Decline         ──► decline()  ──► ErrorResponse (400)              │
//! │  CoreError       ──► fail()     ──► reject() or decline()            │
//! │  ValidRequest    ──► respond()  ──┬─► Echo:        envelope as-is    │
//! │                                   ├─► Acknowledge: envelope+nsu/bin  │
//! │                                   └─► Authorize:   random auth data  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::error::{status_label, CoreError, Decline, ValidationError};
use crate::random::RandomSource;
use crate::types::{AuthorizationResponse, ErrorResponse, KindProfile, Reply, ReplyShape};
use crate::validation::{Envelope, ValidRequest};
use crate::SIMULATED_ISSUER_ID;

/// Customer name on every authorization; there is no customer database.
pub const CLIENT_PLACEHOLDER: &str = "CLIENTE SIMULADO";

/// Card name on every authorization.
pub const CARD_PLACEHOLDER: &str = "TARJETA SIMULADA";

// Inclusive bounds of the synthesized numbers.
const AUTH_CODE: (i32, i32) = (1, 999_999);
const MERCHANT_CODE: (i64, i64) = (1, 9_999_999_999);
const CHANGE: (i64, i64) = (0, 500_000);
const BALANCE: (i64, i64) = (1, 500_000_000);
const PAN: (i32, i32) = (1, 9_999);
const RECEIPT: (i64, i64) = (1, 9_999_999_999);

fn int_between(rng: &dyn RandomSource, (low, high): (i32, i32)) -> i32 {
    rng.random_int(low, high + 1)
}

fn long_between(rng: &dyn RandomSource, (low, high): (i64, i64)) -> i64 {
    rng.random_long(low, high + 1)
}

fn to_body<T: Serialize>(payload: &T) -> Value {
    // Plain string/integer structs always serialize.
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

// =============================================================================
// Success Paths
// =============================================================================

/// A fresh authorization carrying `display` as its terminal message.
pub fn authorize(display: &str, rng: &dyn RandomSource) -> AuthorizationResponse {
    AuthorizationResponse {
        codigo_autorizacion: int_between(rng, AUTH_CODE).to_string(),
        codigo_comercio: long_between(rng, MERCHANT_CODE).to_string(),
        issuer_id: SIMULATED_ISSUER_ID.to_string(),
        mensaje_display: display.to_string(),
        monto_vuelto: long_between(rng, CHANGE),
        saldo: long_between(rng, BALANCE),
        nombre_cliente: CLIENT_PLACEHOLDER.to_string(),
        pan: int_between(rng, PAN),
        nombre_tarjeta: CARD_PLACEHOLDER.to_string(),
        nro_boleta: long_between(rng, RECEIPT).to_string(),
    }
}

/// The envelope with a random six-digit `nsu` and `bin` added.
pub fn acknowledge(mut envelope: Envelope, rng: &dyn RandomSource) -> Value {
    let nsu = format!("{:06}", rng.random_int(1, 1_000_000));
    let bin = rng.random_int(100_000, 1_000_000).to_string();

    envelope.insert("nsu".to_string(), Value::String(nsu));
    envelope.insert("bin".to_string(), Value::String(bin));
    Value::Object(envelope)
}

/// The envelope, unchanged.
pub fn echo(envelope: Envelope) -> Value {
    Value::Object(envelope)
}

/// Success reply for an approved request, shaped by the kind.
pub fn respond(profile: &KindProfile, request: ValidRequest, rng: &dyn RandomSource) -> Reply {
    let body = match profile.reply {
        ReplyShape::Echo => echo(request.into_envelope()),
        ReplyShape::Acknowledge => acknowledge(request.into_envelope(), rng),
        ReplyShape::Authorize { display } => to_body(&authorize(display, rng)),
    };

    Reply::ok(body)
}

// =============================================================================
// Failure Paths
// =============================================================================

/// Error reply for a rejected request.
pub fn reject(error: &ValidationError) -> Reply {
    let status = error.status();
    error_reply(status, error.error_label(), error.to_string())
}

/// Error reply for a business decline.
pub fn decline(decline: &Decline) -> Reply {
    let status = decline.status();
    error_reply(status, status_label(status), decline.to_string())
}

/// Error reply for whichever way a request was turned away.
pub fn fail(error: &CoreError) -> Reply {
    match error {
        CoreError::Validation(e) => reject(e),
        CoreError::Declined(d) => decline(d),
    }
}

fn error_reply(status: u16, label: &str, message: String) -> Reply {
    Reply {
        status,
        body: to_body(&ErrorResponse::new(status, label, message)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
