//! # Domain Types
//!
//! Endpoint kinds, the per-kind configuration record, and the payloads the
//! simulator sends back.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │  EndpointKind   │──►│     KindProfile      │   │  Reply          │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  Echo           │   │  rules     (what)    │   │  status (u16)   │  │
//! │  │  VentaUx        │   │  decline   (ceiling) │   │  body (JSON)    │  │
//! │  │  Credito ...    │   │  delay     (timing)  │   └─────────────────┘  │
//! │  └─────────────────┘   │  reply     (shape)   │                        │
//! │                        └──────────────────────┘                        │
//! │                                                                         │
//! │  ┌──────────────────────────┐   ┌──────────────────────────┐           │
//! │  │  AuthorizationResponse   │   │  ErrorResponse           │           │
//! │  │  codigoAutorizacion ...  │   │  statusCode, error, msg  │           │
//! │  └──────────────────────────┘   └──────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every endpoint runs the same flow. What differs between them is captured
//! in a [`KindProfile`], never in duplicated control flow.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::ValidRequest;
use crate::{DECLINE_CEILING, MAX_INSTALLMENTS, MAX_INVOICE_NUMBER};

// =============================================================================
// Endpoint Kind
// =============================================================================

/// The simulated terminal operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Connectivity check, echoes the request.
    Echo,
    /// First-party sale flow (slow, double delay).
    VentaUx,
    /// Credit card sale.
    Credito,
    /// Debit card sale.
    Debito,
    /// Discount-amount sale against a known NSU/BIN.
    Descuento,
    /// QR payment.
    VentaQr,
    /// Voucher exchange.
    VentaCanje,
    /// Wallet payment.
    VentaBilletera,
}

impl EndpointKind {
    /// All kinds, in route registration order.
    pub const fn all() -> [EndpointKind; 8] {
        [
            EndpointKind::Echo,
            EndpointKind::VentaUx,
            EndpointKind::Credito,
            EndpointKind::Debito,
            EndpointKind::Descuento,
            EndpointKind::VentaQr,
            EndpointKind::VentaCanje,
            EndpointKind::VentaBilletera,
        ]
    }

    /// HTTP path the kind is served on.
    pub const fn path(&self) -> &'static str {
        match self {
            EndpointKind::Echo => "/pos/eco",
            EndpointKind::VentaUx => "/pos/venta-ux",
            EndpointKind::Credito => "/pos/venta/credito",
            EndpointKind::Debito => "/pos/venta/debito",
            EndpointKind::Descuento => "/pos/descuento",
            EndpointKind::VentaQr => "/pos/venta-qr",
            EndpointKind::VentaCanje => "/pos/venta-canje",
            EndpointKind::VentaBilletera => "/pos/venta-billetera",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EndpointKind::Echo => "eco",
            EndpointKind::VentaUx => "venta-ux",
            EndpointKind::Credito => "venta-credito",
            EndpointKind::Debito => "venta-debito",
            EndpointKind::Descuento => "descuento",
            EndpointKind::VentaQr => "venta-qr",
            EndpointKind::VentaCanje => "venta-canje",
            EndpointKind::VentaBilletera => "venta-billetera",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Fields and Rules
// =============================================================================

/// Envelope keys the validator extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FacturaNro,
    Monto,
    Cuotas,
    Plan,
    Nsu,
    Bin,
    Eco,
}

impl Field {
    /// JSON key in the request envelope.
    pub const fn key(&self) -> &'static str {
        match self {
            Field::FacturaNro => "facturaNro",
            Field::Monto => "monto",
            Field::Cuotas => "cuotas",
            Field::Plan => "plan",
            Field::Nsu => "nsu",
            Field::Bin => "bin",
            Field::Eco => "eco",
        }
    }

    /// Human description used in error messages.
    pub const fn description(&self) -> &'static str {
        match self {
            Field::FacturaNro => "invoice number",
            Field::Monto => "amount",
            Field::Cuotas => "installments",
            Field::Plan => "plan",
            Field::Nsu => "NSU",
            Field::Bin => "BIN",
            Field::Eco => "echo value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.key())
    }
}

/// Constraint applied to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Integer within `[min, max]`; `max: None` means unbounded above.
    Range { min: i64, max: Option<i64> },
    /// Integer from a fixed set.
    OneOf(&'static [i64]),
    /// String with at least one non-whitespace character.
    NonEmptyText,
}

/// One validation rule: a field and its constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub check: FieldCheck,
}

impl FieldRule {
    pub const fn new(field: Field, check: FieldCheck) -> Self {
        FieldRule { field, check }
    }
}

/// How a kind screens its envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// The echo check: numeric `eco` in `[0, 99]`, failures are 400.
    EchoValue,
    /// Ordered field rules, failures are 406.
    Fields(&'static [FieldRule]),
}

const CREDIT_SALE_RULES: &[FieldRule] = &[
    FieldRule::new(
        Field::FacturaNro,
        FieldCheck::Range { min: 1, max: Some(MAX_INVOICE_NUMBER) },
    ),
    FieldRule::new(
        Field::Cuotas,
        FieldCheck::Range { min: 0, max: Some(MAX_INSTALLMENTS) },
    ),
    FieldRule::new(Field::Plan, FieldCheck::OneOf(&[0, 1])),
];

const DEBIT_SALE_RULES: &[FieldRule] = &[FieldRule::new(
    Field::FacturaNro,
    FieldCheck::Range { min: 1, max: Some(MAX_INVOICE_NUMBER) },
)];

const DISCOUNT_RULES: &[FieldRule] = &[
    FieldRule::new(Field::Nsu, FieldCheck::NonEmptyText),
    FieldRule::new(Field::Bin, FieldCheck::NonEmptyText),
    FieldRule::new(Field::Monto, FieldCheck::Range { min: 1, max: None }),
];

const AMOUNT_SALE_RULES: &[FieldRule] = &[
    FieldRule::new(Field::FacturaNro, FieldCheck::Range { min: 10, max: None }),
    FieldRule::new(Field::Monto, FieldCheck::Range { min: 10, max: None }),
];

// =============================================================================
// Delay Profile
// =============================================================================

/// Fixed pause applied to echo requests.
pub const ECHO_DELAY: Duration = Duration::from_millis(8);

/// Pause applied (twice) by the first-party sale flow.
pub const SALE_DELAY: Duration = Duration::from_millis(1500);

/// Base pause of the parity echo timing.
pub const PARITY_BASE: Duration = Duration::from_millis(100);

/// Extra pause per unit of `eco` in the parity echo timing.
pub const PARITY_STEP: Duration = Duration::from_millis(10);

/// Artificial latency applied to an approved request.
///
/// The asymmetry between kinds (one double, most none) is reproduced as-is
/// and can be overridden per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelayProfile {
    /// Respond immediately.
    #[default]
    None,
    /// One pause.
    Single(Duration),
    /// The same pause twice in a row.
    Double(Duration),
    /// Even `eco` values pause `base + eco * step`; odd values do not pause.
    Parity { base: Duration, step: Duration },
}

impl DelayProfile {
    /// The pauses to run, in order, before answering `request`.
    pub fn pauses(&self, request: &ValidRequest) -> Vec<Duration> {
        match *self {
            DelayProfile::None => Vec::new(),
            DelayProfile::Single(d) => vec![d],
            DelayProfile::Double(d) => vec![d, d],
            DelayProfile::Parity { base, step } => match request.fields().eco {
                Some(value) if value % 2 == 0 => u32::try_from(value)
                    .map(|n| vec![base + step * n])
                    .unwrap_or_default(),
                _ => Vec::new(),
            },
        }
    }
}

// =============================================================================
// Reply Shape
// =============================================================================

/// What an approved request answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// The request object, unchanged.
    Echo,
    /// The request object plus random `nsu` and `bin`.
    Acknowledge,
    /// A full [`AuthorizationResponse`] with the given display text.
    Authorize { display: &'static str },
}

// =============================================================================
// Kind Profile
// =============================================================================

/// Per-kind configuration record driving the shared transaction flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindProfile {
    pub kind: EndpointKind,
    pub rules: RuleSet,
    /// `monto` above this value is declined.
    pub decline_ceiling: Option<i64>,
    pub delay: DelayProfile,
    pub reply: ReplyShape,
}

impl KindProfile {
    /// Default profile for `kind`.
    pub const fn for_kind(kind: EndpointKind) -> Self {
        let (rules, decline_ceiling, delay, reply) = match kind {
            EndpointKind::Echo => (
                RuleSet::EchoValue,
                None,
                DelayProfile::Single(ECHO_DELAY),
                ReplyShape::Echo,
            ),
            EndpointKind::VentaUx => (
                RuleSet::Fields(CREDIT_SALE_RULES),
                None,
                DelayProfile::Double(SALE_DELAY),
                ReplyShape::Acknowledge,
            ),
            EndpointKind::Credito => (
                RuleSet::Fields(CREDIT_SALE_RULES),
                None,
                DelayProfile::None,
                ReplyShape::Acknowledge,
            ),
            EndpointKind::Debito => (
                RuleSet::Fields(DEBIT_SALE_RULES),
                None,
                DelayProfile::None,
                ReplyShape::Acknowledge,
            ),
            EndpointKind::Descuento => (
                RuleSet::Fields(DISCOUNT_RULES),
                Some(DECLINE_CEILING),
                DelayProfile::None,
                ReplyShape::Authorize { display: "APROBADA" },
            ),
            EndpointKind::VentaQr => (
                RuleSet::Fields(AMOUNT_SALE_RULES),
                Some(DECLINE_CEILING),
                DelayProfile::None,
                ReplyShape::Authorize { display: "APROBADA (QR)" },
            ),
            EndpointKind::VentaCanje => (
                RuleSet::Fields(AMOUNT_SALE_RULES),
                Some(DECLINE_CEILING),
                DelayProfile::None,
                ReplyShape::Authorize { display: "APROBADA (CANJE)" },
            ),
            EndpointKind::VentaBilletera => (
                RuleSet::Fields(AMOUNT_SALE_RULES),
                Some(DECLINE_CEILING),
                DelayProfile::None,
                ReplyShape::Authorize { display: "APROBADA (BILLETERA)" },
            ),
        };

        KindProfile {
            kind,
            rules,
            decline_ceiling,
            delay,
            reply,
        }
    }

    /// Replaces the delay profile.
    pub fn with_delay(mut self, delay: DelayProfile) -> Self {
        self.delay = delay;
        self
    }
}

// =============================================================================
// Response Payloads
// =============================================================================

/// A simulated successful card authorization.
///
/// Generated fresh per request; nothing is cached or correlated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthorizationResponse {
    pub codigo_autorizacion: String,
    pub codigo_comercio: String,
    pub issuer_id: String,
    pub mensaje_display: String,
    #[ts(type = "number")]
    pub monto_vuelto: i64,
    #[ts(type = "number")]
    pub saldo: i64,
    pub nombre_cliente: String,
    pub pan: i32,
    pub nombre_tarjeta: String,
    pub nro_boleta: String,
}

/// Fixed-shape error payload. `statusCode` mirrors the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status_code: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorResponse {
            status_code,
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Status code plus JSON body, handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Reply {
    /// A 200 reply.
    pub fn ok(body: serde_json::Value) -> Self {
        Reply { status: 200, body }
    }
}

// =============================================================================
// Catalog Entries
// =============================================================================

/// A card issuer brand accepted by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Issuer {
    #[serde(rename = "Marca")]
    pub marca: &'static str,
    #[serde(rename = "Tipo")]
    pub tipo: &'static str,
    #[serde(rename = "IssuerID")]
    pub issuer_id: &'static str,
}

/// A mobile wallet accepted by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Wallet {
    #[serde(rename = "Marca")]
    pub marca: &'static str,
    #[serde(rename = "CodigoBilletera")]
    pub codigo_billetera: &'static str,
    #[serde(rename = "IssuerID")]
    pub issuer_id: &'static str,
}

// =============================================================================
// Unit Tests
// =============================================================================
