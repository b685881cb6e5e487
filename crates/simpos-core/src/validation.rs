//! # Validation Module
//!
//! Turns a raw request body into a [`ValidRequest`] or the first rule it
//! breaks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: parse_envelope                                               │
//! │  └── body must be ONE JSON object            → MalformedBody (400)     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: validate (per KindProfile::rules)                            │
//! │  ├── EchoValue: numeric `eco` in [0, 99]     → 400                     │
//! │  └── Fields: ordered rules, first failure    → 406                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: check_decline                                                │
//! │  └── monto above the ceiling                 → Decline (400)           │
//! │                                                                         │
//! │  No layer sleeps or draws random numbers.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Policy
//! Under [`FieldPolicy::Lenient`] an absent, non-numeric or non-integral
//! field reads as `0` (or `""` for text) and the range check decides. Under
//! [`FieldPolicy::Strict`] such fields are rejected outright.
//!
//! ## Usage
//! ```rust
//! use simpos_core::types::{EndpointKind, KindProfile};
//! use simpos_core::validation::{parse_envelope, validate, FieldPolicy};
//!
//! let profile = KindProfile::for_kind(EndpointKind::Credito);
//! let envelope = parse_envelope(br#"{"facturaNro": 0, "cuotas": 5, "plan": 0}"#).unwrap();
//! let err = validate(&profile, envelope, FieldPolicy::Lenient).unwrap_err();
//! assert_eq!(err.status(), 406);
//! ```

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::{CoreResult, Decline, ValidationError};
use crate::types::{Field, FieldCheck, FieldRule, KindProfile, RuleSet};
use crate::MAX_ECHO_VALUE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// The decoded request body: an unordered JSON object.
pub type Envelope = Map<String, Value>;

// =============================================================================
// Field Policy
// =============================================================================

/// How absent or mistyped fields are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPolicy {
    /// Absent or mistyped values read as zero / empty; ranges reject them.
    #[default]
    Lenient,
    /// Absent or mistyped values are rejected with their own error.
    Strict,
}

impl FieldPolicy {
    /// Parses `lenient` / `strict` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lenient" => Some(FieldPolicy::Lenient),
            "strict" => Some(FieldPolicy::Strict),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPolicy::Lenient => write!(f, "lenient"),
            FieldPolicy::Strict => write!(f, "strict"),
        }
    }
}

// =============================================================================
// Validated Request
// =============================================================================

/// Read-only snapshot of the fields a kind extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFields {
    pub factura_nro: Option<i64>,
    pub monto: Option<i64>,
    pub cuotas: Option<i64>,
    pub plan: Option<i64>,
    pub nsu: Option<String>,
    pub bin: Option<String>,
    pub eco: Option<i64>,
}

impl TransactionFields {
    fn set_integer(&mut self, field: Field, value: i64) {
        let slot = match field {
            Field::FacturaNro => &mut self.factura_nro,
            Field::Monto => &mut self.monto,
            Field::Cuotas => &mut self.cuotas,
            Field::Plan => &mut self.plan,
            Field::Eco => &mut self.eco,
            Field::Nsu | Field::Bin => return,
        };
        *slot = Some(value);
    }

    fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::Nsu => self.nsu = Some(value),
            Field::Bin => self.bin = Some(value),
            _ => {}
        }
    }
}

/// A request that passed every rule of its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    envelope: Envelope,
    fields: TransactionFields,
}

impl ValidRequest {
    /// The original envelope, untouched.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Fields extracted by the kind's rules.
    pub fn fields(&self) -> &TransactionFields {
        &self.fields
    }

    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }
}

// =============================================================================
// Layer 1: Envelope
// =============================================================================

/// Decodes `body` as a single JSON object.
pub fn parse_envelope(body: &[u8]) -> ValidationResult<Envelope> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ValidationError::MalformedBody {
            reason: format!("expected an object, found {}", json_type(&other)),
        }),
        Err(e) => Err(ValidationError::MalformedBody {
            reason: e.to_string(),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Layer 2: Rules
// =============================================================================

/// Applies the kind's rules to `envelope`. The first failing rule wins.
pub fn validate(
    profile: &KindProfile,
    envelope: Envelope,
    policy: FieldPolicy,
) -> ValidationResult<ValidRequest> {
    let fields = match profile.rules {
        RuleSet::EchoValue => screen_echo(&envelope)?,
        RuleSet::Fields(rules) => screen_fields(rules, &envelope, policy)?,
    };

    Ok(ValidRequest { envelope, fields })
}

/// Echo requires a JSON number regardless of policy.
fn screen_echo(envelope: &Envelope) -> ValidationResult<TransactionFields> {
    let value = match envelope.get(Field::Eco.key()) {
        Some(Value::Number(n)) => integer_of(n).unwrap_or(0),
        _ => return Err(ValidationError::MalformedRequest),
    };

    if !(0..=MAX_ECHO_VALUE).contains(&value) {
        return Err(ValidationError::EchoOutOfRange { value });
    }

    Ok(TransactionFields {
        eco: Some(value),
        ..TransactionFields::default()
    })
}

fn screen_fields(
    rules: &[FieldRule],
    envelope: &Envelope,
    policy: FieldPolicy,
) -> ValidationResult<TransactionFields> {
    let mut fields = TransactionFields::default();

    for rule in rules {
        match rule.check {
            FieldCheck::Range { min, max } => {
                let value = integer_field(envelope, rule.field, policy)?;
                check_range(rule.field, value, min, max)?;
                fields.set_integer(rule.field, value);
            }
            FieldCheck::OneOf(allowed) => {
                let value = integer_field(envelope, rule.field, policy)?;
                if !allowed.contains(&value) {
                    return Err(ValidationError::FieldRejected {
                        field: rule.field,
                        reason: format!("must be one of {allowed:?}, got {value}"),
                    });
                }
                fields.set_integer(rule.field, value);
            }
            FieldCheck::NonEmptyText => {
                let value = text_field(envelope, rule.field, policy)?;
                if value.trim().is_empty() {
                    return Err(ValidationError::FieldRejected {
                        field: rule.field,
                        reason: "must be a non-empty string".to_string(),
                    });
                }
                fields.set_text(rule.field, value);
            }
        }
    }

    Ok(fields)
}

fn check_range(field: Field, value: i64, min: i64, max: Option<i64>) -> ValidationResult<()> {
    let reason = match max {
        Some(max) if value < min || value > max => {
            format!("must be between {min} and {max}, got {value}")
        }
        None if value < min => format!("must be at least {min}, got {value}"),
        _ => return Ok(()),
    };

    Err(ValidationError::FieldRejected { field, reason })
}

// =============================================================================
// Extraction
// =============================================================================

enum Extracted<T> {
    Present(T),
    Absent,
    WrongType,
}

/// Integer view of a JSON number. Integral floats convert, huge unsigned
/// values saturate, fractional values do not convert.
fn integer_of(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.as_u64().is_some() {
        return Some(i64::MAX);
    }
    n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)
}

fn read_integer(envelope: &Envelope, field: Field) -> Extracted<i64> {
    match envelope.get(field.key()) {
        None | Some(Value::Null) => Extracted::Absent,
        Some(Value::Number(n)) => match integer_of(n) {
            Some(value) => Extracted::Present(value),
            None => Extracted::WrongType,
        },
        Some(_) => Extracted::WrongType,
    }
}

fn read_text(envelope: &Envelope, field: Field) -> Extracted<String> {
    match envelope.get(field.key()) {
        None | Some(Value::Null) => Extracted::Absent,
        Some(Value::String(s)) => Extracted::Present(s.clone()),
        Some(_) => Extracted::WrongType,
    }
}

fn integer_field(envelope: &Envelope, field: Field, policy: FieldPolicy) -> ValidationResult<i64> {
    resolve(read_integer(envelope, field), field, policy, "an integer", 0)
}

fn text_field(envelope: &Envelope, field: Field, policy: FieldPolicy) -> ValidationResult<String> {
    resolve(read_text(envelope, field), field, policy, "a string", String::new())
}

fn resolve<T>(
    extracted: Extracted<T>,
    field: Field,
    policy: FieldPolicy,
    expected: &'static str,
    lenient_default: T,
) -> ValidationResult<T> {
    match (extracted, policy) {
        (Extracted::Present(value), _) => Ok(value),
        (_, FieldPolicy::Lenient) => Ok(lenient_default),
        (Extracted::Absent, FieldPolicy::Strict) => Err(ValidationError::MissingField { field }),
        (Extracted::WrongType, FieldPolicy::Strict) => {
            Err(ValidationError::InvalidType { field, expected })
        }
    }
}

// =============================================================================
// Layer 3: Decline
// =============================================================================

/// Runs every layer on a raw body: parse, rules, then the decline check.
///
/// The caller gets either a request ready for synthesis or the single
/// reason it was turned away.
pub fn screen(profile: &KindProfile, body: &[u8], policy: FieldPolicy) -> CoreResult<ValidRequest> {
    let envelope = parse_envelope(body)?;
    let request = validate(profile, envelope, policy)?;

    match check_decline(profile, &request) {
        Some(decline) => Err(decline.into()),
        None => Ok(request),
    }
}

/// Business decline for a validated request, if any.
///
/// Only kinds with a `decline_ceiling` can decline, and only when the
/// amount is strictly above it.
pub fn check_decline(profile: &KindProfile, request: &ValidRequest) -> Option<Decline> {
    let ceiling = profile.decline_ceiling?;
    let amount = request.fields().monto?;

    (amount > ceiling).then_some(Decline::InsufficientBalance { amount, ceiling })
}

// =============================================================================
// Unit Tests
// =============================================================================
