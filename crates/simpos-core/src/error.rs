//! # Error Types
//!
//! Domain-specific error types for simpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ValidationError  - request rejected before any business decision      │
//! │  ├── MalformedBody      400  body is not a JSON object                 │
//! │  ├── MalformedRequest   400  echo without a numeric `eco`              │
//! │  ├── EchoOutOfRange     400  echo value outside [0, 99]                │
//! │  ├── FieldRejected      406  range / allowed-set violation             │
//! │  ├── MissingField       406  strict policy only                        │
//! │  └── InvalidType        406  strict policy only                        │
//! │                                                                         │
//! │  Decline          - well-formed request refused by the "issuer"        │
//! │  └── InsufficientBalance 400                                           │
//! │                                                                         │
//! │  Flow: ValidationError / Decline → synthesis::reject / decline         │
//! │        → ErrorResponse { statusCode, error, message }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these ever terminate the process. They are recovered per request
//! and rendered into the fixed error payload.

use thiserror::Error;

use crate::types::Field;

/// HTTP status used for malformed bodies and declines.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// HTTP status used for field-level validation failures.
pub const STATUS_NOT_ACCEPTABLE: u16 = 406;

// =============================================================================
// Validation Error
// =============================================================================

/// Reasons a request is rejected before it reaches a business decision.
///
/// Validation short-circuits: only the first failing rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The body could not be parsed as a single JSON object.
    #[error("{reason}: malformed JSON")]
    MalformedBody { reason: String },

    /// The echo body is JSON but carries no numeric `eco`.
    #[error("malformed request: a numeric 'eco' field is required")]
    MalformedRequest,

    /// The echo value is numeric but outside the accepted range.
    #[error("value out of accepted range [0-99]: {value}")]
    EchoOutOfRange { value: i64 },

    /// A sale field is present but violates its bounds.
    #[error("invalid {field}: {reason}")]
    FieldRejected { field: Field, reason: String },

    /// A required field is absent (strict policy).
    #[error("{field} is required")]
    MissingField { field: Field },

    /// A field has the wrong JSON type (strict policy).
    #[error("{field} must be {expected}")]
    InvalidType { field: Field, expected: &'static str },
}

impl ValidationError {
    /// HTTP status this rejection maps to.
    ///
    /// Body-level problems are 400; field-level problems on sale endpoints
    /// are 406 (Not Acceptable).
    pub fn status(&self) -> u16 {
        match self {
            ValidationError::MalformedBody { .. }
            | ValidationError::MalformedRequest
            | ValidationError::EchoOutOfRange { .. } => STATUS_BAD_REQUEST,
            ValidationError::FieldRejected { .. }
            | ValidationError::MissingField { .. }
            | ValidationError::InvalidType { .. } => STATUS_NOT_ACCEPTABLE,
        }
    }

    /// Short label placed in the `error` key of the payload.
    pub fn error_label(&self) -> &'static str {
        status_label(self.status())
    }
}

// =============================================================================
// Decline
// =============================================================================

/// A structurally valid request refused for simulated business reasons.
///
/// Kept apart from [`ValidationError`] so the decline path can never be
/// confused with a malformed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Decline {
    /// The amount exceeds what the simulated account holds.
    #[error("insufficient balance")]
    InsufficientBalance { amount: i64, ceiling: i64 },
}

impl Decline {
    /// HTTP status for a decline.
    pub fn status(&self) -> u16 {
        STATUS_BAD_REQUEST
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that want a single type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Declined: {0}")]
    Declined(#[from] Decline),
}

impl CoreError {
    /// HTTP status of the wrapped error.
    pub fn status(&self) -> u16 {
        match self {
            CoreError::Validation(e) => e.status(),
            CoreError::Declined(d) => d.status(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Reason phrase for the statuses the simulator emits.
pub fn status_label(status: u16) -> &'static str {
    match status {
        STATUS_BAD_REQUEST => "Bad Request",
        STATUS_NOT_ACCEPTABLE => "Not Acceptable",
        _ => "Error",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
