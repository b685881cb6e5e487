//! # simpos-core: Simulation Rules for the POS Terminal Simulator
//!
//! This crate holds every decision the simulator makes. It is pure: no
//! sockets, no timers, no global state. The HTTP server in
//! `apps/simpos-server` wraps it with transport and artificial delays.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Simulador POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Client software under development                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   simpos-server: routes ──► TransactionEngine ──► delay         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ simpos-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │validation │  │ synthesis │  │  random   │  │   │
//! │  │   │ profiles  │  │  rules    │  │ responses │  │ SharedRng │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • INJECTED RANDOMNESS                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Endpoint kinds, per-kind profiles, response payloads
//! - [`validation`] - Envelope parsing and field rules
//! - [`synthesis`] - Builds approval, acknowledgement and error payloads
//! - [`random`] - Thread-safe random provider
//! - [`catalog`] - Static issuer and wallet tables
//! - [`error`] - Validation errors and business declines
//!
//! ## Example Usage
//!
//! ```rust
//! use simpos_core::random::SharedRng;
//! use simpos_core::types::{EndpointKind, KindProfile};
//! use simpos_core::validation::{self, FieldPolicy};
//!
//! let profile = KindProfile::for_kind(EndpointKind::VentaQr);
//! let envelope = validation::parse_envelope(br#"{"facturaNro": 100, "monto": 5000}"#).unwrap();
//! let request = validation::validate(&profile, envelope, FieldPolicy::Lenient).unwrap();
//! assert!(validation::check_decline(&profile, &request).is_none());
//!
//! let rng = SharedRng::seeded(7);
//! let reply = simpos_core::synthesis::respond(&profile, request, &rng);
//! assert_eq!(reply.status, 200);
//! assert_eq!(reply.body["mensajeDisplay"], "APROBADA (QR)");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod random;
pub mod synthesis;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, Decline, ValidationError};
pub use random::{RandomSource, SharedRng};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Amounts strictly above this value are declined for insufficient balance.
///
/// ## Business Reason
/// Gives client developers a deterministic way to exercise the decline
/// path: any `monto` over one million is "more than the card holds".
pub const DECLINE_CEILING: i64 = 1_000_000;

/// Largest invoice number a generic sale accepts.
pub const MAX_INVOICE_NUMBER: i64 = 99_999_999_999;

/// Largest installment count accepted for credit-like sales.
pub const MAX_INSTALLMENTS: i64 = 99;

/// Largest value accepted by the echo endpoint.
pub const MAX_ECHO_VALUE: i64 = 99;

/// Issuer id reported on every synthesized authorization.
pub const SIMULATED_ISSUER_ID: &str = "ZZ";
