//! # Transaction Simulation Engine
//!
//! One engine per endpoint kind, all running the same flow.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Received ──parse──► Malformed ─────────────────────────► 400          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Parsed ──validate──► Rejected ─────────────────────────► 406 (echo 400)│
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Validated ──ceiling──► Declined ───────────────────────► 400          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Approved ──delay (per kind)──► synthesize ─────────────► 200          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every terminal state is reached in one call. Nothing is stored between
//! requests; the shared random provider is the only cross-request state.

use std::sync::Arc;

use simpos_core::synthesis;
use simpos_core::types::{KindProfile, Reply};
use simpos_core::validation::{self, FieldPolicy};
use simpos_core::{CoreError, RandomSource, ValidationError};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::delay::DelaySimulator;

/// Runs the simulated transaction flow for one endpoint kind.
pub struct TransactionEngine {
    profile: KindProfile,
    policy: FieldPolicy,
    rng: Arc<dyn RandomSource>,
    delay: DelaySimulator,
}

impl TransactionEngine {
    /// Creates an engine for `profile`.
    pub fn new(profile: KindProfile, policy: FieldPolicy, rng: Arc<dyn RandomSource>) -> Self {
        TransactionEngine {
            profile,
            policy,
            rng,
            delay: DelaySimulator::new(),
        }
    }

    /// Handles one raw request body.
    pub async fn handle(&self, body: &[u8]) -> Reply {
        let span = info_span!(
            "transaction",
            kind = %self.profile.kind,
            request_id = %Uuid::new_v4(),
        );

        self.simulate(body).instrument(span).await
    }

    async fn simulate(&self, body: &[u8]) -> Reply {
        let request = match validation::screen(&self.profile, body, self.policy) {
            Ok(request) => request,
            Err(err) => {
                log_turned_away(&err);
                return synthesis::fail(&err);
            }
        };

        debug!(body = ?request.envelope(), "Request accepted");

        let pauses = self.profile.delay.pauses(&request);
        self.delay.run(&pauses).await;

        let reply = synthesis::respond(&self.profile, request, self.rng.as_ref());
        info!(status = reply.status, "Transaction approved");
        reply
    }
}

fn log_turned_away(err: &CoreError) {
    match err {
        CoreError::Validation(e @ ValidationError::MalformedBody { .. }) => {
            warn!(error = %e, "Malformed request body");
        }
        CoreError::Validation(e) => {
            info!(status = e.status(), error = %e, "Request rejected");
        }
        CoreError::Declined(d) => {
            info!(status = d.status(), reason = %d, "Transaction declined");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpos_core::types::{DelayProfile, EndpointKind};
    use simpos_core::SharedRng;
    use std::time::Duration;
    use tokio::time::Instant;

    fn engine(kind: EndpointKind) -> TransactionEngine {
        engine_with(kind, FieldPolicy::Lenient)
    }

    fn engine_with(kind: EndpointKind, policy: FieldPolicy) -> TransactionEngine {
        TransactionEngine::new(
            KindProfile::for_kind(kind),
            policy,
            Arc::new(SharedRng::seeded(17)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_body() {
        let reply = engine(EndpointKind::VentaQr).handle(b"{nope").await;
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["statusCode"], 400);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_before_decline() {
        // facturaNro fails first, even though monto would also decline.
        let reply = engine(EndpointKind::VentaQr)
            .handle(br#"{"facturaNro": 1, "monto": 2000000}"#)
            .await;
        assert_eq!(reply.status, 406);
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined() {
        let reply = engine(EndpointKind::VentaCanje)
            .handle(br#"{"facturaNro": 100, "monto": 2000000}"#)
            .await;
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["message"], "insufficient balance");
    }

    #[tokio::test(start_paused = true)]
    async fn test_approved() {
        let reply = engine(EndpointKind::VentaQr)
            .handle(br#"{"facturaNro": 100, "monto": 5000}"#)
            .await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["mensajeDisplay"], "APROBADA (QR)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_policy_is_honored() {
        let reply = engine_with(EndpointKind::Debito, FieldPolicy::Strict)
            .handle(b"{}")
            .await;
        assert_eq!(reply.status, 406);
        assert_eq!(reply.body["message"], "invoice number (facturaNro) is required");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_on_approval() {
        let ux = engine(EndpointKind::VentaUx);

        let start = Instant::now();
        let reply = ux.handle(br#"{"facturaNro": 0, "cuotas": 1, "plan": 0}"#).await;
        assert_eq!(reply.status, 406);
        assert!(start.elapsed() < Duration::from_millis(10));

        let start = Instant::now();
        let reply = ux.handle(br#"{"facturaNro": 1, "cuotas": 1, "plan": 0}"#).await;
        assert_eq!(reply.status, 200);
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_profile_delay_override() {
        let profile = KindProfile::for_kind(EndpointKind::VentaUx)
            .with_delay(DelayProfile::Single(Duration::from_millis(50)));
        let engine = TransactionEngine::new(
            profile,
            FieldPolicy::Lenient,
            Arc::new(SharedRng::seeded(1)),
        );

        let start = Instant::now();
        engine
            .handle(br#"{"facturaNro": 1, "cuotas": 1, "plan": 0}"#)
            .await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(100));
    }
}
