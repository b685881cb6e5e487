//! # Artificial Delay Simulator
//!
//! Emulates terminal and network latency.
//!
//! Each pause is a `tokio::time::sleep`, so only the future handling the
//! current request is suspended. Other requests, on the same route or not,
//! keep being served. If the client hangs up, axum drops the handler future
//! and the pause is abandoned; nothing was committed, so nothing leaks.

use std::time::Duration;

use tracing::debug;

/// Suspends the calling request for configured durations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaySimulator;

impl DelaySimulator {
    pub fn new() -> Self {
        DelaySimulator
    }

    /// Suspends the current request for `duration`.
    pub async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        debug!(delay = ?duration, "Simulating terminal latency");
        tokio::time::sleep(duration).await;
    }

    /// Runs `pauses` back to back.
    pub async fn run(&self, pauses: &[Duration]) {
        for pause in pauses {
            self.pause(*pause).await;
        }
    }
}
