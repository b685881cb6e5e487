//! # Simulador POS Server
//!
//! HTTP service that mimics a payment terminal so client software can be
//! built and tested without hardware.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Simulator Server                                │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────────┐  ┌──────────────────────┐  │
//! │  │  routes        │  │  engine            │  │  delay               │  │
//! │  │                │  │                    │  │                      │  │
//! │  │ • banner       │─►│ • parse            │─►│ • tokio sleep        │  │
//! │  │ • POST /pos/*  │  │ • validate/decline │  │ • per-request only   │  │
//! │  │ • catalogs     │  │ • synthesize       │  │                      │  │
//! │  └────────────────┘  └────────────────────┘  └──────────────────────┘  │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                   simpos-core (rules, payloads, RNG)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables, see [`config`]:
//! - `SIMPOS_BIND_ADDR` / `SIMPOS_PORT` - listen address (default `0.0.0.0:3000`)
//! - `SIMPOS_FIELD_POLICY` - `lenient` or `strict`
//! - `SIMPOS_ECHO_DELAY` - `fixed` or `parity`
//! - `SIMPOS_SALE_DELAY_MS` - first-party sale pause
//! - `SIMPOS_RNG_SEED` - reproducible synthetic data

pub mod config;
pub mod delay;
pub mod engine;
pub mod error;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use simpos_core::types::KindProfile;
use simpos_core::validation::FieldPolicy;
use simpos_core::{RandomSource, SharedRng};
use tokio::net::TcpListener;
use tracing::info;

// Re-exports
pub use config::ServerConfig;
pub use engine::TransactionEngine;
pub use error::{ServerError, ServerResult};
pub use routes::router;

/// Shared application state.
///
/// The random provider is the only thing shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub rng: Arc<dyn RandomSource>,
    pub policy: FieldPolicy,
    pub profiles: Vec<KindProfile>,
}

impl AppState {
    /// State with the default profile of every kind.
    pub fn new(rng: Arc<dyn RandomSource>, policy: FieldPolicy) -> Self {
        AppState {
            rng,
            policy,
            profiles: ServerConfig::default().profiles(),
        }
    }

    /// State derived from `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        let rng: Arc<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Arc::new(SharedRng::seeded(seed)),
            None => Arc::new(SharedRng::from_entropy()),
        };

        AppState {
            rng,
            policy: config.field_policy,
            profiles: config.profiles(),
        }
    }
}

/// Binds the listener and serves until `shutdown` resolves.
///
/// A bind failure is returned as [`ServerError::Bind`]; the binary treats it
/// as fatal.
pub async fn serve<F>(config: &ServerConfig, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(config);
    let app = router(&state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(
        addr = %addr,
        "Listening on http://127.0.0.1:{}/ (press Ctrl+C to stop)",
        config.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    info!("Server shutdown complete");
    Ok(())
}
