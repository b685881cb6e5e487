//! Simulator configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `SIMPOS_BIND_ADDR` | `0.0.0.0` | listen address |
//! | `SIMPOS_PORT` | `3000` | listen port |
//! | `SIMPOS_FIELD_POLICY` | `lenient` | `lenient` or `strict` |
//! | `SIMPOS_ECHO_DELAY` | `fixed` | `fixed` or `parity` |
//! | `SIMPOS_SALE_DELAY_MS` | `1500` | pause of the double-delay sale |
//! | `SIMPOS_RNG_SEED` | unset | seed for reproducible runs |

use std::env;
use std::time::Duration;

use simpos_core::types::{
    DelayProfile, EndpointKind, KindProfile, PARITY_BASE, PARITY_STEP, SALE_DELAY,
};
use simpos_core::validation::FieldPolicy;

/// Default HTTP port, as on the physical terminal integration.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address (all interfaces).
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// How the echo endpoint paces its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoDelayMode {
    /// Short fixed pause on every echo.
    #[default]
    Fixed,
    /// Even values pause `100 + 10 * eco` ms, odd values answer at once.
    Parity,
}

/// Simulator configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Listen port
    pub port: u16,

    /// Treatment of absent / mistyped sale fields
    pub field_policy: FieldPolicy,

    /// Echo pacing
    pub echo_delay: EchoDelayMode,

    /// Pause used (twice) by the first-party sale flow, in milliseconds
    pub sale_delay_ms: u64,

    /// Fixed seed for the shared generator
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            field_policy: FieldPolicy::default(),
            echo_delay: EchoDelayMode::default(),
            sale_delay_ms: u64::try_from(SALE_DELAY.as_millis()).unwrap_or(u64::MAX),
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let port = match lookup("SIMPOS_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SIMPOS_PORT".to_string()))?,
            None => defaults.port,
        };

        let field_policy = match lookup("SIMPOS_FIELD_POLICY") {
            Some(raw) => FieldPolicy::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("SIMPOS_FIELD_POLICY".to_string()))?,
            None => defaults.field_policy,
        };

        let echo_delay = match lookup("SIMPOS_ECHO_DELAY").map(|raw| raw.trim().to_lowercase()) {
            Some(raw) if raw == "fixed" => EchoDelayMode::Fixed,
            Some(raw) if raw == "parity" => EchoDelayMode::Parity,
            Some(_) => return Err(ConfigError::InvalidValue("SIMPOS_ECHO_DELAY".to_string())),
            None => defaults.echo_delay,
        };

        let sale_delay_ms = match lookup("SIMPOS_SALE_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SIMPOS_SALE_DELAY_MS".to_string()))?,
            None => defaults.sale_delay_ms,
        };

        let rng_seed = match lookup("SIMPOS_RNG_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SIMPOS_RNG_SEED".to_string()))?,
            ),
            None => None,
        };

        let config = ServerConfig {
            bind_addr: lookup("SIMPOS_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            field_policy,
            echo_delay,
            sale_delay_ms,
            rng_seed,
        };

        if config.bind_addr.trim().is_empty() {
            return Err(ConfigError::MissingRequired("SIMPOS_BIND_ADDR".to_string()));
        }

        Ok(config)
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Per-kind profiles with this configuration's delay overrides applied.
    pub fn profiles(&self) -> Vec<KindProfile> {
        EndpointKind::all()
            .into_iter()
            .map(|kind| {
                let profile = KindProfile::for_kind(kind);
                let parity_echo = self.echo_delay == EchoDelayMode::Parity;
                match (kind, profile.delay) {
                    (EndpointKind::Echo, _) if parity_echo => {
                        profile.with_delay(DelayProfile::Parity {
                            base: PARITY_BASE,
                            step: PARITY_STEP,
                        })
                    }
                    (_, DelayProfile::Double(_)) => {
                        let pause = Duration::from_millis(self.sale_delay_ms);
                        profile.with_delay(DelayProfile::Double(pause))
                    }
                    _ => profile,
                }
            })
            .collect()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
