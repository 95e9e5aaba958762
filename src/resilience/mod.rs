//! Shared resilience state.
//!
//! # Data Flow
//! ```text
//! Gateway call:
//!     → cache (fresh live response? serve it)
//!     → circuit_breaker (provider open? skip the network)
//!     → backend call
//!     → circuit_breaker (record success or failure)
//! ```
//!
//! One [`ResilienceContext`] is built at startup and shared by `Arc` with every
//! gateway, so breaker and cache state are common to all callers without
//! process-wide globals.

pub mod circuit_breaker;

pub use circuit_breaker::{BreakerRegistry, BreakerSettings, BreakerState, ResetPolicy};

use serde_json::Value;

use crate::cache::TtlCache;
use crate::config::GatewayConfig;

/// Breaker registry and response cache shared across gateways
#[derive(Debug, Default)]
pub struct ResilienceContext {
    pub breakers: BreakerRegistry,
    pub cache: TtlCache<Value>,
}

impl ResilienceContext {
    pub fn new(breakers: BreakerRegistry, cache: TtlCache<Value>) -> Self {
        Self { breakers, cache }
    }

    /// Builds the context described by the gateway configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            BreakerRegistry::new(config.breaker_settings()),
            TtlCache::with_capacity(config.cache_capacity),
        )
    }
}
