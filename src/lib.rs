//! transitgate library
//!
//! Resilient access to weather, traffic, holiday, emissions and isochrone data
//! served by a backend proxy. Every provider call goes through a TTL cache and
//! a per-provider circuit breaker, and degrades to synthetic fallback data
//! instead of failing.

pub mod aggregator;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod resilience;

pub use aggregator::{Aggregator, ComprehensiveData, HealthReport};
pub use config::GatewayConfig;
pub use data::{Outcome, Provenance, Provider, Source};
pub use gateway::Gateway;
