//! Combined snapshot and backend health check
//!
//! The snapshot runs every gateway concurrently and waits for all of them;
//! gateways never fail, so one slow or broken provider only ever costs its own
//! request timeout. The health check probes the backend proxy directly,
//! bypassing cache and breakers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;

use crate::config::SnapshotConfig;
use crate::data::{
    EmissionsData, HolidayData, IsochroneData, Outcome, Provider, TrafficData, WeatherData,
};
use crate::gateway::Gateway;

/// Results from all five providers at one point in time
#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveData {
    pub weather: Outcome<WeatherData>,
    pub traffic: Outcome<TrafficData>,
    pub holidays: Outcome<HolidayData>,
    pub emissions: Outcome<EmissionsData>,
    pub isochrone: Outcome<IsochroneData>,
    /// Providers answered from a live call or the cache rather than fallback
    pub operational_apis: usize,
    pub total_apis: usize,
    pub timestamp: DateTime<Utc>,
}

/// Reachability of each backend proxy health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub providers: BTreeMap<Provider, bool>,
    /// True if at least one provider endpoint answered with 2xx
    pub backend_available: bool,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_healthy(&self, provider: Provider) -> bool {
        self.providers.get(&provider).copied().unwrap_or(false)
    }

    pub fn healthy_count(&self) -> usize {
        self.providers.values().filter(|healthy| **healthy).count()
    }
}

/// Fans requests out to every provider gateway
#[derive(Debug, Clone)]
pub struct Aggregator {
    gateway: Gateway,
    snapshot: SnapshotConfig,
}

impl Aggregator {
    pub fn new(gateway: Gateway, snapshot: SnapshotConfig) -> Self {
        Self { gateway, snapshot }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Queries all providers concurrently and counts how many were not degraded
    pub async fn get_comprehensive_data(&self) -> ComprehensiveData {
        let SnapshotConfig {
            distance_km,
            vehicle_type,
            center,
            time_minutes,
        } = &self.snapshot;

        let (weather, traffic, holidays, emissions, isochrone) = tokio::join!(
            self.gateway.get_weather_data(),
            self.gateway.get_traffic_data(),
            self.gateway.get_holiday_data(),
            self.gateway.get_emissions_data(*distance_km, vehicle_type),
            self.gateway.get_isochrone_data(*center, *time_minutes),
        );

        let operational_apis = [
            weather.is_fallback(),
            traffic.is_fallback(),
            holidays.is_fallback(),
            emissions.is_fallback(),
            isochrone.is_fallback(),
        ]
        .iter()
        .filter(|fallback| !**fallback)
        .count();

        tracing::info!(
            operational = operational_apis,
            total = Provider::ALL.len(),
            "Comprehensive snapshot complete"
        );

        ComprehensiveData {
            weather,
            traffic,
            holidays,
            emissions,
            isochrone,
            operational_apis,
            total_apis: Provider::ALL.len(),
            timestamp: Utc::now(),
        }
    }

    /// Probes `/api/health/<provider>` for every provider concurrently
    pub async fn health_check(&self) -> HealthReport {
        let client = self.gateway.client();
        let probes = Provider::ALL.iter().map(|&provider| async move {
            let healthy = match client.probe(&provider.health_path()).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(provider = %provider, error = %e, "Health check failed");
                    false
                }
            };
            (provider, healthy)
        });

        let providers: BTreeMap<Provider, bool> = join_all(probes).await.into_iter().collect();
        let backend_available = providers.values().any(|healthy| *healthy);

        tracing::info!(backend_available, "Health check complete");

        HealthReport {
            providers,
            backend_available,
            timestamp: Utc::now(),
        }
    }
}
