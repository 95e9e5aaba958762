//! Provider gateways
//!
//! Each public method fronts one provider with the same pipeline: serve a fresh
//! cached response if there is one, skip the network while the provider's
//! breaker is open, otherwise call the backend proxy. Live responses reset the
//! breaker and are cached; failures are logged, counted against the breaker,
//! and replaced with fallback data that is never cached.

pub mod client;

pub use client::BackendClient;

use std::future::Future;
use std::sync::Arc;

use chrono::{Datelike, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::GatewayConfig;
use crate::data::{
    fallback, Coordinates, EmissionsData, HolidayData, IsochroneData, Outcome, Provider,
    TrafficData, WeatherData,
};
use crate::error::GatewayError;
use crate::resilience::ResilienceContext;

const WEATHER_PATH: &str = "/api/weather/accra";
const TRAFFIC_PATH: &str = "/api/traffic/accra";
const HOLIDAYS_PATH: &str = "/api/holidays/ghana";
const EMISSIONS_PATH: &str = "/api/emissions/calculate";
const ISOCHRONE_PATH: &str = "/api/isochrone/generate";

/// Reason recorded on fallback results served while a breaker is open
pub const CIRCUIT_OPEN_REASON: &str = "circuit open";

#[derive(Debug, Serialize)]
struct EmissionsRequest<'a> {
    distance_km: f64,
    vehicle_type: &'a str,
}

#[derive(Debug, Serialize)]
struct IsochroneRequest {
    coordinates: Coordinates,
    time_minutes: u32,
}

/// Cache key for a weather response
pub fn weather_key() -> String {
    format!("{}-accra", Provider::Weather)
}

/// Cache key for a traffic response
pub fn traffic_key() -> String {
    format!("{}-accra", Provider::Traffic)
}

/// Cache key for a holiday response
pub fn holidays_key() -> String {
    format!("{}-ghana", Provider::Holidays)
}

/// Cache key for an emissions response, e.g. `emissions-25-bus`
pub fn emissions_key(distance_km: f64, vehicle_type: &str) -> String {
    format!("{}-{}-{}", Provider::Emissions, distance_km, vehicle_type)
}

/// Cache key for an isochrone response
pub fn isochrone_key(coordinates: Coordinates, time_minutes: u32) -> String {
    format!(
        "{}-{}-{}-{}",
        Provider::Isochrone,
        coordinates[0],
        coordinates[1],
        time_minutes
    )
}

/// Never-failing access to every provider through the backend proxy
#[derive(Debug, Clone)]
pub struct Gateway {
    client: BackendClient,
    context: Arc<ResilienceContext>,
}

impl Gateway {
    pub fn new(client: BackendClient, context: Arc<ResilienceContext>) -> Self {
        Self { client, context }
    }

    /// Builds a gateway with a fresh resilience context from configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = BackendClient::new(&config.backend_url, config.request_timeout())?;
        let context = Arc::new(ResilienceContext::from_config(config));
        Ok(Self::new(client, context))
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn context(&self) -> &Arc<ResilienceContext> {
        &self.context
    }

    /// Current weather for Accra
    pub async fn get_weather_data(&self) -> Outcome<WeatherData> {
        self.fetch(
            Provider::Weather,
            weather_key(),
            self.client.get_json(WEATHER_PATH),
            || fallback::weather(&mut rand::thread_rng()),
        )
        .await
    }

    /// Current traffic conditions for Accra
    pub async fn get_traffic_data(&self) -> Outcome<TrafficData> {
        self.fetch(
            Provider::Traffic,
            traffic_key(),
            self.client.get_json(TRAFFIC_PATH),
            || fallback::traffic(&mut rand::thread_rng()),
        )
        .await
    }

    /// Ghana public holidays
    pub async fn get_holiday_data(&self) -> Outcome<HolidayData> {
        self.fetch(
            Provider::Holidays,
            holidays_key(),
            self.client.get_json(HOLIDAYS_PATH),
            || fallback::holidays(Local::now().year()),
        )
        .await
    }

    /// Carbon estimate for a trip of `distance_km` by `vehicle_type`
    pub async fn get_emissions_data(
        &self,
        distance_km: f64,
        vehicle_type: &str,
    ) -> Outcome<EmissionsData> {
        let body = EmissionsRequest {
            distance_km,
            vehicle_type,
        };
        self.fetch(
            Provider::Emissions,
            emissions_key(distance_km, vehicle_type),
            self.client.post_json(EMISSIONS_PATH, &body),
            || fallback::emissions(distance_km, vehicle_type),
        )
        .await
    }

    /// Area reachable from `coordinates` (`[lng, lat]`) within `time_minutes`
    pub async fn get_isochrone_data(
        &self,
        coordinates: Coordinates,
        time_minutes: u32,
    ) -> Outcome<IsochroneData> {
        let body = IsochroneRequest {
            coordinates,
            time_minutes,
        };
        self.fetch(
            Provider::Isochrone,
            isochrone_key(coordinates, time_minutes),
            self.client.post_json(ISOCHRONE_PATH, &body),
            || fallback::isochrone(coordinates, time_minutes),
        )
        .await
    }

    /// Cache, then breaker, then backend call, then fallback
    ///
    /// `call` is only awaited when the cache misses and the breaker is closed.
    async fn fetch<T, Fut, F>(
        &self,
        provider: Provider,
        key: String,
        call: Fut,
        make_fallback: F,
    ) -> Outcome<T>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, GatewayError>>,
        F: FnOnce() -> T,
    {
        let cache = &self.context.cache;
        let breakers = &self.context.breakers;

        if let Some(value) = cache.get(&key) {
            match serde_json::from_value::<T>(value) {
                Ok(data) => {
                    tracing::debug!(provider = %provider, key = %key, "Cache hit");
                    return Outcome::Cached(data);
                }
                Err(e) => {
                    tracing::warn!(provider = %provider, key = %key, error = %e, "Dropping unreadable cache entry");
                    cache.remove(&key);
                }
            }
        }

        if breakers.is_open(provider) {
            tracing::debug!(provider = %provider, "Circuit open, serving fallback");
            return Outcome::Fallback {
                data: make_fallback(),
                reason: CIRCUIT_OPEN_REASON.to_string(),
            };
        }

        match call.await {
            Ok(data) => {
                breakers.record_success(provider);
                match serde_json::to_value(&data) {
                    Ok(value) => cache.set(key, value, provider.cache_ttl()),
                    Err(e) => {
                        tracing::warn!(provider = %provider, error = %e, "Failed to cache live response")
                    }
                }
                tracing::debug!(provider = %provider, "Live response");
                Outcome::Live(data)
            }
            Err(e) => {
                tracing::warn!(
                    provider = %provider,
                    error = %e,
                    timeout = e.is_timeout(),
                    "Provider call failed, serving fallback"
                );
                breakers.record_failure(provider);
                Outcome::Fallback {
                    data: make_fallback(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
