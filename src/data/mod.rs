//! Core data models for the transit data gateway
//!
//! This module contains the provider identities, the payload types returned by
//! each provider, and the [`Outcome`] wrapper that records where a payload came
//! from (live backend call, cache, or fallback synthesis).

pub mod fallback;

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// A `[longitude, latitude]` pair, GeoJSON order
pub type Coordinates = [f64; 2];

/// The external data domains fronted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Weather,
    Traffic,
    Holidays,
    Emissions,
    Isochrone,
}

impl Provider {
    /// Every provider, in aggregation order
    pub const ALL: [Provider; 5] = [
        Provider::Weather,
        Provider::Traffic,
        Provider::Holidays,
        Provider::Emissions,
        Provider::Isochrone,
    ];

    /// Stable lowercase identifier, used in cache keys and health paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Weather => "weather",
            Provider::Traffic => "traffic",
            Provider::Holidays => "holidays",
            Provider::Emissions => "emissions",
            Provider::Isochrone => "isochrone",
        }
    }

    /// How long a live response from this provider stays in the cache
    pub fn cache_ttl(&self) -> Duration {
        match self {
            Provider::Weather => Duration::from_secs(10 * 60),
            Provider::Traffic => Duration::from_secs(5 * 60),
            Provider::Holidays => Duration::from_secs(24 * 60 * 60),
            Provider::Emissions => Duration::from_secs(60 * 60),
            Provider::Isochrone => Duration::from_secs(30 * 60),
        }
    }

    /// Backend proxy liveness probe path
    pub fn health_path(&self) -> String {
        format!("/api/health/{}", self.as_str())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a payload was produced, carried inside every payload as `source`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Returned by the backend proxy
    #[default]
    Live,
    /// Synthesized locally because the provider was unavailable
    Fallback,
}

/// Provenance of a gateway result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Live,
    Cached,
    Fallback,
}

/// Result of a gateway call, tagged by how it was obtained
///
/// Gateways never fail; a provider failure shows up as `Fallback` with the
/// reason the live path was skipped or failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Fresh response from the backend proxy
    Live(T),
    /// Previously fetched live response served from the cache
    Cached(T),
    /// Synthetic data returned in place of a live response
    Fallback { data: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn data(&self) -> &T {
        match self {
            Outcome::Live(data) | Outcome::Cached(data) => data,
            Outcome::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Outcome::Live(data) | Outcome::Cached(data) => data,
            Outcome::Fallback { data, .. } => data,
        }
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            Outcome::Live(_) => Provenance::Live,
            Outcome::Cached(_) => Provenance::Cached,
            Outcome::Fallback { .. } => Provenance::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    /// Why the live path was not used, for fallback results
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Outcome::Fallback { reason, .. } => Some(reason.as_str()),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct OutcomeView<'a, T> {
    provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    data: &'a T,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeView {
            provenance: self.provenance(),
            reason: self.fallback_reason(),
            data: self.data(),
        }
        .serialize(serializer)
    }
}

/// Current weather conditions for Accra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Condition label, e.g. "partly_cloudy"
    pub condition: String,
    /// Wind speed in km/h
    pub wind_speed: f64,
    #[serde(default)]
    pub source: Source,
}

/// Current road traffic conditions for Accra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficData {
    /// Congestion label, e.g. "moderate"
    pub congestion_level: String,
    /// Average road speed in km/h
    pub average_speed: f64,
    /// Number of reported incidents
    pub incidents: u32,
    /// Estimated delay in minutes
    pub delay_minutes: f64,
    #[serde(default)]
    pub source: Source,
}

/// A single public holiday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Public holidays in Ghana for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayData {
    pub year: i32,
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub source: Source,
}

/// Carbon emissions estimate for one trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsData {
    pub distance_km: f64,
    pub vehicle_type: String,
    /// Total CO2 in kilograms
    pub carbon_kg: f64,
    /// Emission factor applied, kg CO2 per km
    #[serde(default)]
    pub factor_kg_per_km: Option<f64>,
    #[serde(default)]
    pub source: Source,
}

/// GeoJSON polygon geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "type")]
    pub kind: String,
    /// Linear rings; the first is the exterior ring
    pub coordinates: Vec<Vec<Coordinates>>,
}

/// Properties attached to an isochrone feature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsochroneProperties {
    #[serde(default)]
    pub time_minutes: Option<u32>,
    #[serde(default)]
    pub center: Option<Coordinates>,
}

/// Area reachable from a point within a travel-time budget, as a GeoJSON feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneData {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    pub geometry: Polygon,
    #[serde(default)]
    pub properties: IsochroneProperties,
    #[serde(default)]
    pub source: Source,
}

fn feature_kind() -> String {
    "Feature".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_identifiers_are_distinct() {
        let names: Vec<&str> = Provider::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["weather", "traffic", "holidays", "emissions", "isochrone"]);
    }

    #[test]
    fn test_provider_cache_ttls() {
        assert_eq!(Provider::Weather.cache_ttl(), Duration::from_secs(600));
        assert_eq!(Provider::Traffic.cache_ttl(), Duration::from_secs(300));
        assert_eq!(Provider::Holidays.cache_ttl(), Duration::from_secs(86_400));
        assert_eq!(Provider::Emissions.cache_ttl(), Duration::from_secs(3_600));
        assert_eq!(Provider::Isochrone.cache_ttl(), Duration::from_secs(1_800));
    }

    #[test]
    fn test_health_path() {
        assert_eq!(Provider::Holidays.health_path(), "/api/health/holidays");
    }

    #[test]
    fn test_live_payload_without_source_defaults_to_live() {
        let json = r#"{
            "temperature": 29.4,
            "humidity": 81,
            "condition": "sunny",
            "wind_speed": 12.0,
            "pressure_hpa": 1012
        }"#;

        let weather: WeatherData = serde_json::from_str(json).expect("Failed to parse weather");

        assert_eq!(weather.source, Source::Live);
        assert_eq!(weather.condition, "sunny");
        assert!((weather.humidity - 81.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payload_missing_required_field_is_rejected() {
        let json = r#"{"congestion_level": "heavy"}"#;
        assert!(serde_json::from_str::<TrafficData>(json).is_err());
    }

    #[test]
    fn test_isochrone_feature_parses_geojson() {
        let json = r#"{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
            }
        }"#;

        let iso: IsochroneData = serde_json::from_str(json).expect("Failed to parse isochrone");

        assert_eq!(iso.kind, "Feature");
        assert_eq!(iso.geometry.coordinates[0].len(), 5);
        assert_eq!(iso.properties, IsochroneProperties::default());
    }

    #[test]
    fn test_outcome_accessors() {
        let live = Outcome::Live(1);
        let cached = Outcome::Cached(2);
        let fallback = Outcome::Fallback {
            data: 3,
            reason: "circuit open".to_string(),
        };

        assert_eq!(live.provenance(), Provenance::Live);
        assert_eq!(cached.provenance(), Provenance::Cached);
        assert!(fallback.is_fallback());
        assert_eq!(fallback.fallback_reason(), Some("circuit open"));
        assert_eq!(*cached.data(), 2);
        assert_eq!(fallback.into_data(), 3);
    }

    #[test]
    fn test_outcome_serializes_provenance() {
        let outcome = Outcome::Fallback {
            data: EmissionsData {
                distance_km: 10.0,
                vehicle_type: "car".to_string(),
                carbon_kg: 1.2,
                factor_kg_per_km: Some(0.12),
                source: Source::Fallback,
            },
            reason: "circuit open".to_string(),
        };

        let value = serde_json::to_value(&outcome).expect("Failed to serialize outcome");

        assert_eq!(value["provenance"], "fallback");
        assert_eq!(value["reason"], "circuit open");
        assert_eq!(value["data"]["source"], "fallback");
        assert_eq!(value["data"]["vehicle_type"], "car");

        let live = serde_json::to_value(Outcome::Live(5)).expect("Failed to serialize outcome");
        assert!(live.get("reason").is_none());
    }
}
