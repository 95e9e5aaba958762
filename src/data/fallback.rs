//! Synthetic fallback payloads
//!
//! Each function produces a plausible payload for one provider without any
//! network access. Every payload is tagged with [`Source::Fallback`].

use chrono::NaiveDate;
use rand::Rng;

use super::{
    Coordinates, EmissionsData, Holiday, HolidayData, IsochroneData, IsochroneProperties, Polygon,
    Source, TrafficData, WeatherData,
};

/// Emission factor used for unknown vehicle types (kg CO2/km)
const BUS_FACTOR_KG_PER_KM: f64 = 0.089;

/// Emission factors by vehicle type (kg CO2/km)
const EMISSION_FACTORS: [(&str, f64); 4] = [
    ("bus", BUS_FACTOR_KG_PER_KM),
    ("car", 0.12),
    ("motorcycle", 0.06),
    ("shared-van", 0.095),
];

/// Degrees covered per minute of travel at roughly 50 km/h
const DEGREES_PER_MINUTE: f64 = 0.8 / 60.0;

/// Ghana public holidays as (month, day, name)
///
/// Farmers' Day moves with the first Friday of December; it is pinned here.
const GHANA_HOLIDAYS: [(u32, u32, &str); 10] = [
    (1, 1, "New Year's Day"),
    (1, 7, "Constitution Day"),
    (3, 6, "Independence Day"),
    (5, 1, "May Day"),
    (7, 1, "Republic Day"),
    (8, 4, "Founders' Day"),
    (9, 21, "Kwame Nkrumah Memorial Day"),
    (12, 5, "Farmers' Day"),
    (12, 25, "Christmas Day"),
    (12, 26, "Boxing Day"),
];

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Warm, humid, partly cloudy conditions typical of Accra
pub fn weather<R: Rng + ?Sized>(rng: &mut R) -> WeatherData {
    WeatherData {
        temperature: one_decimal(rng.gen_range(28.0..=32.0)),
        humidity: f64::from(rng.gen_range(70u8..=90)),
        condition: "partly_cloudy".to_string(),
        wind_speed: one_decimal(rng.gen_range(15.0..=25.0)),
        source: Source::Fallback,
    }
}

/// Moderate congestion with a handful of incidents
pub fn traffic<R: Rng + ?Sized>(rng: &mut R) -> TrafficData {
    TrafficData {
        congestion_level: "moderate".to_string(),
        average_speed: one_decimal(rng.gen_range(25.0..=40.0)),
        incidents: rng.gen_range(0..=2),
        delay_minutes: f64::from(rng.gen_range(0u8..15)),
        source: Source::Fallback,
    }
}

/// Known Ghana public holidays stamped with `year`
pub fn holidays(year: i32) -> HolidayData {
    let holidays = GHANA_HOLIDAYS
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| Holiday {
                date,
                name: name.to_string(),
            })
        })
        .collect();

    HolidayData {
        year,
        holidays,
        source: Source::Fallback,
    }
}

/// Emission factor for a vehicle type, defaulting to the bus factor
///
/// Matching ignores case, surrounding whitespace, and `_` versus `-`.
pub fn emission_factor(vehicle_type: &str) -> f64 {
    let normalized = vehicle_type.trim().to_lowercase().replace('_', "-");
    EMISSION_FACTORS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|&(_, factor)| factor)
        .unwrap_or(BUS_FACTOR_KG_PER_KM)
}

/// Table-based emissions estimate: `distance_km * factor`
pub fn emissions(distance_km: f64, vehicle_type: &str) -> EmissionsData {
    let factor = emission_factor(vehicle_type);
    EmissionsData {
        distance_km,
        vehicle_type: vehicle_type.to_string(),
        carbon_kg: distance_km * factor,
        factor_kg_per_km: Some(factor),
        source: Source::Fallback,
    }
}

/// Square reachability polygon centered on `center`
///
/// The half-width is `time_minutes * 0.8 / 60` degrees; the ring has five
/// points with the first repeated last.
pub fn isochrone(center: Coordinates, time_minutes: u32) -> IsochroneData {
    let [lng, lat] = center;
    let radius = f64::from(time_minutes) * DEGREES_PER_MINUTE;

    let ring = vec![
        [lng - radius, lat - radius],
        [lng + radius, lat - radius],
        [lng + radius, lat + radius],
        [lng - radius, lat + radius],
        [lng - radius, lat - radius],
    ];

    IsochroneData {
        kind: "Feature".to_string(),
        geometry: Polygon {
            kind: "Polygon".to_string(),
            coordinates: vec![ring],
        },
        properties: IsochroneProperties {
            time_minutes: Some(time_minutes),
            center: Some(center),
        },
        source: Source::Fallback,
    }
}
