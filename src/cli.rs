//! Command-line interface parsing for transitgate
//!
//! This module handles parsing of CLI arguments using clap, plus the semantic
//! checks on trip and coordinate arguments that clap cannot express.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;

use crate::data::Coordinates;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// Trip distance is negative or not a number
    #[error("Invalid distance: {0}. Distance must be a non-negative number of kilometres")]
    InvalidDistance(f64),

    /// Coordinate outside the valid longitude/latitude range
    #[error("Invalid coordinates: [{0}, {1}]. Longitude must be within ±180 and latitude within ±90")]
    InvalidCoordinates(f64, f64),
}

/// transitgate - resilient access to Accra transport data providers
#[derive(Parser, Debug)]
#[command(name = "transitgate")]
#[command(about = "Weather, traffic, holiday, emissions and isochrone data with circuit breaking and fallbacks")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend proxy base URL (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Query every provider concurrently and print the combined result
    Snapshot,
    /// Probe the backend proxy health endpoints
    Health,
    /// Current weather for Accra
    Weather,
    /// Current traffic conditions for Accra
    Traffic,
    /// Ghana public holidays
    Holidays,
    /// Carbon estimate for a trip
    ///
    /// Examples:
    ///   transitgate emissions --distance 25
    ///   transitgate emissions --distance 12.5 --vehicle car
    Emissions {
        /// Trip distance in kilometres
        #[arg(long)]
        distance: f64,
        /// Vehicle type: bus, car, motorcycle, shared-van
        #[arg(long, default_value = "bus")]
        vehicle: String,
    },
    /// Area reachable from a point within a travel time
    Isochrone {
        /// Longitude of the starting point
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Latitude of the starting point
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Travel time budget in minutes
        #[arg(long, default_value_t = 30)]
        minutes: u32,
    },
}

/// Checks a trip distance argument
pub fn validate_distance(distance: f64) -> Result<f64, CliError> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(distance)
    } else {
        Err(CliError::InvalidDistance(distance))
    }
}

/// Checks a longitude/latitude pair and returns it in `[lng, lat]` order
pub fn validate_coordinates(lng: f64, lat: f64) -> Result<Coordinates, CliError> {
    if (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat) {
        Ok([lng, lat])
    } else {
        Err(CliError::InvalidCoordinates(lng, lat))
    }
}

impl Command {
    /// Rejects argument values that parse but make no sense
    pub fn validate(&self) -> Result<(), CliError> {
        match self {
            Command::Emissions { distance, .. } => validate_distance(*distance).map(|_| ()),
            Command::Isochrone { lng, lat, .. } => validate_coordinates(*lng, *lat).map(|_| ()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_distance() {
        assert_eq!(validate_distance(25.0).unwrap(), 25.0);
        assert_eq!(validate_distance(0.0).unwrap(), 0.0);
        assert!(validate_distance(-1.0).is_err());
        assert!(validate_distance(f64::NAN).is_err());
        assert!(validate_distance(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert_eq!(validate_coordinates(-0.187, 5.6037).unwrap(), [-0.187, 5.6037]);
        assert!(validate_coordinates(181.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -91.0).is_err());
    }

    #[test]
    fn test_invalid_distance_message() {
        let err = validate_distance(-3.0).unwrap_err();
        assert!(err.to_string().contains("Invalid distance"));
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn test_cli_parse_snapshot() {
        let cli = Cli::parse_from(["transitgate", "snapshot"]);
        assert_eq!(cli.command, Command::Snapshot);
        assert!(cli.config.is_none());
        assert!(cli.backend_url.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "transitgate",
            "health",
            "--backend-url",
            "http://proxy:9000",
            "-vv",
        ]);
        assert_eq!(cli.command, Command::Health);
        assert_eq!(cli.backend_url.as_deref(), Some("http://proxy:9000"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_parse_emissions_default_vehicle() {
        let cli = Cli::parse_from(["transitgate", "emissions", "--distance", "25"]);
        assert_eq!(
            cli.command,
            Command::Emissions {
                distance: 25.0,
                vehicle: "bus".to_string(),
            }
        );
        assert!(cli.command.validate().is_ok());
    }

    #[test]
    fn test_cli_parse_isochrone_negative_longitude() {
        let cli = Cli::parse_from([
            "transitgate",
            "isochrone",
            "--lng",
            "-0.187",
            "--lat",
            "5.6037",
        ]);
        assert_eq!(
            cli.command,
            Command::Isochrone {
                lng: -0.187,
                lat: 5.6037,
                minutes: 30,
            }
        );
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["transitgate"]).is_err());
    }

    #[test]
    fn test_command_validate_rejects_bad_coordinates() {
        let command = Command::Isochrone {
            lng: 200.0,
            lat: 0.0,
            minutes: 10,
        };
        assert!(command.validate().is_err());
    }
}
