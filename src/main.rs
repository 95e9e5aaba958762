//! transitgate - query Accra transport data providers through the backend proxy
//!
//! Prints results as JSON on stdout. Provider failures never make a command
//! fail; they show up as `"provenance": "fallback"` in the output. Only bad
//! arguments or configuration exit non-zero, plus `health` when no provider
//! endpoint is reachable.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use transitgate::cli::{validate_coordinates, Cli, Command};
use transitgate::{logging, Aggregator, Gateway, GatewayConfig};

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    cli.command.validate()?;

    let mut config = GatewayConfig::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        config = config.with_backend_url(url)?;
    }

    tracing::info!(
        backend_url = %config.backend_url,
        request_timeout_secs = config.request_timeout_secs,
        failure_threshold = config.failure_threshold,
        cooldown_secs = config.cooldown_secs,
        "Configuration loaded"
    );

    let gateway = Gateway::from_config(&config)?;

    match cli.command {
        Command::Snapshot => {
            let aggregator = Aggregator::new(gateway, config.snapshot.clone());
            print_json(&aggregator.get_comprehensive_data().await)?;
        }
        Command::Health => {
            let aggregator = Aggregator::new(gateway, config.snapshot.clone());
            let report = aggregator.health_check().await;
            print_json(&report)?;
            if !report.backend_available {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Weather => print_json(&gateway.get_weather_data().await)?,
        Command::Traffic => print_json(&gateway.get_traffic_data().await)?,
        Command::Holidays => print_json(&gateway.get_holiday_data().await)?,
        Command::Emissions { distance, vehicle } => {
            print_json(&gateway.get_emissions_data(distance, &vehicle).await)?
        }
        Command::Isochrone { lng, lat, minutes } => {
            let center = validate_coordinates(lng, lat)?;
            print_json(&gateway.get_isochrone_data(center, minutes).await)?
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
