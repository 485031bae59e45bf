//! Ride-hailing walkthrough binary.
//!
//! # Usage
//!
//! ```bash
//! # Interactive: type commands, see `ridehail_cli::command`
//! ridehail
//!
//! # Book straight away and watch the ride to completion
//! ridehail --pickup "12 Main St" --dropoff "JFK Airport" --tier comfort < /dev/null
//!
//! # Fast clock, cancel once a driver is assigned
//! ridehail --pickup A --dropoff B --status-interval-ms 500 --position-interval-ms 150 --cancel-at 1
//! ```

use std::time::Duration;

use clap::Parser;
use ridehail_app::{App, AppConfig, AppEvent, Runtime};
use ridehail_cli::{ConsoleDriver, SystemEnv, catalog};
use ridehail_core::{NavigationConfig, ParamScope, RideConfig, RideStatus};
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Ride-hailing flow on the terminal
#[derive(Parser, Debug)]
#[command(name = "ridehail")]
#[command(about = "Book a mock ride and follow it on the terminal")]
#[command(version)]
struct Args {
    /// Time between ride status advances, in milliseconds
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    status_interval_ms: u64,

    /// Time between driver position updates, in milliseconds
    #[arg(long, default_value_t = 3_000, value_parser = clap::value_parser!(u64).range(1..))]
    position_interval_ms: u64,

    /// Navigation parameter storage (per-screen, per-entry)
    #[arg(long, default_value = "per-screen")]
    param_scope: ParamScope,

    /// Pickup address for a ride booked at startup
    #[arg(long, requires = "dropoff")]
    pickup: Option<String>,

    /// Dropoff address for a ride booked at startup
    #[arg(long, requires = "pickup")]
    dropoff: Option<String>,

    /// Ride tier for a ride booked at startup
    #[arg(long, default_value = catalog::DEFAULT_TIER)]
    tier: String,

    /// Cancel the ride once it reaches this status index (0-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    cancel_at: Option<u8>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let ride = catalog::find(&args.tier).ok_or_else(|| format!("unknown ride tier: {}", args.tier))?;
    let script = match (args.pickup, args.dropoff) {
        (Some(pickup), Some(dropoff)) => {
            vec![AppEvent::BookRide { pickup, dropoff }, AppEvent::ConfirmRide { ride }]
        },
        _ => Vec::new(),
    };

    let config = AppConfig {
        ride: RideConfig {
            status_interval: Duration::from_millis(args.status_interval_ms),
            position_interval: Duration::from_millis(args.position_interval_ms),
            ..RideConfig::default()
        },
        navigation: NavigationConfig { param_scope: args.param_scope },
    };

    tracing::info!(?config, "ridehail starting");

    let driver = ConsoleDriver::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
        .with_script(script)
        .with_cancel_at(args.cancel_at.and_then(RideStatus::from_index));
    let app = Runtime::new(driver, App::new(SystemEnv::new(), config)).run().await?;

    tracing::info!(
        rides = app.rides_started(),
        screen = %app.current_screen(),
        "ridehail finished"
    );

    Ok(())
}
