//! CLI entry point for the transit journey estimator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::config::Settings;
use transit_server::domain::{format_instant, parse_instant};
use transit_server::estimate::{EstimateConfig, EstimateError, JourneyEstimator};
use transit_server::reference::{ReferenceRepository, build_reference};
use transit_server::web::{AppState, create_router, journey_summary, service_now};

#[derive(Parser)]
#[command(name = "transit-server")]
#[command(about = "Real-time transit journey estimates with uncertainty bands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,

    /// Estimate one journey and print the result
    Journey {
        /// Stop to depart from
        #[arg(long, default_value = "place-davis")]
        origin: String,

        /// Stop to arrive at
        #[arg(long, default_value = "place-harsq")]
        destination: String,

        /// Route to travel on
        #[arg(long, default_value = "Red")]
        route: String,

        /// Estimate as of this instant (ISO-8601 with offset; defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Build reference JSON from a GTFS feed
    BuildReference {
        /// Directory containing stops.txt and routes.txt
        #[arg(long, default_value = "data/gtfs_raw")]
        gtfs_dir: PathBuf,

        /// Directory to write stops_min.json and routes_min.json to
        #[arg(long, default_value = "data/reference")]
        out_dir: PathBuf,
    },

    /// Load reference data through the configured storage and print a sample
    ReferenceSmoke,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => serve().await?,
        Commands::Journey {
            origin,
            destination,
            route,
            now,
        } => journey(&origin, &destination, &route, now.as_deref()).await?,
        Commands::BuildReference { gtfs_dir, out_dir } => {
            let summary = build_reference(&gtfs_dir, &out_dir)?;
            println!("Built reference data:");
            println!("- {} ({} stops)", summary.stops_path.display(), summary.stops_written);
            println!("- {} ({} routes)", summary.routes_path.display(), summary.routes_written);
        }
        Commands::ReferenceSmoke => reference_smoke().await?,
    }

    Ok(())
}

async fn serve() -> Result<()> {
    let settings = Settings::from_env()?;

    let predictions = settings
        .prediction_backend()
        .context("failed to create prediction source")?;
    let storage = settings.storage.connect().await;
    let reference = ReferenceRepository::new(storage);

    let state = AppState::new(
        predictions,
        reference,
        EstimateConfig::default(),
        settings.cors_origins.clone(),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    info!(
        addr = %settings.bind_addr,
        reference = %settings.storage,
        mock = settings.mock_predictions_dir.is_some(),
        "transit server listening"
    );
    println!("Transit journey estimator listening on http://{}", settings.bind_addr);
    println!();
    println!("API Endpoints:");
    println!("  GET  /health      - Health check");
    println!("  POST /estimate    - Estimate a journey");
    println!("  GET  /api/stops   - List stops");
    println!("  GET  /api/routes  - List routes");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn journey(origin: &str, destination: &str, route: &str, now: Option<&str>) -> Result<()> {
    let settings = Settings::from_env()?;
    let predictions = settings
        .prediction_backend()
        .context("failed to create prediction source")?;

    let now = match now {
        Some(s) => parse_instant(s).context("invalid --now")?,
        None => service_now(),
    };

    let estimator = JourneyEstimator::new(&predictions, EstimateConfig::default());
    let result = match estimator
        .estimate_journey(origin, destination, route, now)
        .await
    {
        Ok(result) => result,
        Err(EstimateError::NotFound(message)) => {
            println!("Journey estimation failed: {message}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Journey estimate");
    println!("----------------");
    println!("Route: {}", result.route_id);
    println!("Trip: {}", result.trip_id);
    println!("Generated at: {}", format_instant(&result.generated_at));
    println!("Depart: {}", format_instant(&result.eta.depart_time));
    println!("Arrive P50: {}", format_instant(&result.eta.p50_arrival));
    println!("Arrive P80: {}", format_instant(&result.eta.p80_arrival));
    println!("Arrive P90: {}", format_instant(&result.eta.p90_arrival));
    match result.eta.headway_seconds {
        Some(h) => println!("Headway (s): {h}"),
        None => println!("Headway (s): unknown"),
    }
    println!("ETA explanation: {}", result.eta.explanation);
    println!("Reliability score: {}", result.reliability.score);
    println!("Reliability reasons: {}", result.reliability.reasons.join("; "));
    println!();
    println!("{}", journey_summary(&result)?);

    Ok(())
}

async fn reference_smoke() -> Result<()> {
    let settings = Settings::from_env()?;
    info!(reference = %settings.storage, "loading reference data");

    let repo = ReferenceRepository::new(settings.storage.connect().await);
    let stops = repo.list_stops().await?;
    let routes = repo.list_routes().await?;

    println!("stops: {}", stops.len());
    if let Some(first) = stops.first() {
        println!("first stop: {} ({})", first.stop_name, first.stop_id);
    }
    println!("routes: {}", routes.len());
    if let Some(first) = routes.first() {
        let name = first
            .route_long_name
            .as_deref()
            .or(first.route_short_name.as_deref())
            .unwrap_or("-");
        println!("first route: {} ({})", name, first.route_id);
    }

    Ok(())
}
