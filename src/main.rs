mod cache;
mod config;
mod pipeline;
mod propagation;
mod store;
mod web;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::cache::{RedisSnapshotCache, SnapshotCache};
use crate::config::Config;
use crate::pipeline::CycleScheduler;
use crate::propagation::Sgp4Propagator;
use crate::store::{PgElementRepository, PgGeospatialSink, TleIngestor};

#[derive(Parser)]
#[command(name = "fleettrack")]
#[command(about = "Satellite fleet ground-track worker")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "fleettrack.yaml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the prediction worker loop
    Run,
    /// Serve the read-side HTTP API
    Serve,
    /// Ingest TLE files into the element store
    Ingest { files: Vec<String> },
    /// Fetch current TLEs from Celestrak by NORAD id and store them
    Fetch { norad_ids: Vec<u32> },
    /// Validate the configuration file and print the effective settings
    Validate,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match Config::from_file(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config {}: {}", cli.config, e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Run => run(config).await,
        Commands::Serve => serve(config).await,
        Commands::Ingest { files } => ingest(config, files).await,
        Commands::Fetch { norad_ids } => fetch(config, norad_ids).await,
        Commands::Validate => validate(&config),
    }
}

async fn connect_pool(config: &Config) -> Result<sqlx::PgPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
}

async fn run(config: Config) -> ExitCode {
    let pool = match connect_pool(&config).await {
        Ok(p) => p,
        Err(e) => {
            log::error!("Could not create database pool: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cache = match RedisSnapshotCache::open(&config.cache.url, &config.cache.key) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Invalid cache URL: {e}");
            return ExitCode::FAILURE;
        }
    };
    // no consumer-facing output path without the cache, so don't start
    if let Err(e) = cache.ping().await {
        log::error!("Cache unreachable, refusing to start: {e}");
        return ExitCode::FAILURE;
    }

    let scheduler = CycleScheduler::new(
        Arc::new(PgElementRepository::new(pool.clone())),
        Arc::new(PgGeospatialSink::new(pool)),
        Arc::new(cache),
        Arc::new(Sgp4Propagator),
        config.pipeline,
    );

    scheduler.run().await;
    ExitCode::SUCCESS
}

async fn serve(config: Config) -> ExitCode {
    let cache = match RedisSnapshotCache::open(&config.cache.url, &config.cache.key) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Invalid cache URL: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = cache.ping().await {
        log::warn!("Cache not reachable yet, serving 503 until it is: {e}");
    }

    match web::run_server(&config.web.bind, Arc::new(cache)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn ingest(config: Config, files: Vec<String>) -> ExitCode {
    if files.is_empty() {
        eprintln!("No TLE files given");
        return ExitCode::FAILURE;
    }

    let pool = match connect_pool(&config).await {
        Ok(p) => p,
        Err(e) => {
            log::error!("Could not create database pool: {e}");
            return ExitCode::FAILURE;
        }
    };

    let ingestor = TleIngestor::new(pool);
    let mut failed = false;
    for file in &files {
        match ingestor.ingest_file(Path::new(file)).await {
            Ok(report) => println!(
                "{}: stored {} element sets, skipped {}",
                file, report.stored, report.skipped
            ),
            Err(e) => {
                eprintln!("{}: ingest failed: {}", file, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn fetch(config: Config, norad_ids: Vec<u32>) -> ExitCode {
    if norad_ids.is_empty() {
        eprintln!("No NORAD ids given");
        return ExitCode::FAILURE;
    }

    let pool = match connect_pool(&config).await {
        Ok(p) => p,
        Err(e) => {
            log::error!("Could not create database pool: {e}");
            return ExitCode::FAILURE;
        }
    };

    let ingestor = TleIngestor::new(pool);
    match ingestor.fetch_norad_ids(&norad_ids).await {
        Ok(report) => {
            println!(
                "Celestrak fetch: stored {} element sets, skipped {}",
                report.stored, report.skipped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fetch failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate(config: &Config) -> ExitCode {
    println!("Configuration is valid");
    println!("  cache key: {}", config.cache.key);
    println!(
        "  window: {}s lookback + {}s prediction, {}s interval",
        config.pipeline.lookback_seconds,
        config.pipeline.predict_seconds,
        config.pipeline.sample_interval_seconds
    );
    println!(
        "  cycle: every {}s, up to {} concurrent objects",
        config.pipeline.cycle_seconds, config.pipeline.max_concurrency
    );
    match config.pipeline.cycle_deadline_seconds {
        Some(deadline) => println!("  cycle deadline: {deadline}s"),
        None => println!("  cycle deadline: none"),
    }
    ExitCode::SUCCESS
}
