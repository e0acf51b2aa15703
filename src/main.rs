//! SurfsUp Climate API - Main Service
//!
//! Serves the Hawaii weather observations file as a small read-only JSON API:
//! precipitation for the last year of data, the station list, the most
//! active station's temperatures, and min/avg/max temperature summaries.
//!
//! Usage:
//!   cargo run --release                              # Serve on 127.0.0.1:5000
//!   cargo run --release -- --port 8080               # Override the listen port
//!   cargo run --release -- --config other.toml       # Alternate config file
//!   cargo run --release -- --database sqlite:///Resources/hawaii.sqlite
//!
//! Environment:
//!   DATABASE_URL - data file URL (overrides surfsup.toml)
//!   RUST_LOG     - log filter (default: info)

use std::env;
use std::path::PathBuf;
use std::process;
use surfsup_service::config::{self, DEFAULT_CONFIG_PATH};
use surfsup_service::db;
use surfsup_service::endpoint::ApiServer;
use surfsup_service::queries;

struct Args {
    config_path: PathBuf,
    port: Option<u16>,
    database_url: Option<String>,
}

fn usage(program: &str) -> String {
    format!("Usage: {} [--config PATH] [--port PORT] [--database URL]", program)
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("surfsup_service");

    let mut parsed = Args {
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        port: None,
        database_url: None,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(path)) => parsed.config_path = PathBuf::from(path),
            ("--port", Some(port)) => {
                let port = port
                    .parse()
                    .map_err(|_| format!("Invalid port '{}'\n{}", port, usage(program)))?;
                parsed.port = Some(port);
            }
            ("--database", Some(url)) => parsed.database_url = Some(url.clone()),
            ("--config" | "--port" | "--database", None) => {
                return Err(format!("{} requires a value\n{}", args[i], usage(program)));
            }
            (other, _) => {
                return Err(format!("Unknown argument: {}\n{}", other, usage(program)));
            }
        }
        i += 2;
    }

    Ok(parsed)
}

fn main() {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(2);
    });

    log::info!("SurfsUp Climate API starting");

    let mut service_config = config::load_config(&args.config_path).unwrap_or_else(|e| {
        log::error!("Configuration error: {}", e);
        process::exit(1);
    });
    if let Some(port) = args.port {
        service_config.port = port;
    }
    if let Some(url) = args.database_url {
        service_config.database_url = url;
    }
    log::info!(
        "Database: {}, workers: {}",
        service_config.database_url,
        service_config.worker_threads
    );

    // Validate the data file before accepting requests
    let database = db::connect_and_verify(&service_config).unwrap_or_else(|e| {
        log::error!("Database validation failed:\n\n{}\n", e);
        process::exit(1);
    });

    match database.with_session(queries::fetch_dataset_summary) {
        Ok(summary) => log::info!(
            "Dataset: {} stations, {} measurements ({} to {})",
            summary.station_count,
            summary.measurement_count,
            summary.first_date.as_deref().unwrap_or("n/a"),
            summary.last_date.as_deref().unwrap_or("n/a"),
        ),
        Err(e) => log::warn!("Could not summarize dataset: {}", e),
    }
    match database.with_session(queries::fetch_latest_measurement) {
        Ok(Some(latest)) => log::info!(
            "Latest observation: {} on {} (tobs {}, prcp {:?})",
            latest.station,
            latest.date,
            latest.tobs,
            latest.prcp
        ),
        Ok(None) => log::warn!("Measurement table is empty"),
        Err(e) => log::warn!("Could not read latest observation: {}", e),
    }

    let server = ApiServer::bind(&service_config, database).unwrap_or_else(|e| {
        log::error!("{}", e);
        process::exit(1);
    });

    server.run();
}
