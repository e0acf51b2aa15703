/// Service configuration loader - parses surfsup.toml
///
/// Keeps the data file location, listen address and worker sizing out of
/// the code. Every key is optional; a missing file means all defaults.
/// `DATABASE_URL` from the environment (or `.env`) overrides the file.

use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "surfsup.toml";

/// Default data file, in the driver's URL form.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///Resources/hawaii.sqlite";

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolved service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Data file in `sqlite:///relative` / `sqlite:////absolute` form, or a bare path
    pub database_url: String,

    /// Interface the HTTP server binds to
    pub bind_address: String,

    /// Listen port (0 picks an ephemeral port)
    pub port: u16,

    /// Size of the request worker pool
    pub worker_threads: usize,

    /// Retry policy for opening database sessions
    pub retry: RetryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            worker_threads: 4,
            retry: RetryConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Address string suitable for `tiny_http::Server::http`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Bounded exponential backoff for transient SQLite conditions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts after the first; 0 disables retrying
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 50,
            max_delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based): initial * 2^attempt, capped
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str, path: &Path) -> Result<ServiceConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads configuration from `path`, falling back to defaults when the file
/// does not exist. A file that exists but cannot be read or parsed is an error.
pub fn load_config_from(path: &Path) -> Result<ServiceConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("{} not found, using default configuration", path.display());
            Ok(ServiceConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads configuration and applies environment overrides.
///
/// Reads `.env` if present; `DATABASE_URL` replaces the file's `database_url`.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    dotenv::dotenv().ok();

    let mut config = load_config_from(path)?;
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database_url = url;
    }
    Ok(config)
}
