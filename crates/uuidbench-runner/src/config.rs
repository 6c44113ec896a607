//! Configuration management for the benchmark.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! Environment variables take precedence over config file values, which take
//! precedence over defaults.
//!
//! # Example
//!
//! ```yaml
//! benchmark:
//!   total_records: 1000000
//!   batch_size: 5000
//! database:
//!   host: db.internal
//!   password: secret
//! connection:
//!   max_attempts: 60
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use uuidbench_storage::traits::validate_table_name;
use uuidbench_storage::{MySqlConfig, WaitPolicy, DEFAULT_BATCH_SIZE};

/// Prefix for environment overrides, e.g. `UUIDBENCH_BENCHMARK__BATCH_SIZE`.
pub const ENV_PREFIX: &str = "UUIDBENCH";

/// Benchmark configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BenchConfig {
    /// Workload settings
    #[serde(default)]
    pub benchmark: BenchmarkSettings,

    /// Target database
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Readiness polling
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Workload settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BenchmarkSettings {
    /// Number of identifiers to generate and insert
    #[serde(default = "default_total_records")]
    pub total_records: usize,

    /// Rows per write unit
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            total_records: default_total_records(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_total_records() -> usize {
    10_000
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Database endpoint settings.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct DatabaseSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Table dropped and recreated on every run
    #[serde(default = "default_table")]
    pub table: String,
}

// Custom Debug implementation to hide the password
impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("table", &self.table)
            .finish()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let defaults = MySqlConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
            database: defaults.database,
            username: defaults.username,
            password: defaults.password,
            table: defaults.table,
        }
    }
}

fn default_host() -> String {
    DatabaseSettings::default().host
}

fn default_port() -> u16 {
    DatabaseSettings::default().port
}

fn default_database() -> String {
    DatabaseSettings::default().database
}

fn default_username() -> String {
    DatabaseSettings::default().username
}

fn default_password() -> String {
    DatabaseSettings::default().password
}

fn default_table() -> String {
    DatabaseSettings::default().table
}

/// Readiness polling settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ConnectionSettings {
    /// Connection attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_attempt_delay_ms")]
    pub attempt_delay_ms: u64,

    /// Upper bound on a single attempt in seconds
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_delay_ms: default_attempt_delay_ms(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    30
}

fn default_attempt_delay_ms() -> u64 {
    1000
}

fn default_attempt_timeout_secs() -> u64 {
    5
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format
    #[serde(default)]
    pub json: bool,

    /// Emit span enter/exit events
    #[serde(default)]
    pub spans: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            spans: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl BenchConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `UUIDBENCH_` and use `__` as
    /// separator, e.g. `UUIDBENCH_DATABASE__HOST=db` overrides `database.host`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&BenchConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let bench_config: BenchConfig = config.try_deserialize()?;
        bench_config.validate()?;

        Ok(bench_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&BenchConfig::default())?)
            .add_source(env_source())
            .build()?;

        let bench_config: BenchConfig = config.try_deserialize()?;
        bench_config.validate()?;

        Ok(bench_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let batch_size = self.benchmark.batch_size;
        if batch_size == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "benchmark.batch_size must be greater than 0".to_string(),
            });
        }

        if self.connection.max_attempts == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "connection.max_attempts must be greater than 0".to_string(),
            });
        }

        if self.database.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "database.port must be greater than 0".to_string(),
            });
        }

        if self.database.host.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "database.host cannot be empty".to_string(),
            });
        }

        if self.database.database.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "database.database cannot be empty".to_string(),
            });
        }

        if let Err(e) = validate_table_name(&self.database.table) {
            return Err(ConfigLoadError::Invalid {
                message: format!("database.table: {}", e),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// Connection settings for the MySQL store.
    pub fn mysql_config(&self) -> MySqlConfig {
        MySqlConfig {
            host: self.database.host.clone(),
            port: self.database.port,
            database: self.database.database.clone(),
            username: self.database.username.clone(),
            password: self.database.password.clone(),
            table: self.database.table.clone(),
        }
    }

    /// Retry policy for the readiness wait.
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            max_attempts: self.connection.max_attempts,
            attempt_delay: Duration::from_millis(self.connection.attempt_delay_ms),
            attempt_timeout: Duration::from_secs(self.connection.attempt_timeout_secs),
        }
    }
}

/// Use __ as separator for nested keys: UUIDBENCH_DATABASE__PORT -> database.port
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
