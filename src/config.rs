use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MatrixError;

pub const DEFAULT_CONFIG_PATH: &str = "todo-matrix.toml";

/// Longest accepted reconciliation interval (one week).
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Upper bound on waiting for a SQLite lock.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

/// Reconciliation triggers. The daily time is in the host's local timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub daily_enabled: bool,
    #[serde(default = "default_daily_hour")]
    pub daily_hour: u32,
    #[serde(default)]
    pub daily_minute: u32,
    #[serde(default = "default_true")]
    pub interval_enabled: bool,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_enabled: true,
            daily_hour: default_daily_hour(),
            daily_minute: 0,
            interval_enabled: true,
            interval_minutes: default_interval_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// --- Default value functions ---

fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_db_path() -> String {
    "todo-matrix.db".to_string()
}
fn default_busy_timeout() -> u64 {
    5000
}
fn default_daily_hour() -> u32 {
    9
}
fn default_interval_minutes() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn validate(&self) -> Result<(), MatrixError> {
        let s = &self.scheduler;
        if s.daily_hour > 23 {
            return Err(MatrixError::config(format!(
                "scheduler.daily_hour must be 0-23, got {}",
                s.daily_hour
            )));
        }
        if s.daily_minute > 59 {
            return Err(MatrixError::config(format!(
                "scheduler.daily_minute must be 0-59, got {}",
                s.daily_minute
            )));
        }
        if s.interval_minutes == 0 || s.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(MatrixError::config(format!(
                "scheduler.interval_minutes must be between 1 and {MAX_INTERVAL_MINUTES}, got {}",
                s.interval_minutes
            )));
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(MatrixError::config(
                "database.busy_timeout_ms must be greater than 0",
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(MatrixError::config("database.path must not be empty"));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file, falling back to defaults if missing.
pub fn load(path: &str) -> Result<Config, MatrixError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::debug!("config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| MatrixError::config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| MatrixError::config(format!("failed to parse config: {}", e)))?;
    config.validate()?;

    Ok(config)
}
