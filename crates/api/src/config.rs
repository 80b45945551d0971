use std::str::FromStr;

use chrono::Duration;

/// Longest TTL any store accepts: one year.
pub const MAX_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks during shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum request body size. Result payloads carry images (default: 50 MB).
    pub body_limit_bytes: usize,
    /// Progress record horizon from last write (default: 30 minutes).
    pub progress_ttl_secs: i64,
    /// Hand-off result store TTL (default: 24 hours).
    pub handoff_ttl_secs: i64,
    /// Share-link result store TTL (default: 7 days).
    pub share_ttl_secs: i64,
    /// Interval between background sweeps (default: 1 hour).
    pub sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                     |
    /// | `BODY_LIMIT_BYTES`      | `52428800`               |
    /// | `PROGRESS_TTL_SECS`     | `1800`                   |
    /// | `HANDOFF_TTL_SECS`      | `86400`                  |
    /// | `SHARE_TTL_SECS`        | `604800`                 |
    /// | `SWEEP_INTERVAL_SECS`   | `3600`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let cors_origins = match std::env::var("CORS_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => defaults.cors_origins,
        };

        let config = Self {
            host,
            port: env_or("PORT", "u16", defaults.port)?,
            cors_origins,
            request_timeout_secs: env_or(
                "REQUEST_TIMEOUT_SECS",
                "u64",
                defaults.request_timeout_secs,
            )?,
            shutdown_timeout_secs: env_or(
                "SHUTDOWN_TIMEOUT_SECS",
                "u64",
                defaults.shutdown_timeout_secs,
            )?,
            body_limit_bytes: env_or("BODY_LIMIT_BYTES", "usize", defaults.body_limit_bytes)?,
            progress_ttl_secs: env_or("PROGRESS_TTL_SECS", "i64", defaults.progress_ttl_secs)?,
            handoff_ttl_secs: env_or("HANDOFF_TTL_SECS", "i64", defaults.handoff_ttl_secs)?,
            share_ttl_secs: env_or("SHARE_TTL_SECS", "i64", defaults.share_ttl_secs)?,
            sweep_interval_secs: env_or(
                "SWEEP_INTERVAL_SECS",
                "u64",
                defaults.sweep_interval_secs,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used: a zero sweep interval
    /// and TTLs outside `1..=MAX_TTL_SECS`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("PROGRESS_TTL_SECS", self.progress_ttl_secs, 1, MAX_TTL_SECS)?;
        check_range("HANDOFF_TTL_SECS", self.handoff_ttl_secs, 1, MAX_TTL_SECS)?;
        check_range("SHARE_TTL_SECS", self.share_ttl_secs, 1, MAX_TTL_SECS)?;
        check_range(
            "SWEEP_INTERVAL_SECS",
            i64::try_from(self.sweep_interval_secs).unwrap_or(i64::MAX),
            1,
            MAX_TTL_SECS,
        )?;
        Ok(())
    }

    pub fn progress_ttl(&self) -> Duration {
        Duration::seconds(self.progress_ttl_secs)
    }

    pub fn handoff_ttl(&self) -> Duration {
        Duration::seconds(self.handoff_ttl_secs)
    }

    pub fn share_ttl(&self) -> Duration {
        Duration::seconds(self.share_ttl_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:3000".into()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
            body_limit_bytes: 50 * 1024 * 1024,
            progress_ttl_secs: betterme_store::repositories::progress_store::DEFAULT_PROGRESS_TTL_SECS,
            handoff_ttl_secs: betterme_store::repositories::result_store::HANDOFF_TTL_SECS,
            share_ttl_secs: betterme_store::repositories::result_store::SHARE_TTL_SECS,
            sweep_interval_secs: 3600,
        }
    }
}

/// Read `key` from the environment, falling back to `default` when unset.
fn env_or<T: FromStr>(key: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => parse_value(key, expected, &value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, expected: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        expected,
        value: value.to_string(),
    })
}

fn check_range(key: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            min,
            max,
            value,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
