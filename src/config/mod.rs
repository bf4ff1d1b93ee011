//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::retention::MAX_SWEEP_INTERVAL;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable overriding [`OrdersConfig::cache_ttl_secs`]
pub const ENV_CACHE_TTL: &str = "CACHE_TTL";
/// Environment variable overriding [`OrdersConfig::retention_days`]
pub const ENV_RETENTION_DAYS: &str = "ORDERS_RETENTION_DAYS";
/// Environment variable overriding [`OrdersConfig::sweep_interval_secs`]
pub const ENV_SWEEP_INTERVAL_SECS: &str = "ORDERS_SWEEP_INTERVAL_SECS";
/// Environment variable overriding [`OrdersConfig::database_url`]
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Largest accepted [`OrdersConfig::cache_ttl_secs`] (one day)
pub const MAX_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
/// Largest accepted [`OrdersConfig::retention_days`] (about a century)
pub const MAX_RETENTION_DAYS: u32 = 36_500;
/// Largest accepted [`OrdersConfig::sweep_interval_secs`]
pub const MAX_SWEEP_INTERVAL_SECS: u64 = MAX_SWEEP_INTERVAL.as_secs();

/// Runtime settings of the order service
///
/// Every field has a default, so an empty YAML document is a valid config.
///
/// ```yaml
/// cache_ttl_secs: 30
/// retention_days: 7
/// sweep_interval_secs: 86400
/// database_url: postgres://orders@localhost/orders
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// Lifetime of the cached active-orders list, in seconds
    pub cache_ttl_secs: u64,

    /// Orders created more than this many days ago are swept
    pub retention_days: u32,

    /// Time between two retention sweeps, in seconds
    pub sweep_interval_secs: u64,

    /// PostgreSQL connection string, used when the `postgres` feature is on
    pub database_url: Option<String>,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 30,
            retention_days: 7,
            sweep_interval_secs: 24 * 60 * 60,
            database_url: None,
        }
    }
}

impl OrdersConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Unset keys leave the current value untouched. Empty values are
    /// treated as unset.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get(ENV_CACHE_TTL) {
            self.cache_ttl_secs = parse_override(ENV_CACHE_TTL, &value)?;
        }
        if let Some(value) = get(ENV_RETENTION_DAYS) {
            self.retention_days = parse_override(ENV_RETENTION_DAYS, &value)?;
        }
        if let Some(value) = get(ENV_SWEEP_INTERVAL_SECS) {
            self.sweep_interval_secs = parse_override(ENV_SWEEP_INTERVAL_SECS, &value)?;
        }
        if let Some(value) = get(ENV_DATABASE_URL) {
            self.database_url = Some(value);
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("cache_ttl_secs", self.cache_ttl_secs, MAX_CACHE_TTL_SECS)?;
        check_range(
            "retention_days",
            u64::from(self.retention_days),
            u64::from(MAX_RETENTION_DAYS),
        )?;
        check_range(
            "sweep_interval_secs",
            self.sweep_interval_secs,
            MAX_SWEEP_INTERVAL_SECS,
        )?;
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.retention_days) * 24 * 60 * 60)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}

fn check_range(field: &str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(field, "0", "must be greater than 0"));
    }
    if value > max {
        return Err(invalid(
            field,
            &value.to_string(),
            &format!("must be at most {}", max),
        ));
    }
    Ok(())
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
