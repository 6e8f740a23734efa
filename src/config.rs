use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

use crate::service::automation::earnings::RefreshSchedule;

pub const DEFAULT_API_URL: &str = "https://financialmodelingprep.com/api/v3/earning_calendar";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("unknown timezone {0:?}")]
    InvalidTimezone(String),
    #[error("invalid refresh schedule {0:?}; expected \"HH:MM\" or \"<minute> <hour> * * *\"")]
    InvalidSchedule(String),
}

/// Service configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub port: u16,
    pub api_key: String,
    pub api_url: String,
    pub cache_path: PathBuf,
    pub refresh_schedule: RefreshSchedule,
    pub refresh_enabled: bool,
    /// Zone that decides what "today" is for fetch windows and headers.
    pub timezone: Tz,
    pub fetch_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let api_key = get("EARNINGS_API_KEY").ok_or(ConfigError::Missing("EARNINGS_API_KEY"))?;

        let port = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value: v,
            })?,
            None => 3000,
        };

        let fetch_timeout_secs: u64 = match get("EARNINGS_FETCH_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "EARNINGS_FETCH_TIMEOUT_SECS",
                value: v,
            })?,
            None => 30,
        };

        let timezone = match get("EARNINGS_TIMEZONE") {
            Some(v) => v.parse::<Tz>().map_err(|_| ConfigError::InvalidTimezone(v))?,
            None => Tz::UTC,
        };

        let refresh_schedule = get("EARNINGS_REFRESH_SCHEDULE")
            .unwrap_or_else(|| "0 6 * * *".to_string())
            .parse()?;

        let refresh_enabled = get("ENABLE_EARNINGS_REFRESH")
            .map(|v| v != "0")
            .unwrap_or(true);

        Ok(Self {
            bind: get("EARNINGS_BIND").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            api_key,
            api_url: get("EARNINGS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            cache_path: PathBuf::from(
                get("EARNINGS_CACHE_PATH").unwrap_or_else(|| "earnings_cache.json".to_string()),
            ),
            refresh_schedule,
            refresh_enabled,
            timezone,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }

    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
