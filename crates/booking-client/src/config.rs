//! Client configuration read from the environment.
//!
//! | variable                | default                     |
//! |-------------------------|-----------------------------|
//! | `ROOMBOOK_API_URL`      | `http://localhost:3001/api` |
//! | `ROOMBOOK_TIMEOUT_SECS` | `10`                        |
//! | `ROOMBOOK_TZ`           | `UTC`                       |

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use booking_engine::timestamp::parse_timezone;
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::error::{ApiError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const API_URL_VAR: &str = "ROOMBOOK_API_URL";
pub const TIMEOUT_VAR: &str = "ROOMBOOK_TIMEOUT_SECS";
pub const TIMEZONE_VAR: &str = "ROOMBOOK_TZ";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Timezone in which calendar days and slot hours are evaluated.
    pub timezone: Tz,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            timezone: Tz::UTC,
        }
    }
}

impl ClientConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names. Unset variables fall back
    /// to their defaults; set but unparseable ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            });
        let timeout_secs: u64 = try_load(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS)?;
        let timezone = match lookup(TIMEZONE_VAR) {
            Some(name) => parse_timezone(&name).map_err(|e| {
                warn!("Invalid {TIMEZONE_VAR} value: {e}");
                ApiError::Config(e.to_string())
            })?,
            None => Tz::UTC,
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            timezone,
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ApiError::Config(format!("invalid {key} '{raw}': {e}"))
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
