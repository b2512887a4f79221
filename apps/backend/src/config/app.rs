//! Process configuration loaded from environment variables.
//!
//! Every variable is optional. Present-but-invalid values are errors rather
//! than silently falling back to the default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::RuleSet;
use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5232;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub rules: RuleSet,
    /// Tell the sender why a move or declaration was refused.
    pub report_rejections: bool,
    pub heartbeat_interval: Duration,
    /// Silence after which a connection is treated as gone.
    pub client_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            rules: RuleSet::default(),
            report_rejections: true,
            heartbeat_interval: Duration::from_secs(20),
            client_timeout: Duration::from_secs(40),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key/value source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("CHECKERS_HOST").unwrap_or(defaults.host);
        let port = parse_or(get("CHECKERS_PORT"), "CHECKERS_PORT", defaults.port)?;

        let cors_allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => defaults.cors_allowed_origins,
        };

        let forced_capture = parse_bool_or(
            get("CHECKERS_FORCED_CAPTURE"),
            "CHECKERS_FORCED_CAPTURE",
            defaults.rules.forced_capture,
        )?;
        let report_rejections = parse_bool_or(
            get("CHECKERS_REPORT_REJECTIONS"),
            "CHECKERS_REPORT_REJECTIONS",
            defaults.report_rejections,
        )?;

        let heartbeat_interval = secs_or(
            get("CHECKERS_HEARTBEAT_SECS"),
            "CHECKERS_HEARTBEAT_SECS",
            defaults.heartbeat_interval,
        )?;
        let client_timeout = secs_or(
            get("CHECKERS_CLIENT_TIMEOUT_SECS"),
            "CHECKERS_CLIENT_TIMEOUT_SECS",
            defaults.client_timeout,
        )?;
        let shutdown_timeout = secs_or(
            get("CHECKERS_SHUTDOWN_TIMEOUT_SECS"),
            "CHECKERS_SHUTDOWN_TIMEOUT_SECS",
            defaults.shutdown_timeout,
        )?;

        if heartbeat_interval.is_zero() {
            return Err(AppError::config(
                "CHECKERS_HEARTBEAT_SECS must be greater than zero".to_string(),
            ));
        }
        if client_timeout <= heartbeat_interval {
            return Err(AppError::config(format!(
                "CHECKERS_CLIENT_TIMEOUT_SECS ({}) must exceed CHECKERS_HEARTBEAT_SECS ({})",
                client_timeout.as_secs(),
                heartbeat_interval.as_secs()
            )));
        }

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            rules: RuleSet { forced_capture },
            report_rejections,
            heartbeat_interval,
            client_timeout,
            shutdown_timeout,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key}={value:?}: {e}"))),
    }
}

fn parse_bool_or(raw: Option<String>, key: &str, default: bool) -> Result<bool, AppError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::config(format!(
            "Invalid {key}={value:?}: expected true or false"
        ))),
    }
}

fn secs_or(raw: Option<String>, key: &str, default: Duration) -> Result<Duration, AppError> {
    parse_or::<u64>(raw, key, default.as_secs()).map(Duration::from_secs)
}

/// Comma-separated origins. Empty entries, `null`, and anything that is not
/// http(s) are dropped; if nothing survives the default origin is used.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![DEFAULT_CORS_ORIGIN.to_string()]
    } else {
        origins
    }
}
