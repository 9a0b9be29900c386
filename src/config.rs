use std::env;
use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://event_tracker.db";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Documented bootstrap credential. The account is flagged for rotation on creation.
pub const DEFAULT_ADMIN_PASSWORD: &str = "ChangeMe!2025";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got '{value}'")]
    InvalidPort { name: &'static str, value: String },
    #[error("{name} must be an IANA timezone name, got '{value}'")]
    InvalidTimezone { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Redirect plain-http traffic (as reported by the proxy) to https.
    pub enforce_https: bool,
    /// Zone in which an event's date and time are read as local wall-clock time.
    pub timezone: Tz,
    pub default_admin_username: String,
    pub default_admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_raw = lookup("PORT").unwrap_or_else(|| "8000".to_string());
        let port = port_raw.trim().parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { name: "PORT", value: port_raw.clone() })?;

        let tz_raw = lookup("EVENT_TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let timezone = tz_raw.trim().parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone { name: "EVENT_TIMEZONE", value: tz_raw.clone() })?;

        let production = lookup("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));
        let enforce_https = production || lookup("ENFORCE_HTTPS").is_some_and(|v| parse_flag(&v));

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port,
            enforce_https,
            timezone,
            default_admin_username: lookup("DEFAULT_ADMIN_USERNAME")
                .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
            default_admin_password: lookup("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
