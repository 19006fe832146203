//! Configuration module
//!
//! Environment-based configuration shared by the booking services and the
//! reminder dispatch worker.

use std::env;

use chrono_tz::Tz;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const REMINDER_POLL_INTERVAL_SECS: u64 = 120;
const DEFAULT_TIMEZONE: &str = "Asia/Tashkent";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// IANA timezone used for organizations created without an explicit one.
    pub default_timezone: String,
    /// Interval between reminder dispatch passes.
    pub reminder_poll_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            default_timezone: env::var("DEFAULT_TIMEZONE")
                .unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string()),
            reminder_poll_interval_secs: env::var("REMINDER_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| REMINDER_POLL_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(REMINDER_POLL_INTERVAL_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.default_timezone.parse::<Tz>().map_err(|_| {
            anyhow::anyhow!(
                "DEFAULT_TIMEZONE is not a valid IANA timezone: {}",
                self.default_timezone
            )
        })?;
        if self.reminder_poll_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "REMINDER_POLL_INTERVAL_SECS must be greater than zero"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/reserva".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            reminder_poll_interval_secs: REMINDER_POLL_INTERVAL_SECS,
        }
    }

    #[test]
    fn test_default_timezone_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_bogus_timezone() {
        let mut config = base_config();
        config.default_timezone = "Mars/Olympus_Mons".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let mut config = base_config();
        config.reminder_poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
