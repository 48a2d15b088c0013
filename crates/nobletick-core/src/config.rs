//! Environment-driven service configuration.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub refresh_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        }
    }
}

impl Config {
    /// Read `PORT` and `SCRAPE_INTERVAL_SECONDS`, falling back to defaults
    /// for absent or unparsable values. Never panics at startup.
    pub fn from_env() -> Self {
        Self {
            port: parsed_or("PORT", std::env::var("PORT").ok(), DEFAULT_PORT),
            refresh_interval: Duration::from_secs(parsed_or(
                "SCRAPE_INTERVAL_SECONDS",
                std::env::var("SCRAPE_INTERVAL_SECONDS").ok(),
                DEFAULT_REFRESH_INTERVAL_SECS,
            )),
        }
    }
}

fn parsed_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(name, raw = %value, "unparsable configuration value, using default");
            default
        }),
        None => default,
    }
}
