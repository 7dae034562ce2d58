// config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{AppError, Result};

const GOALSERVE_FEED_BASE: &str = "http://www.goalserve.com/getfeed";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed_url: String,
    pub database_url: String,
    pub database_name: String,
    pub redis_url: String,
    pub poll_interval: Duration,
    pub live_cache_key: String,
    pub live_cache_ttl_secs: u64,
    pub over_log_retention_days: u32,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let feed_url = match env::var("FEED_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                let token = required("GOALSERVE_TOKEN")?;
                format!("{}/{}/cricket/livescore?json=1", GOALSERVE_FEED_BASE, token)
            }
        };

        Ok(AppConfig {
            feed_url,
            database_url: required("DATABASE_URL")?,
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "cricket".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            poll_interval: Duration::from_secs(parsed("POLL_INTERVAL_SECS", 5)?),
            live_cache_key: env::var("LIVE_CACHE_KEY")
                .unwrap_or_else(|_| "goalServeLive".to_string()),
            live_cache_ttl_secs: parsed("LIVE_CACHE_TTL_SECS", 60 * 60)?,
            over_log_retention_days: positive("OVER_LOG_RETENTION_DAYS", 30)?,
            port: parsed("PORT", 4040)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        })
    }

    /// Feed URL with the access token masked, safe to log.
    pub fn redacted_feed_url(&self) -> String {
        match self.feed_url.strip_prefix(GOALSERVE_FEED_BASE) {
            Some(rest) => {
                let tail = rest.trim_start_matches('/').split_once('/').map(|(_, t)| t);
                format!("{}/***/{}", GOALSERVE_FEED_BASE, tail.unwrap_or_default())
            }
            None => self.feed_url.clone(),
        }
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::configuration(format!("{} must be set", key)))
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}

/// Like [`parsed`] but zero is refused as well.
fn positive(key: &str, default: u32) -> Result<u32> {
    match parsed(key, default)? {
        0 => Err(AppError::configuration(format!("{} must be at least 1", key))),
        value => Ok(value),
    }
}
