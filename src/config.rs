//! Configuration for the in-memory activities store.

use crate::error::{ActivitiesError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

pub const APP_QUEUE_LENGTH_ENV: &str = "ACTIVITIES_APP_QUEUE_LENGTH";
pub const APP_RECORDING_SECS_ENV: &str = "ACTIVITIES_APP_RECORDING_SECS";

/// Longest default recording window accepted from configuration (one day).
pub const MAX_APP_RECORDING_SECS: u64 = 24 * 60 * 60;

/// Retention settings for captured activities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivitiesConfig {
    /// Number of finished app allocations kept per application.
    pub app_activities_max_queue_length: usize,
    /// How long an application stays traced when no duration is given, at most
    /// [`MAX_APP_RECORDING_SECS`].
    pub app_recording_secs: u64,
}

impl Default for ActivitiesConfig {
    fn default() -> Self {
        Self {
            app_activities_max_queue_length: 100,
            app_recording_secs: 3,
        }
    }
}

impl ActivitiesConfig {
    /// Build a configuration from the environment, loading a `.env` file first if
    /// one is present. Unset or malformed variables fall back to defaults and
    /// out-of-range values are clamped.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_activities_max_queue_length == 0 {
            return Err(ActivitiesError::ConfigError(
                "app_activities_max_queue_length must be positive".to_string(),
            ));
        }
        if self.app_recording_secs > MAX_APP_RECORDING_SECS {
            return Err(ActivitiesError::ConfigError(format!(
                "app_recording_secs must be at most {}",
                MAX_APP_RECORDING_SECS
            )));
        }
        Ok(())
    }

    pub fn app_recording_duration(&self) -> Duration {
        Duration::from_secs(self.app_recording_secs)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            app_activities_max_queue_length: parse_or(
                &lookup,
                APP_QUEUE_LENGTH_ENV,
                defaults.app_activities_max_queue_length,
            )
            .max(1),
            app_recording_secs: parse_or(
                &lookup,
                APP_RECORDING_SECS_ENV,
                defaults.app_recording_secs,
            )
            .min(MAX_APP_RECORDING_SECS),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring malformed {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
