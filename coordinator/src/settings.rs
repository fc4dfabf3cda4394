use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use common::error::BoxError;
use serde::{Deserialize, Serialize};

pub const METRICS_PATH: &str = "/metrics";

const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:9100";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorSettings {
    pub tick_interval_ms: u64,
    pub metrics_addr: String,
    pub decay_check_interval_secs: u64,
    pub leaderboard_page_ttl_secs: u64,
    pub match_sweep_after_secs: u64,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            metrics_addr: DEFAULT_METRICS_ADDR.into(),
            decay_check_interval_secs: 24 * 3600,
            leaderboard_page_ttl_secs: 30,
            match_sweep_after_secs: 600,
        }
    }
}

impl CoordinatorSettings {
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();
        Ok(Self {
            tick_interval_ms: env_parse("COORDINATOR_TICK_INTERVAL_MS", defaults.tick_interval_ms)?,
            metrics_addr: std::env::var("COORDINATOR_METRICS_ADDR")
                .unwrap_or(defaults.metrics_addr),
            decay_check_interval_secs: env_parse(
                "COORDINATOR_DECAY_CHECK_INTERVAL_SECS",
                defaults.decay_check_interval_secs,
            )?,
            leaderboard_page_ttl_secs: env_parse(
                "COORDINATOR_LEADERBOARD_PAGE_TTL_SECS",
                defaults.leaderboard_page_ttl_secs,
            )?,
            match_sweep_after_secs: env_parse(
                "COORDINATOR_MATCH_SWEEP_AFTER_SECS",
                defaults.match_sweep_after_secs,
            )?,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, BoxError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn into_config(self) -> Result<CoordinatorConfig, BoxError> {
        CoordinatorConfig::from_settings(self)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, BoxError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.parse()?),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub tick_interval: Duration,
    pub metrics_addr: SocketAddr,
    pub decay_check_interval: Duration,
    pub leaderboard_page_ttl: Duration,
    pub match_sweep_after: Duration,
}

impl CoordinatorConfig {
    pub fn from_settings(settings: CoordinatorSettings) -> Result<Self, BoxError> {
        Ok(Self {
            tick_interval: Duration::from_millis(settings.tick_interval_ms),
            metrics_addr: settings.metrics_addr.parse()?,
            decay_check_interval: Duration::from_secs(settings.decay_check_interval_secs),
            leaderboard_page_ttl: Duration::from_secs(settings.leaderboard_page_ttl_secs),
            match_sweep_after: Duration::from_secs(settings.match_sweep_after_secs),
        })
    }

    pub fn from_env() -> Result<Self, BoxError> {
        CoordinatorSettings::from_env().and_then(Self::from_settings)
    }
}
