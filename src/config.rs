//! Relay configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_AGENT_TABLE: &str = "data/agent_table.json";
pub const DEFAULT_WEAPON_TABLE: &str = "data/weapon_table.json";
/// One push per frame at roughly 45 FPS.
pub const DEFAULT_PUSH_INTERVAL_MS: u64 = 22;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub agent_table: PathBuf,
    pub weapon_table: PathBuf,
    /// Minimum spacing between pushes to one viewer.
    pub push_interval: Duration,
    /// Shared secret required to publish. `None` leaves publishing open.
    pub publish_token: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            agent_table: PathBuf::from(DEFAULT_AGENT_TABLE),
            weapon_table: PathBuf::from(DEFAULT_WEAPON_TABLE),
            push_interval: Duration::from_millis(DEFAULT_PUSH_INTERVAL_MS),
            publish_token: None,
        }
    }
}

impl RelayConfig {
    /// Build typed relay config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: default `static`
    /// - `AGENT_TABLE`: default `data/agent_table.json`
    /// - `WEAPON_TABLE`: default `data/weapon_table.json`
    /// - `PUSH_INTERVAL_MS`: default 22, must be positive
    /// - `PUBLISH_TOKEN`: unset or empty leaves publishing open
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `PORT` or `PUSH_INTERVAL_MS` do
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let push_ms: u64 = env_parse("PUSH_INTERVAL_MS", DEFAULT_PUSH_INTERVAL_MS)?;
        if push_ms == 0 {
            return Err(ConfigError::Invalid { var: "PUSH_INTERVAL_MS", value: "0".into() });
        }

        Ok(Self {
            port,
            static_dir: env_path("STATIC_DIR", DEFAULT_STATIC_DIR),
            agent_table: env_path("AGENT_TABLE", DEFAULT_AGENT_TABLE),
            weapon_table: env_path("WEAPON_TABLE", DEFAULT_WEAPON_TABLE),
            push_interval: Duration::from_millis(push_ms),
            publish_token: std::env::var("PUBLISH_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var(var).map_or_else(|_| PathBuf::from(default), PathBuf::from)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
