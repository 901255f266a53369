//! Runtime configuration for the peer-review core.
//!
//! # Responsibility
//! - Hold the knobs the core needs at startup: database path, session
//!   lifetime, prune interval, logging and the eligibility duplicate policy.
//! - Read overrides from `PEERREVIEW_*` environment variables.
//!
//! # Invariants
//! - Durations are strictly positive.
//! - Invalid values are rejected, never silently replaced by defaults.

use crate::logging::{default_log_level, normalize_level};
use crate::service::auth_service::DEFAULT_SESSION_TTL;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_SQLITE_PATH: &str = "PEERREVIEW_SQLITE_PATH";
pub const ENV_SESSION_TTL_SECS: &str = "PEERREVIEW_SESSION_TTL_SECS";
pub const ENV_PRUNE_INTERVAL_SECS: &str = "PEERREVIEW_PRUNE_INTERVAL_SECS";
pub const ENV_LOG_LEVEL: &str = "PEERREVIEW_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PEERREVIEW_LOG_DIR";
pub const ENV_ALLOW_DUPLICATE_ELIGIBILITY: &str = "PEERREVIEW_ALLOW_DUPLICATE_ELIGIBILITY";

const DEFAULT_SQLITE_PATH: &str = "peerreview.db";
const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value `{}`: {}", self.key, self.value, self.reason)
    }
}

impl Error for ConfigError {}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub sqlite_path: PathBuf,
    pub session_ttl: Duration,
    pub prune_interval: Duration,
    pub log_level: &'static str,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
    pub allow_duplicate_eligibility: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            session_ttl: DEFAULT_SESSION_TTL,
            prune_interval: DEFAULT_PRUNE_INTERVAL,
            log_level: default_log_level(),
            log_dir: None,
            allow_duplicate_eligibility: true,
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns per variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());

        if let Some(path) = value(ENV_SQLITE_PATH) {
            config.sqlite_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = value(ENV_SESSION_TTL_SECS) {
            config.session_ttl = parse_secs(ENV_SESSION_TTL_SECS, &raw)?;
        }
        if let Some(raw) = value(ENV_PRUNE_INTERVAL_SECS) {
            config.prune_interval = parse_secs(ENV_PRUNE_INTERVAL_SECS, &raw)?;
        }
        if let Some(raw) = value(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&raw).map_err(|_| ConfigError {
                key: ENV_LOG_LEVEL,
                value: raw.clone(),
                reason: "expected trace|debug|info|warn|error",
            })?;
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(raw) = value(ENV_ALLOW_DUPLICATE_ELIGIBILITY) {
            config.allow_duplicate_eligibility = parse_bool(ENV_ALLOW_DUPLICATE_ELIGIBILITY, &raw)?;
        }

        Ok(config)
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError {
            key,
            value: raw.to_string(),
            reason: "must be greater than zero",
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ConfigError {
            key,
            value: raw.to_string(),
            reason: "expected a whole number of seconds",
        }),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value: raw.to_string(),
            reason: "expected true or false",
        }),
    }
}
