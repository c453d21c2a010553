//! # Registry Configuration
//!
//! Tunables for the supervisor and the actors it spawns. Defaults match production
//! behavior (24 hour idle timeout); tests shorten the timeout with
//! [`RegistryConfig::with_idle_timeout`].
//!
//! [`RegistryConfig::load`] reads an optional TOML file named by `ACCOUNT_CONFIG_FILE`,
//! then applies `ACCOUNT_*` overrides. Every key in the file is optional:
//!
//! ```toml
//! mailbox_capacity = 64
//! idle_timeout_secs = 3600
//!
//! [populate]
//! max_attempts = 5
//! initial_backoff_ms = 100
//! max_backoff_ms = 5000
//! ```

use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;
use tracing::info;

const ENV_CONFIG_FILE: &str = "ACCOUNT_CONFIG_FILE";
const ENV_IDLE_TIMEOUT_SECS: &str = "ACCOUNT_IDLE_TIMEOUT_SECS";
const ENV_MAILBOX_CAPACITY: &str = "ACCOUNT_MAILBOX_CAPACITY";
const ENV_POPULATE_ATTEMPTS: &str = "ACCOUNT_POPULATE_ATTEMPTS";

/// Errors raised while reading configuration from a file or the environment.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Failed to read configuration file {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("Invalid configuration: {0}")]
    Parse(String),
}

/// Retry policy for the population step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PopulatePolicy {
    /// Total number of attempts, including the first one. `0` is treated as `1`.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each further attempt.
    #[serde(rename = "initial_backoff_ms", deserialize_with = "millis")]
    pub initial_backoff: Duration,
    /// Upper bound for the delay between attempts.
    #[serde(rename = "max_backoff_ms", deserialize_with = "millis")]
    pub max_backoff: Duration,
}

impl Default for PopulatePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl PopulatePolicy {
    /// Delay to wait after the failed attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Configuration shared by the supervisor and every actor it spawns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Capacity of each actor's mailbox. Senders wait when it is full.
    pub mailbox_capacity: usize,
    /// Inactivity period after which an actor terminates itself.
    #[serde(rename = "idle_timeout_secs", deserialize_with = "secs")]
    pub idle_timeout: Duration,
    pub populate: PopulatePolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 32,
            idle_timeout: Duration::from_secs(24 * 60 * 60),
            populate: PopulatePolicy::default(),
        }
    }
}

impl RegistryConfig {
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_mailbox_capacity(mut self, mailbox_capacity: usize) -> Self {
        self.mailbox_capacity = mailbox_capacity.max(1);
        self
    }

    pub fn with_populate_policy(mut self, populate: PopulatePolicy) -> Self {
        self.populate = populate;
        self
    }

    /// Defaults overlaid with `ACCOUNT_*` environment variables.
    ///
    /// - `ACCOUNT_IDLE_TIMEOUT_SECS` - idle timeout in whole seconds
    /// - `ACCOUNT_MAILBOX_CAPACITY` - per-actor mailbox size
    /// - `ACCOUNT_POPULATE_ATTEMPTS` - population attempts before degrading
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(env_var)
    }

    /// The file named by `ACCOUNT_CONFIG_FILE` (defaults if unset), overlaid with the
    /// `ACCOUNT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match env_var(ENV_CONFIG_FILE) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.overlay(env_var)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "Loaded registry configuration");
        Ok(config)
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let capacity = config.mailbox_capacity;
        Ok(config.with_mailbox_capacity(capacity))
    }

    fn overlay(mut self, lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_IDLE_TIMEOUT_SECS)? {
            self.idle_timeout = Duration::from_secs(secs);
        }
        if let Some(capacity) = parse_var::<usize>(&lookup, ENV_MAILBOX_CAPACITY)? {
            self = self.with_mailbox_capacity(capacity);
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, ENV_POPULATE_ATTEMPTS)? {
            self.populate.max_attempts = attempts;
        }
        Ok(self)
    }
}

fn env_var(var: &'static str) -> Option<String> {
    std::env::var(var).ok()
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

fn secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
