//! Bot configuration.
//!
//! Loaded once at startup — from a YAML file or from the environment —
//! and passed by value into the dispatcher and orchestrator. Nothing
//! reads process-wide state after construction.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BotError, Result};
use crate::startup::PollPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Compute instance the bot manages.
    pub instance_id: String,
    /// Bearer token for the push-message API.
    pub line_channel_token: String,
    /// Base URL of the compute control plane.
    pub compute_api_base: String,
    /// Bearer token for the compute control plane.
    #[serde(default)]
    pub compute_api_token: String,
    #[serde(default = "default_push_api_base")]
    pub push_api_base: String,
    /// Path of the embedded subscriber database.
    #[serde(default = "default_subscriber_db")]
    pub subscriber_db: PathBuf,
    /// A text message containing any of these (case-insensitive)
    /// triggers a start.
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_push_api_base() -> String {
    "https://api.line.me".to_string()
}

fn default_subscriber_db() -> PathBuf {
    PathBuf::from("subscribers.redb")
}

fn default_trigger_keywords() -> Vec<String> {
    vec!["start server".to_string(), "start minecraft".to_string()]
}

fn default_poll_attempts() -> u32 {
    20
}

fn default_poll_interval_secs() -> u64 {
    6
}

impl Config {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Build from environment variables. `INSTANCE_ID`,
    /// `LINE_CHANNEL_ACCESS_TOKEN`, and `COMPUTE_API_BASE` are
    /// required; everything else falls back to the serde defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            instance_id: require_env("INSTANCE_ID")?,
            line_channel_token: require_env("LINE_CHANNEL_ACCESS_TOKEN")?,
            compute_api_base: require_env("COMPUTE_API_BASE")?,
            compute_api_token: std::env::var("COMPUTE_API_TOKEN").unwrap_or_default(),
            push_api_base: default_push_api_base(),
            subscriber_db: default_subscriber_db(),
            trigger_keywords: default_trigger_keywords(),
            poll_attempts: default_poll_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
        };

        if let Ok(base) = std::env::var("PUSH_API_BASE") {
            config.push_api_base = base;
        }
        if let Ok(path) = std::env::var("SUBSCRIBER_DB") {
            config.subscriber_db = PathBuf::from(path);
        }
        if let Ok(keywords) = std::env::var("TRIGGER_KEYWORDS") {
            config.trigger_keywords = keywords
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }
        if let Ok(attempts) = std::env::var("POLL_ATTEMPTS") {
            config.poll_attempts = attempts
                .parse()
                .map_err(|_| BotError::Config(format!("bad POLL_ATTEMPTS: {attempts}")))?;
        }
        if let Ok(secs) = std::env::var("POLL_INTERVAL_SECS") {
            config.poll_interval_secs = secs
                .parse()
                .map_err(|_| BotError::Config(format!("bad POLL_INTERVAL_SECS: {secs}")))?;
        }

        Ok(config)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            attempts: self.poll_attempts,
            interval: std::time::Duration::from_secs(self.poll_interval_secs),
        }
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| BotError::Config(format!("{name} is not set")))
}
