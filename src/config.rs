//! Bot configuration, loaded once at process start from a JSON file.
//!
//! Every field except the transport credential has a default, so a missing
//! or partial config file still yields a runnable system. A configuration
//! that fails to load is fatal; nothing downstream assumes it succeeded.

use std::{fs::File, io::BufReader, path::Path, time::Duration};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Credential a network transport uses to authenticate with the chat
    /// service. Unused by the built-in console transport. Never logged.
    #[serde(default)]
    pub credential: Option<SecretString>,

    /// Name the bot answers to in `@name` command addressing. When unset,
    /// any addressing suffix is accepted.
    #[serde(default)]
    pub bot_name: Option<String>,

    /// How often a polling transport asks the chat service for new messages.
    #[serde(default = "default_poll_interval", with = "duration_ms")]
    pub poll_interval: Duration,

    /// Capacity of the event bus broadcast channels.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// How long a conversation may take to answer an argument prompt before
    /// the pending interaction lapses.
    #[serde(default = "default_pending_ttl", with = "duration_ms")]
    pub pending_ttl: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            credential: None,
            bot_name: None,
            poll_interval: default_poll_interval(),
            event_buffer_size: default_event_buffer_size(),
            pending_ttl: default_pending_ttl(),
        }
    }
}

impl BotConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_event_buffer_size() -> usize {
    100
}

fn default_pending_ttl() -> Duration {
    Duration::from_secs(300)
}

mod duration_ms {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
