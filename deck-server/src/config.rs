//! Server settings read from `DECK_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use deck_service::config as defaults;
use deck_service::{DeckError, DeckServiceBuilder, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    /// `None` disables the per-command timeout.
    pub command_timeout: Option<Duration>,
    pub queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_path: defaults::default_db_path(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            command_timeout: Some(defaults::DEFAULT_COMMAND_TIMEOUT),
            queue_capacity: defaults::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Recognised keys: `DECK_BIND_ADDR`, `DECK_DB_PATH`, `DECK_STATIC_DIR`,
    /// `DECK_COMMAND_TIMEOUT_MS` (`0` disables the timeout) and
    /// `DECK_QUEUE_CAPACITY`. Unset or empty keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("DECK_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(path) = get("DECK_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = get("DECK_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get("DECK_COMMAND_TIMEOUT_MS") {
            let ms: u64 = parse_number("DECK_COMMAND_TIMEOUT_MS", &raw)?;
            config.command_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(raw) = get("DECK_QUEUE_CAPACITY") {
            let capacity: usize = parse_number("DECK_QUEUE_CAPACITY", &raw)?;
            if capacity == 0 {
                return Err(DeckError::Config(
                    "DECK_QUEUE_CAPACITY must be at least 1".into(),
                ));
            }
            config.queue_capacity = capacity;
        }

        Ok(config)
    }

    /// A service builder carrying the store settings of this config.
    pub fn service_builder(&self) -> DeckServiceBuilder {
        let builder = deck_service::DeckService::builder()
            .path(&self.db_path)
            .queue_capacity(self.queue_capacity);
        match self.command_timeout {
            Some(timeout) => builder.command_timeout(timeout),
            None => builder.no_timeout(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| DeckError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}
