//! Configuration management for feedrelay.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file (`--config PATH`, or
//!    `~/.config/feedrelay/config.toml` when it exists),
//! 3. environment variables (a `.env` file in the working directory is
//!    loaded first).
//!
//! Credentials, the channel and the feed URL normally come from the
//! environment; message labels and tuning knobs from the file.

pub mod interval;

pub use interval::{format_interval, parse_interval};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_API_TOKEN";
pub const ENV_CHANNEL_ID: &str = "TELEGRAM_CHANNEL_ID";
pub const ENV_API_URL: &str = "TELEGRAM_API_URL";
pub const ENV_FEED_URL: &str = "RSS_FEED_URL";
pub const ENV_SUPPORT_LINK: &str = "SUPPORT_LINK";
/// Older deployments name the support link after the bank jar it points to.
pub const ENV_SUPPORT_LINK_ALIAS: &str = "MONOBANK_LINK";
pub const ENV_POLL_INTERVAL: &str = "POLL_INTERVAL";
pub const ENV_DELIVERY_PAUSE: &str = "DELIVERY_PAUSE";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding delivery records. Defaults to the user data dir.
    pub database_path: Option<PathBuf>,
    pub telegram: TelegramConfig,
    pub feed: FeedConfig,
    pub schedule: ScheduleConfig,
    pub message: MessageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    /// `@channelname` or the numeric `-100…` id
    pub channel_id: Option<String>,
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel_id: None,
            api_url: "https://api.telegram.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: Option<String>,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 10,
            user_agent: concat!("feedrelay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Sleep between poll cycles in seconds (default: 300)
    pub poll_interval_secs: u64,
    /// Pause after every posted item in seconds (default: 3)
    pub delivery_pause_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            delivery_pause_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Used when an item has no title
    pub title_placeholder: String,
    pub link_label: String,
    pub support_label: String,
    /// Optional donation/support link appended to every message footer
    pub support_link: Option<String>,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            title_placeholder: "Без назви".to_string(),
            link_label: "Посилання".to_string(),
            support_label: "Підтримати".to_string(),
            support_link: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, the default file when it
    /// exists, and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/feedrelay/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("feedrelay").join("config.toml"))
    }

    /// Override settings from environment-style variables. Empty values are
    /// treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_BOT_TOKEN) {
            self.telegram.bot_token = Some(token);
        }
        if let Some(channel) = get(ENV_CHANNEL_ID) {
            self.telegram.channel_id = Some(channel);
        }
        if let Some(api_url) = get(ENV_API_URL) {
            self.telegram.api_url = api_url;
        }
        if let Some(url) = get(ENV_FEED_URL) {
            self.feed.url = Some(url);
        }
        if let Some(link) = get(ENV_SUPPORT_LINK).or_else(|| get(ENV_SUPPORT_LINK_ALIAS)) {
            self.message.support_link = Some(link);
        }
        if let Some(value) = get(ENV_POLL_INTERVAL) {
            self.schedule.poll_interval_secs =
                parse_interval(&value).map_err(|reason| ConfigError::InvalidInterval {
                    name: ENV_POLL_INTERVAL,
                    reason,
                })?;
        }
        if let Some(value) = get(ENV_DELIVERY_PAUSE) {
            self.schedule.delivery_pause_secs =
                parse_interval(&value).map_err(|reason| ConfigError::InvalidInterval {
                    name: ENV_DELIVERY_PAUSE,
                    reason,
                })?;
        }
        if let Some(path) = get(ENV_DATABASE_PATH) {
            self.database_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    pub fn bot_token(&self) -> Result<&str, ConfigError> {
        self.telegram
            .bot_token
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_BOT_TOKEN))
    }

    pub fn channel_id(&self) -> Result<&str, ConfigError> {
        self.telegram
            .channel_id
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_CHANNEL_ID))
    }

    pub fn feed_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .feed
            .url
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_FEED_URL))?;

        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
            value: raw.to_string(),
            source: e,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.poll_interval_secs)
    }

    pub fn delivery_pause(&self) -> Duration {
        Duration::from_secs(self.schedule.delivery_pause_secs)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.timeout_secs)
    }

    /// Resolve the database path, creating the default data directory when needed.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        let relay_dir = data_dir.join("feedrelay");
        fs::create_dir_all(&relay_dir).map_err(|e| ConfigError::Io {
            path: relay_dir.clone(),
            source: e,
        })?;
        Ok(relay_dir.join("feedrelay.db"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid {name}: {reason}")]
    InvalidInterval { name: &'static str, reason: String },

    #[error("Invalid feed URL {value}: {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
