use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Feed contains no items")]
    EmptyFeed,

    #[error("Telegram API error {code}: {description}")]
    Telegram { code: i64, description: String },

    #[error("Link already recorded: {0}")]
    AlreadyRecorded(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl RelayError {
    /// Duplicate inserts are expected when a link was recorded concurrently
    /// with a pre-check; callers treat them as success.
    pub fn is_benign(&self) -> bool {
        matches!(self, RelayError::AlreadyRecorded(_))
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
