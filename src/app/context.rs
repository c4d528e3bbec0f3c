use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::engine::{EngineSettings, SyncEngine};
use crate::fetcher::HttpFeedSource;
use crate::sink::DeliverySink;
use crate::store::SqliteStore;
use crate::telegram::TelegramClient;

/// Wires configuration to the concrete store, feed source and Telegram
/// client. Only the store is opened eagerly; the other parts are built on
/// demand so commands that do not need them also run with partial settings.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.database_path()?;
        tracing::debug!("Opening database {}", db_path.display());
        let store = Arc::new(SqliteStore::new(&db_path)?);

        Ok(Self { config, store })
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Ok(Self { config, store })
    }

    pub fn feed_source(&self) -> Result<HttpFeedSource> {
        HttpFeedSource::new(
            self.config.feed_url()?,
            self.config.feed_timeout(),
            &self.config.feed.user_agent,
        )
    }

    pub fn telegram(&self) -> Result<TelegramClient> {
        TelegramClient::new(&self.config.telegram.api_url, self.config.bot_token()?)
    }

    /// Build the poll engine on top of the given sink.
    pub fn engine(&self, sink: Arc<dyn DeliverySink + Send + Sync>) -> Result<SyncEngine> {
        let settings = EngineSettings::from_config(&self.config)?;
        let source = Arc::new(self.feed_source()?);

        Ok(SyncEngine::new(source, self.store.clone(), sink, settings))
    }
}
