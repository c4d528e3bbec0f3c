//! Feed → channel synchronization.
//!
//! One [`SyncEngine`] lives for the whole process. Each poll cycle fetches the
//! feed, diffs it against the [`DedupStore`] and posts what is new:
//!
//! - the first cycle after start ([`Phase::Bootstrap`]) posts at most the
//!   newest item and marks the whole backlog as seen, so a fresh deployment
//!   does not flood the channel;
//! - every later cycle ([`Phase::Steady`]) posts all unseen items, oldest
//!   first, so bursts land in chronological order.
//!
//! A failed fetch or an empty feed aborts the cycle without touching the
//! store. A failed send leaves the link unrecorded, so it is retried on the
//! next cycle. The fixed poll interval is the only retry mechanism.

use std::sync::Arc;
use std::time::Duration;

use crate::app::{RelayError, Result};
use crate::config::{format_interval, Config, ConfigError, MessageConfig};
use crate::domain::FeedItem;
use crate::fetcher::FeedSource;
use crate::render::{render_caption, render_message, visible_len, CAPTION_LIMIT};
use crate::sink::DeliverySink;
use crate::store::DedupStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Bootstrap,
    Steady,
}

/// What one poll cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Items without a link
    pub skipped: usize,
    /// Items already in the store
    pub known: usize,
    /// Backlog recorded without delivery (bootstrap only)
    pub marked_seen: usize,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Channel the messages go to
    pub destination: String,
    pub message: MessageConfig,
    pub poll_interval: Duration,
    /// Pause after every delivered item, for the sink's rate limit
    pub delivery_pause: Duration,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            destination: config.channel_id()?.to_string(),
            message: config.message.clone(),
            poll_interval: config.poll_interval(),
            delivery_pause: config.delivery_pause(),
        })
    }
}

enum Candidate {
    Delivered,
    Failed,
    Known,
}

pub struct SyncEngine {
    source: Arc<dyn FeedSource + Send + Sync>,
    store: Arc<dyn DedupStore + Send + Sync>,
    sink: Arc<dyn DeliverySink + Send + Sync>,
    settings: EngineSettings,
    phase: Phase,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn FeedSource + Send + Sync>,
        store: Arc<dyn DedupStore + Send + Sync>,
        sink: Arc<dyn DeliverySink + Send + Sync>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            source,
            store,
            sink,
            settings,
            phase: Phase::Bootstrap,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Poll forever, sleeping the poll interval after every cycle.
    pub async fn run(&mut self) {
        tracing::info!(
            "Relaying to {} (poll interval: {}, delivery pause: {})",
            self.settings.destination,
            format_interval(self.settings.poll_interval.as_secs()),
            format_interval(self.settings.delivery_pause.as_secs())
        );

        loop {
            tracing::info!("Checking feed...");

            match self.run_cycle().await {
                Ok(report) => tracing::info!(
                    "Cycle complete: {} fetched, {} delivered, {} failed, {} seen before, {} marked seen, {} without link",
                    report.fetched,
                    report.delivered,
                    report.failed,
                    report.known,
                    report.marked_seen,
                    report.skipped
                ),
                Err(e) => tracing::error!("Cycle aborted: {}", e),
            }

            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    /// Run a single poll cycle. The engine leaves bootstrap afterwards, even
    /// when the cycle failed.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let result = match self.phase {
            Phase::Bootstrap => self.bootstrap_cycle().await,
            Phase::Steady => self.steady_cycle().await,
        };

        self.phase = Phase::Steady;
        result
    }

    async fn fetch(&self) -> Result<Vec<FeedItem>> {
        let items = self.source.fetch().await?;
        if items.is_empty() {
            return Err(RelayError::EmptyFeed);
        }
        Ok(items)
    }

    async fn bootstrap_cycle(&self) -> Result<CycleReport> {
        let items = self.fetch().await?;
        let mut report = CycleReport {
            fetched: items.len(),
            skipped: items.iter().filter(|item| item.link().is_none()).count(),
            ..CycleReport::default()
        };

        if let Some((newest, link)) = items.first().and_then(|i| i.link().map(|l| (i, l))) {
            self.handle_candidate(newest, link, &mut report).await;
        }

        for item in &items {
            let Some(link) = item.link() else {
                continue;
            };

            match self.store.exists(link) {
                Ok(true) => {}
                Ok(false) => {
                    if self.record(link) {
                        report.marked_seen += 1;
                    }
                }
                Err(e) => tracing::error!("Could not check {}: {}", link, e),
            }
        }

        if report.marked_seen > 0 {
            tracing::info!("Marked {} backlog items as seen", report.marked_seen);
        }

        Ok(report)
    }

    async fn steady_cycle(&self) -> Result<CycleReport> {
        let items = self.fetch().await?;
        let mut report = CycleReport {
            fetched: items.len(),
            ..CycleReport::default()
        };

        // The feed lists newest first; post oldest first
        for item in items.iter().rev() {
            let Some(link) = item.link() else {
                tracing::warn!(
                    "Skipping item without link: {}",
                    item.display_title(&self.settings.message.title_placeholder)
                );
                report.skipped += 1;
                continue;
            };

            self.handle_candidate(item, link, &mut report).await;
        }

        Ok(report)
    }

    async fn handle_candidate(&self, item: &FeedItem, link: &str, report: &mut CycleReport) {
        match self.process(item, link).await {
            Candidate::Delivered => report.delivered += 1,
            Candidate::Failed => report.failed += 1,
            Candidate::Known => report.known += 1,
        }
    }

    async fn process(&self, item: &FeedItem, link: &str) -> Candidate {
        match self.store.exists(link) {
            Ok(true) => return Candidate::Known,
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Could not check {}, deferring: {}", link, e);
                return Candidate::Failed;
            }
        }

        if let Err(e) = self.deliver(item, link).await {
            tracing::error!("Error sending post {}: {}", link, e);
            return Candidate::Failed;
        }

        self.record(link);

        if !self.settings.delivery_pause.is_zero() {
            tokio::time::sleep(self.settings.delivery_pause).await;
        }

        Candidate::Delivered
    }

    async fn deliver(&self, item: &FeedItem, link: &str) -> Result<()> {
        let destination = &self.settings.destination;
        let message_config = &self.settings.message;

        let caption = item
            .image_url
            .as_deref()
            .map(|image_url| (image_url, render_caption(item, link, message_config)));

        match caption {
            Some((image_url, caption)) if visible_len(&caption) <= CAPTION_LIMIT => {
                self.sink.send_image(destination, image_url, &caption).await?;
            }
            Some(_) => {
                tracing::warn!(
                    "Caption for {} cannot fit {} characters, posting as text",
                    link,
                    CAPTION_LIMIT
                );
                let message = render_message(item, link, message_config);
                self.sink.send_text(destination, &message, true).await?;
            }
            None => {
                let message = render_message(item, link, message_config);
                self.sink.send_text(destination, &message, true).await?;
            }
        }

        tracing::info!(
            "Posted: {}",
            item.display_title(&self.settings.message.title_placeholder)
        );
        Ok(())
    }

    /// Write a record for `link`. Returns false when the store failed.
    fn record(&self, link: &str) -> bool {
        match self.store.add(link) {
            Ok(()) => true,
            Err(e) if e.is_benign() => {
                tracing::warn!("{}", e);
                true
            }
            Err(e) => {
                tracing::error!("Failed to record {}: {}", link, e);
                false
            }
        }
    }
}
