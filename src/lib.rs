//! # feedrelay
//!
//! Polls one RSS/Atom feed and posts every new item to a Telegram channel.
//!
//! ## Architecture
//!
//! ```text
//! FeedSource → SyncEngine → render → DeliverySink
//!                  ↕
//!              DedupStore
//! ```
//!
//! The first cycle after start posts only the newest item and marks the rest
//! of the feed as seen. Later cycles post every unseen item, oldest first.
//!
//! ## Quick Start
//!
//! ```bash
//! export TELEGRAM_BOT_API_TOKEN=123:abc
//! export TELEGRAM_CHANNEL_ID=@my_channel
//! export RSS_FEED_URL=https://blog.rust-lang.org/feed.xml
//!
//! # Preview what would be posted
//! feedrelay check
//!
//! # Relay until interrupted
//! feedrelay run
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires the configuration to the
/// store, the feed source and the Telegram client.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` - Poll and post until interrupted (default)
/// - `check` - Fetch once and list new items without posting
/// - `status` - Show recorded links
pub mod cli;

/// Configuration from `~/.config/feedrelay/config.toml` and the environment.
pub mod config;

/// Core domain models.
///
/// - [`FeedItem`](domain::FeedItem): One entry of the polled feed
/// - [`DeliveryRecord`](domain::DeliveryRecord): A link known to the store
pub mod domain;

/// Poll cycle with bootstrap and steady-state policies.
pub mod engine;

/// Feed fetching.
///
/// - [`FeedSource`](fetcher::FeedSource): Async trait for feed sources
/// - [`HttpFeedSource`](fetcher::HttpFeedSource): reqwest + feed-rs implementation
pub mod fetcher;

/// HTML to plain text conversion for message bodies.
pub mod normalizer;

/// Telegram HTML message composition.
pub mod render;

/// Outbound delivery trait.
pub mod sink;

/// SQLite persistence of delivered links.
///
/// - [`DedupStore`](store::DedupStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Telegram Bot API client and update listener.
pub mod telegram;
