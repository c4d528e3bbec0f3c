pub mod http_fetcher;
pub mod parser;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::FeedItem;

pub use http_fetcher::HttpFeedSource;

/// Source of the polled feed.
///
/// Implementations must return items in source order (newest first) and fail
/// on transport errors, non-success statuses and unparsable bodies.
#[async_trait]
pub trait FeedSource {
    async fn fetch(&self) -> Result<Vec<FeedItem>>;
}
