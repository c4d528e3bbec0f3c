use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::Result;
use crate::domain::FeedItem;
use crate::fetcher::parser::parse_feed;
use crate::fetcher::FeedSource;

pub struct HttpFeedSource {
    client: Client,
    url: Url,
}

impl HttpFeedSource {
    pub fn new(url: Url, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Vec<FeedItem>> {
        let response = self.client.get(self.url.clone()).send().await?;
        response.error_for_status_ref()?;

        let body = response.bytes().await?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), self.url);

        parse_feed(&body)
    }
}
