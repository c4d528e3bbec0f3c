use std::time::Duration;

use frankenstein::{Message, Update, UpdateContent};

use crate::app::Result;
use crate::telegram::TelegramClient;

const LONG_POLL_SECS: u32 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Inbound side of the bot: long-polls `getUpdates` and acknowledges
/// everything it receives, logging commands addressed to the bot.
///
/// Runs as its own task next to the poll loop and shares no state with it.
pub struct UpdateListener {
    client: TelegramClient,
    offset: Option<i64>,
    long_poll_secs: u32,
}

impl UpdateListener {
    pub fn new(client: TelegramClient) -> Self {
        Self {
            client,
            offset: None,
            long_poll_secs: LONG_POLL_SECS,
        }
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub async fn run(mut self) {
        tracing::info!("Listening for bot updates");

        loop {
            if let Err(e) = self.poll_once().await {
                tracing::warn!("Failed to fetch bot updates: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }

    /// Fetch one batch of updates and move the offset past the last one.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let updates = self
            .client
            .get_updates(self.offset, self.long_poll_secs)
            .await?;

        for update in &updates {
            handle_update(update);
        }

        if let Some(last) = updates.last() {
            self.offset = Some(i64::from(last.update_id) + 1);
        }

        Ok(updates.len())
    }
}

fn handle_update(update: &Update) {
    match &update.content {
        UpdateContent::Message(message) | UpdateContent::ChannelPost(message) => {
            handle_message(message)
        }
        _ => tracing::debug!("Ignoring update {}", update.update_id),
    }
}

fn handle_message(message: &Message) {
    match command(message.text.as_deref()) {
        Some(command) => tracing::info!("Received {} from chat {}", command, message.chat.id),
        None => tracing::debug!(
            "Ignoring message {} in chat {}",
            message.message_id,
            message.chat.id
        ),
    }
}

/// `/start@relay_bot args` -> `/start`
fn command(text: Option<&str>) -> Option<&str> {
    let first = text?.split_whitespace().next()?;
    if !first.starts_with('/') || first.len() == 1 {
        return None;
    }
    first.split('@').next()
}
