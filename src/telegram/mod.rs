//! Telegram Bot API access over `frankenstein`.
//!
//! Only the calls the relay needs: `getMe`, `sendMessage`, `sendPhoto` and
//! `getUpdates`. Messages are always sent with `parse_mode = HTML`.

pub mod listener;

use async_trait::async_trait;
use frankenstein::{
    AsyncApi, AsyncTelegramApi, ChatId, FileUpload, GetUpdatesParams, LinkPreviewOptions,
    Message, ParseMode, SendMessageParams, SendPhotoParams, Update, User,
};
use url::Url;

use crate::app::{RelayError, Result};
use crate::sink::DeliverySink;

pub use listener::UpdateListener;

impl From<frankenstein::Error> for RelayError {
    fn from(error: frankenstein::Error) -> Self {
        match error {
            frankenstein::Error::Api(response) => RelayError::Telegram {
                code: response.error_code as i64,
                description: response.description,
            },
            other => RelayError::Telegram {
                code: 0,
                description: format!("{:?}", other),
            },
        }
    }
}

/// `@channel` names stay strings, numeric ids go out as integers.
fn chat_id(destination: &str) -> ChatId {
    match destination.trim().parse::<i64>() {
        Ok(id) => ChatId::Integer(id),
        Err(_) => ChatId::String(destination.trim().to_string()),
    }
}

#[derive(Clone)]
pub struct TelegramClient {
    api: AsyncApi,
}

impl TelegramClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let api_url = format!("{}/bot{}", base.as_str().trim_end_matches('/'), token);

        Ok(Self {
            api: AsyncApi::new_url(api_url),
        })
    }

    pub async fn get_me(&self) -> Result<User> {
        Ok(self.api.get_me().await?.result)
    }

    pub async fn send_message(
        &self,
        destination: &str,
        text: &str,
        allow_preview: bool,
    ) -> Result<Message> {
        let preview = LinkPreviewOptions::builder()
            .is_disabled(!allow_preview)
            .build();

        let params = SendMessageParams::builder()
            .chat_id(chat_id(destination))
            .text(text.to_string())
            .parse_mode(ParseMode::Html)
            .link_preview_options(preview)
            .build();

        Ok(self.api.send_message(&params).await?.result)
    }

    pub async fn send_photo(
        &self,
        destination: &str,
        photo_url: &str,
        caption: &str,
    ) -> Result<Message> {
        let params = SendPhotoParams::builder()
            .chat_id(chat_id(destination))
            .photo(FileUpload::String(photo_url.to_string()))
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .build();

        Ok(self.api.send_photo(&params).await?.result)
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u32) -> Result<Vec<Update>> {
        let mut params = GetUpdatesParams::builder().timeout(timeout_secs).build();
        params.offset = offset;

        Ok(self.api.get_updates(&params).await?.result)
    }
}

#[async_trait]
impl DeliverySink for TelegramClient {
    async fn send_text(&self, destination: &str, body: &str, allow_preview: bool) -> Result<()> {
        self.send_message(destination, body, allow_preview).await?;
        Ok(())
    }

    async fn send_image(&self, destination: &str, image_url: &str, caption: &str) -> Result<()> {
        self.send_photo(destination, image_url, caption).await?;
        Ok(())
    }
}
