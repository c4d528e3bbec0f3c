use async_trait::async_trait;

use crate::app::Result;

/// Destination the engine posts rendered messages to.
#[async_trait]
pub trait DeliverySink {
    /// Post an HTML message. `allow_preview` enables the link preview.
    async fn send_text(&self, destination: &str, body: &str, allow_preview: bool) -> Result<()>;

    /// Post a photo by URL with an HTML caption.
    async fn send_image(&self, destination: &str, image_url: &str, caption: &str) -> Result<()>;
}
