/// One entry of the polled feed, as the source delivered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    /// Unique identifier of the item. Items without one are never processed.
    pub link: Option<String>,
    pub title: Option<String>,
    /// Full-text content when the feed carries it, otherwise the description
    pub content_html: String,
    /// Enclosure image, posted as a photo with the message as caption
    pub image_url: Option<String>,
}

impl FeedItem {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content_html: impl Into<String>) -> Self {
        self.content_html = content_html.into();
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// The link, if present and not blank.
    pub fn link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    pub fn display_title<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(placeholder)
    }
}
