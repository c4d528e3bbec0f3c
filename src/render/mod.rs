//! Telegram HTML message composition.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::MessageConfig;
use crate::domain::FeedItem;
use crate::normalizer::normalize;

/// Characters of escaped body text kept in a message.
pub const BODY_LIMIT: usize = 900;
pub const ELLIPSIS: &str = "...";

/// Telegram caption limit for photos.
pub const CAPTION_LIMIT: usize = 1024;
/// Telegram limit for plain messages.
pub const MESSAGE_LIMIT: usize = 4096;

/// Render the message for `item`:
///
/// ```text
/// <b>Title</b>
///
/// body text (at most 900 characters, then "...")
///
/// <a href="link">Посилання</a> | <a href="support">Підтримати</a>
/// ```
///
/// Title and body are escaped so `<`, `>` and `&` from the feed never turn
/// into markup. The support link is only appended when configured.
pub fn render_message(item: &FeedItem, link: &str, config: &MessageConfig) -> String {
    compose(item, link, config, BODY_LIMIT)
}

/// Render the message as a photo caption. The body budget shrinks until the
/// caption fits [`CAPTION_LIMIT`]; a title and footer too long on their own
/// still come back oversized, so callers must check [`visible_len`].
pub fn render_caption(item: &FeedItem, link: &str, config: &MessageConfig) -> String {
    let mut body_limit = BODY_LIMIT;

    loop {
        let caption = compose(item, link, config, body_limit);
        let overflow = visible_len(&caption).saturating_sub(CAPTION_LIMIT);

        if overflow == 0 || body_limit == 0 {
            return caption;
        }

        body_limit = body_limit.saturating_sub(overflow);
    }
}

fn compose(item: &FeedItem, link: &str, config: &MessageConfig, body_limit: usize) -> String {
    let title = encode_text(item.display_title(&config.title_placeholder));
    let text = encode_text(&normalize(&item.content_html)).into_owned();

    let mut message = format!("<b>{}</b>\n\n", title);
    message.push_str(&truncate_escaped(&text, body_limit));
    message.push_str(&format!(
        "\n\n<a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(link),
        encode_text(&config.link_label)
    ));

    if let Some(support) = config.support_link.as_deref().filter(|s| !s.is_empty()) {
        message.push_str(&format!(
            " | <a href=\"{}\">{}</a>",
            encode_double_quoted_attribute(support),
            encode_text(&config.support_label)
        ));
    }

    message
}

/// Keep the first `limit` characters of already escaped text and mark the cut.
///
/// A cut that would split an entity such as `&amp;` moves back to the `&`.
fn truncate_escaped(text: &str, limit: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(limit) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let head = match head.rfind('&') {
        Some(amp) if !head[amp..].contains(';') => &head[..amp],
        _ => head,
    };

    format!("{}{}", head, ELLIPSIS)
}

/// Number of characters Telegram counts after parsing the HTML entities.
pub fn visible_len(message: &str) -> usize {
    let mut count = 0;
    let mut in_tag = false;
    let mut in_entity = false;

    for c in message.chars() {
        match c {
            '<' if !in_tag => in_tag = true,
            '>' if in_tag => in_tag = false,
            '&' if !in_tag => {
                in_entity = true;
                count += 1;
            }
            ';' if in_entity => in_entity = false,
            _ if in_tag || in_entity => {}
            _ => count += 1,
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MessageConfig {
        MessageConfig::default()
    }

    #[test]
    fn test_basic_message() {
        let item = FeedItem::new("https://example.com/a")
            .with_title("Hello")
            .with_content("<p>First.</p><p>Second.</p>");

        let message = render_message(&item, "https://example.com/a", &config());

        assert_eq!(
            message,
            "<b>Hello</b>\n\nFirst.\n\nSecond.\n\n<a href=\"https://example.com/a\">Посилання</a>"
        );
    }

    #[test]
    fn test_placeholder_title() {
        let item = FeedItem::new("a").with_content("body");
        let message = render_message(&item, "a", &config());
        assert!(message.starts_with("<b>Без назви</b>\n\n"));
    }

    #[test]
    fn test_support_link_appended() {
        let mut config = config();
        config.support_link = Some("https://example.com/donate".into());
        config.support_label = "Donate".into();

        let item = FeedItem::new("a").with_title("T").with_content("body");
        let message = render_message(&item, "https://example.com/a", &config);

        assert!(message.ends_with(
            "<a href=\"https://example.com/a\">Посилання</a> | <a href=\"https://example.com/donate\">Donate</a>"
        ));
    }

    #[test]
    fn test_escapes_markup_characters() {
        let item = FeedItem::new("a")
            .with_title("Tom & Jerry <3")
            .with_content("<p>1 &lt; 2 &amp;&amp; 3 &gt; 2</p>");

        let message = render_message(&item, "https://example.com/?a=1&b=\"2\"", &config());

        assert!(message.starts_with("<b>Tom &amp; Jerry &lt;3</b>"));
        assert!(message.contains("1 &lt; 2 &amp;&amp; 3 &gt; 2"));
        assert!(message.contains("href=\"https://example.com/?a=1&amp;b="));
        assert!(!message.contains("b=\"2\""));
        // only the tags we emit remain
        let stripped = message
            .replace("<b>", "")
            .replace("</b>", "")
            .replace("</a>", "");
        assert_eq!(stripped.matches('<').count(), 1);
    }

    #[test]
    fn test_body_truncated_to_limit() {
        let body = "x".repeat(BODY_LIMIT + 50);
        let item = FeedItem::new("a").with_title("T").with_content(body.as_str());

        let message = render_message(&item, "a", &config());

        let expected = format!("<b>T</b>\n\n{}{}\n\n", "x".repeat(BODY_LIMIT), ELLIPSIS);
        assert!(message.starts_with(&expected));
    }

    #[test]
    fn test_body_at_limit_not_truncated() {
        let body = "y".repeat(BODY_LIMIT);
        let item = FeedItem::new("a").with_title("T").with_content(body.as_str());

        let message = render_message(&item, "a", &config());

        assert!(message.contains(&format!("{}\n\n<a", body)));
        assert!(!message.contains(ELLIPSIS));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let body = "ї".repeat(BODY_LIMIT + 1);
        let item = FeedItem::new("a").with_content(body.as_str());

        let message = render_message(&item, "a", &config());

        assert!(message.contains(&format!("{}{}", "ї".repeat(BODY_LIMIT), ELLIPSIS)));
    }

    #[test]
    fn test_truncation_never_splits_entity() {
        // 898 plain characters followed by "&amp;" puts the cut inside the entity
        let text = format!("{}&amp;tail", "z".repeat(BODY_LIMIT - 2));
        assert_eq!(
            truncate_escaped(&text, BODY_LIMIT),
            format!("{}{}", "z".repeat(BODY_LIMIT - 2), ELLIPSIS)
        );

        let complete = format!("{}&lt;rest", "z".repeat(BODY_LIMIT - 4));
        assert_eq!(
            truncate_escaped(&complete, BODY_LIMIT),
            format!("{}&lt;{}", "z".repeat(BODY_LIMIT - 4), ELLIPSIS)
        );
    }

    #[test]
    fn test_long_messages_fit_telegram_limits() {
        let mut config = config();
        config.support_link = Some("https://example.com/donate".into());
        let item = FeedItem::new("a")
            .with_title("A reasonably long headline for a news article")
            .with_content("word ".repeat(1000));

        let message = render_message(&item, "https://example.com/news/2024/01/01/article", &config);

        assert!(visible_len(&message) <= CAPTION_LIMIT);
        assert!(message.chars().count() <= MESSAGE_LIMIT);
    }

    #[test]
    fn test_visible_len() {
        assert_eq!(visible_len("<b>ab</b> &amp; <a href=\"x\">c</a>"), 6);
        assert_eq!(visible_len("plain"), 5);
    }

    #[test]
    fn test_caption_fits_with_long_title() {
        let mut config = config();
        config.support_link = Some("https://example.com/donate".into());
        let item = FeedItem::new("a")
            .with_title("t".repeat(150))
            .with_content("b".repeat(2000))
            .with_image("https://example.com/a.jpg");
        let link = "https://example.com/news/2024/01/01/article";

        assert!(visible_len(&render_message(&item, link, &config)) > CAPTION_LIMIT);

        let caption = render_caption(&item, link, &config);
        assert!(visible_len(&caption) <= CAPTION_LIMIT);
        assert!(caption.starts_with(&format!("<b>{}</b>\n\nbbb", "t".repeat(150))));
        assert!(caption.contains(&format!("b{}\n\n<a href", ELLIPSIS)));
    }

    #[test]
    fn test_caption_shrinks_past_entities() {
        let item = FeedItem::new("a")
            .with_title("x".repeat(900))
            .with_content("&amp;".repeat(1200));

        let caption = render_caption(&item, "a", &config());

        assert!(visible_len(&caption) <= CAPTION_LIMIT);
        assert!(caption.contains(&format!("&amp;{}\n\n<a href", ELLIPSIS)));
    }

    #[test]
    fn test_short_caption_matches_message() {
        let item = FeedItem::new("a").with_title("T").with_content("body");
        assert_eq!(
            render_caption(&item, "a", &config()),
            render_message(&item, "a", &config())
        );
    }

    #[test]
    fn test_oversized_title_still_reported() {
        let item = FeedItem::new("a").with_title("t".repeat(1100));
        let caption = render_caption(&item, "a", &config());
        assert!(visible_len(&caption) > CAPTION_LIMIT);
    }
}
