//! HTML to chat-friendly plain text.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>|</img\s*>").expect("valid regex"));
static PARAGRAPH_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>").expect("valid regex"));
static PARAGRAPH_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>").expect("valid regex"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?br\b[^>]*>").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[a-zA-Z!][^>]*>").expect("valid regex")
});
static EXTRA_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Turn feed HTML into plain text.
///
/// Entities are decoded first so entity-encoded markup is treated as markup,
/// and once more after the tags are gone so the text itself reads plain.
/// Images are dropped (they travel as a separate attachment), every paragraph
/// ends with a blank line and every `<br>` becomes a newline. Lines are
/// trimmed and runs of blank lines collapse to one.
pub fn normalize(content_html: &str) -> String {
    if content_html.trim().is_empty() {
        return String::new();
    }

    let html = decode_html_entities(content_html);
    let html = IMG_TAG.replace_all(&html, "");
    let html = PARAGRAPH_OPEN.replace_all(&html, "");
    let html = PARAGRAPH_CLOSE.replace_all(&html, "\n\n");
    let html = LINE_BREAK.replace_all(&html, "\n");
    let text = ANY_TAG.replace_all(&html, "");
    let text = decode_html_entities(&text).replace('\u{a0}', " ");

    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");

    text.trim().to_string()
}
