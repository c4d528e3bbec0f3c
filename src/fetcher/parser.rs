use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::app::{RelayError, Result};
use crate::domain::FeedItem;

/// Parse an RSS/Atom/JSON feed body into items, keeping document order
/// (newest first for well-behaved feeds).
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedItem>> {
    let feed = parser::parse(body).map_err(|e| RelayError::FeedParse(e.to_string()))?;

    let mut full_texts = full_text_elements(body);
    if full_texts.len() != feed.entries.len() {
        full_texts = vec![None; feed.entries.len()];
    }

    Ok(feed
        .entries
        .into_iter()
        .zip(full_texts)
        .map(|(entry, full_text)| item_from_entry(entry, full_text))
        .collect())
}

/// The `<full-text>` (or `yandex:full-text`) element of every RSS `<item>`,
/// in document order. feed-rs drops unknown elements, so this is a second
/// pass over the raw XML. Any read error yields an empty list.
fn full_text_elements(body: &[u8]) -> Vec<Option<String>> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut texts = Vec::new();

    let mut in_item = false;
    let mut in_full_text = false;
    let mut current = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" => {
                    in_item = true;
                    current.clear();
                }
                b"full-text" if in_item => in_full_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"item" if in_item => {
                    let text = current.trim();
                    texts.push((!text.is_empty()).then(|| text.to_string()));
                    in_item = false;
                }
                b"full-text" => in_full_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"item" => texts.push(None),
            Ok(Event::Text(t)) if in_full_text => {
                current.push_str(&decode_html_entities(&String::from_utf8_lossy(&t)));
            }
            Ok(Event::CData(c)) if in_full_text => {
                current.push_str(&String::from_utf8_lossy(&c));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Skipping full-text lookup: {}", e);
                return Vec::new();
            }
        }
        buf.clear();
    }

    texts
}

fn item_from_entry(entry: Entry, full_text: Option<String>) -> FeedItem {
    let link = entry
        .links
        .iter()
        .map(|l| l.href.trim())
        .find(|href| !href.is_empty())
        .map(String::from);

    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty());

    // Full text (<full-text>, content:encoded, Atom content) wins over the description
    let content_html = full_text
        .or_else(|| entry.content.and_then(|c| c.body))
        .filter(|body| !body.trim().is_empty())
        .or_else(|| entry.summary.map(|s| s.content))
        .unwrap_or_default();

    // RSS enclosures surface as media content
    let image_url = entry
        .media
        .iter()
        .flat_map(|media| media.content.iter())
        .find_map(|content| content.url.as_ref().map(|url| url.to_string()));

    FeedItem {
        link,
        title,
        content_html,
        image_url,
    }
}
