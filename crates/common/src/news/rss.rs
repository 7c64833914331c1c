//! Minimal RSS 2.0 item reader
//!
//! Only the fields an article needs are read. Channel-level elements are
//! ignored.

use crate::errors::{AppError, Result};
use crate::models::{NewsArticle, DEFAULT_NEWS_SOURCE};
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;
use scraper::Html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    PubDate,
    Description,
    Encoded,
    Source,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"pubDate" => Some(Field::PubDate),
            b"description" => Some(Field::Description),
            b"content:encoded" => Some(Field::Encoded),
            b"source" => Some(Field::Source),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ItemBuilder {
    title: String,
    link: String,
    pub_date: String,
    description: String,
    encoded: String,
    source: String,
}

impl ItemBuilder {
    fn push(&mut self, field: Field, text: &str) {
        let target = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Description => &mut self.description,
            Field::Encoded => &mut self.encoded,
            Field::Source => &mut self.source,
        };
        target.push_str(text);
    }

    fn build(self) -> NewsArticle {
        let raw_content = if self.encoded.is_empty() { self.description } else { self.encoded };
        let snippet = strip_html(&raw_content);
        let source = self.source.trim();

        NewsArticle {
            title: self.title.trim().to_string(),
            link: self.link.trim().to_string(),
            pub_date: self.pub_date.trim().to_string(),
            content: if snippet.is_empty() { raw_content.trim().to_string() } else { snippet },
            source: if source.is_empty() { DEFAULT_NEWS_SOURCE.to_string() } else { source.to_string() },
        }
    }
}

fn text_of(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(s) => s.into_owned(),
        // Undeclared entities: keep the raw bytes rather than dropping the field
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

/// Parse at most `limit` items from an RSS document
pub fn parse_items(xml: &str, limit: usize) -> Result<Vec<NewsArticle>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<ItemBuilder> = None;
    let mut field: Option<Field> = None;

    while items.len() < limit {
        let event = reader.read_event().map_err(|e| AppError::NewsFeed {
            message: format!("Malformed feed at byte {}: {}", reader.buffer_position(), e),
        })?;

        match event {
            Event::Start(e) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    current = Some(ItemBuilder::default());
                } else if current.is_some() {
                    field = Field::from_tag(name.as_ref());
                }
            }
            Event::Text(t) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &text_of(&t));
                }
            }
            Event::CData(c) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item.build());
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

/// Reduce an HTML fragment to its visible text
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    compact_ws(&text)
}

fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
