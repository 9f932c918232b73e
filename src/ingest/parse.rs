// src/ingest/parse.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::error::ParseError;
use crate::ingest::types::HeadlineCandidate;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// Modeled as a struct because feeds put isPermaLink etc. on the element.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// What became of one `<item>`.
#[derive(Debug)]
pub enum ItemOutcome {
    Candidate(HeadlineCandidate),
    /// No usable link/guid or no pubDate.
    MissingField,
    /// pubDate present but not an RFC-2822 date.
    UnparseableDate,
}

/// Consuming iterator over a parsed feed's items, in document order.
pub struct FeedItems {
    feed_url: String,
    items: std::vec::IntoIter<Item>,
}

impl Iterator for FeedItems {
    type Item = ItemOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|item| evaluate(item, &self.feed_url))
    }
}

/// Parse an RSS 2.0 body. A body that does not deserialize at all fails
/// the whole feed; everything per-item is handled by the iterator.
pub fn candidates(xml: &str, feed_url: &str) -> Result<FeedItems, ParseError> {
    let rss: Rss = from_str(xml)?;
    Ok(FeedItems {
        feed_url: feed_url.to_string(),
        items: rss.channel.items.into_iter(),
    })
}

fn evaluate(item: Item, feed_url: &str) -> ItemOutcome {
    // <link>, falling back to <guid>
    let url = match non_empty(item.link).or_else(|| non_empty(item.guid.and_then(|g| g.value))) {
        Some(u) => u,
        None => return ItemOutcome::MissingField,
    };
    let date_raw = match non_empty(item.pub_date) {
        Some(d) => d,
        None => return ItemOutcome::MissingField,
    };
    let published_at = match parse_pub_date(&date_raw) {
        Some(dt) => dt,
        None => return ItemOutcome::UnparseableDate,
    };

    ItemOutcome::Candidate(HeadlineCandidate {
        published_at,
        title: item.title,
        url,
        summary: item.description,
        source_feed: feed_url.to_string(),
    })
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// RFC-2822 pubDate, e.g. `Mon, 10 Jun 2024 08:30:00 GMT`. A value with
/// no zone at all is taken as UTC.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
