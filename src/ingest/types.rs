// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One feed to poll: a resolved URL plus the ticker it was expanded for
/// (absent for the global feeds). Built once per run, read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
    pub symbol: Option<String>,
}

impl FeedSource {
    pub fn global(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            symbol: None,
        }
    }

    pub fn for_symbol(url: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            symbol: Some(symbol.into()),
        }
    }
}

/// A parsed `<item>` that survived field validation and date parsing.
/// Lives only between the parser and the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineCandidate {
    pub published_at: DateTime<Utc>,
    pub title: Option<String>,
    pub url: String,
    pub summary: Option<String>,
    pub source_feed: String,
}

/// The persisted unit. `url` is the store's uniqueness key; the first
/// writer wins and later duplicates are dropped, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HeadlineRecord {
    pub date: DateTime<Utc>,
    pub title: Option<String>,
    pub url: String,
    pub summary: Option<String>,
    pub source_feed: String,
}

impl From<HeadlineCandidate> for HeadlineRecord {
    fn from(c: HeadlineCandidate) -> Self {
        Self {
            date: c.published_at,
            title: c.title,
            url: c.url,
            summary: c.summary,
            source_feed: c.source_feed,
        }
    }
}

/// Per-run outcome counters. Ephemeral, reporting only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Feeds fetched and parsed cleanly.
    pub feeds_ok: usize,
    /// Feeds skipped on timeout, connection error, or non-2xx status.
    pub fetch_errors: usize,
    /// Feeds whose body was not parseable RSS at all.
    pub parse_errors: usize,
    /// Items dropped for a missing link/guid or pubDate, or an
    /// unparseable pubDate.
    pub items_dropped: usize,
    /// Items rejected by the recency window.
    pub items_stale: usize,
    /// Items newly written to the store.
    pub items_inserted: usize,
    /// Items whose URL was already stored.
    pub items_deduplicated: usize,
    /// Items lost to an isolated store failure.
    pub write_errors: usize,
}

impl RunReport {
    /// Items that passed the recency filter, whatever the store said.
    pub fn items_accepted(&self) -> usize {
        self.items_inserted + self.items_deduplicated + self.write_errors
    }

    pub fn merge(&mut self, other: &RunReport) {
        self.feeds_ok += other.feeds_ok;
        self.fetch_errors += other.fetch_errors;
        self.parse_errors += other.parse_errors;
        self.items_dropped += other.items_dropped;
        self.items_stale += other.items_stale;
        self.items_inserted += other.items_inserted;
        self.items_deduplicated += other.items_deduplicated;
        self.write_errors += other.write_errors;
    }
}
