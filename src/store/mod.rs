// src/store/mod.rs
pub mod postgres;

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ingest::types::HeadlineRecord;

pub use postgres::PgHeadlineStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Other(String),
}

/// The record store the pipeline writes to: insert-or-ignore keyed by
/// `url`, plus the bulk read the snapshot export uses. Dedup lives in
/// the store's uniqueness constraint, never in application locking.
#[async_trait]
pub trait HeadlineStore: Send + Sync {
    /// Insert one record unless its `url` is already stored. Returns
    /// true when a new row was written. Each call is its own unit of
    /// work; a failure here never affects sibling records.
    async fn insert_ignore(&self, record: &HeadlineRecord) -> Result<bool, StoreError>;

    /// Insert a batch in a single unit of work, ignoring duplicate
    /// URLs. Returns the number of rows written.
    async fn insert_batch_ignore(&self, records: &[HeadlineRecord]) -> Result<u64, StoreError>;

    /// All stored records, newest publication date first.
    async fn all_by_date_desc(&self) -> Result<Vec<HeadlineRecord>, StoreError>;
}

// --- Test helper ---

/// In-memory store keyed by URL, for tests. `failing_urls` makes
/// specific inserts error so write isolation can be exercised.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, HeadlineRecord>>,
    failing_urls: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: Mutex::new(HashMap::new()),
            failing_urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("memory store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HeadlineStore for MemoryStore {
    async fn insert_ignore(&self, record: &HeadlineRecord) -> Result<bool, StoreError> {
        if self.failing_urls.contains(&record.url) {
            return Err(StoreError::Other(format!(
                "injected failure for {}",
                record.url
            )));
        }
        let mut rows = self.rows.lock().expect("memory store mutex poisoned");
        if rows.contains_key(&record.url) {
            return Ok(false);
        }
        rows.insert(record.url.clone(), record.clone());
        Ok(true)
    }

    async fn insert_batch_ignore(&self, records: &[HeadlineRecord]) -> Result<u64, StoreError> {
        let mut written = 0u64;
        for record in records {
            if self.insert_ignore(record).await? {
                written += 1;
            }
        }
        Ok(written)
    }

    async fn all_by_date_desc(&self) -> Result<Vec<HeadlineRecord>, StoreError> {
        let rows = self.rows.lock().expect("memory store mutex poisoned");
        let mut out: Vec<HeadlineRecord> = rows.values().cloned().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }
}
