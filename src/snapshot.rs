// src/snapshot.rs
//
// Portable JSON snapshots of the record store: a full export for
// downstream consumers, and a tolerant import that re-loads a snapshot
// through the same insert-or-ignore path the pipeline uses.

use std::path::Path;

use anyhow::{Context, Result};

use crate::ingest::types::HeadlineRecord;
use crate::store::HeadlineStore;

/// What an import run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records parsed out of the file.
    pub loaded: usize,
    /// Records newly written (the rest were already stored).
    pub written: u64,
    /// Lines skipped in newline-delimited fallback mode.
    pub skipped_lines: usize,
}

/// Write every stored record to `path` as a UTF-8 JSON array, newest
/// first, dates in ISO-8601. Returns the number of records written.
pub async fn export_to_file(store: &dyn HeadlineStore, path: &Path) -> Result<usize> {
    let records = store
        .all_by_date_desc()
        .await
        .context("reading records for export")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(&records).context("serializing export")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(path = %path.display(), count = records.len(), "snapshot exported");
    Ok(records.len())
}

/// Load a snapshot file into the store with insert-or-ignore semantics,
/// committing once for the whole load. A missing file is an empty load,
/// not an error. The file may be a JSON array or, as a fallback,
/// newline-delimited JSON objects; unparseable lines are skipped and
/// counted rather than failing the load.
pub async fn import_from_file(store: &dyn HeadlineStore, path: &Path) -> Result<ImportSummary> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no snapshot file, nothing to import");
            return Ok(ImportSummary::default());
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    let (records, skipped_lines) = parse_snapshot(&text);
    let written = store
        .insert_batch_ignore(&records)
        .await
        .context("loading snapshot into store")?;

    let summary = ImportSummary {
        loaded: records.len(),
        written,
        skipped_lines,
    };
    tracing::info!(
        path = %path.display(),
        loaded = summary.loaded,
        written = summary.written,
        skipped_lines = summary.skipped_lines,
        "snapshot imported"
    );
    Ok(summary)
}

/// Two-tier parse: whole-document JSON array first, then line-by-line.
fn parse_snapshot(text: &str) -> (Vec<HeadlineRecord>, usize) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (Vec::new(), 0);
    }
    if let Ok(records) = serde_json::from_str::<Vec<HeadlineRecord>>(trimmed) {
        return (records, 0);
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for line in trimmed.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<HeadlineRecord>(line) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }
    (records, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(url: &str) -> HeadlineRecord {
        HeadlineRecord {
            date: Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap(),
            title: Some("Markets rally".into()),
            url: url.into(),
            summary: None,
            source_feed: "https://feed.example/rss".into(),
        }
    }

    #[test]
    fn whole_document_array_parses_without_skips() {
        let json = serde_json::to_string(&vec![record("https://a"), record("https://b")]).unwrap();
        let (records, skipped) = parse_snapshot(&json);
        assert_eq!(records.len(), 2);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn ndjson_fallback_skips_bad_lines_and_counts_them() {
        let good = serde_json::to_string(&record("https://a")).unwrap();
        let text = format!("{good}\nnot json at all\n\n{good}\n");
        let (records, skipped) = parse_snapshot(&text);
        assert_eq!(records.len(), 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn empty_input_is_an_empty_load() {
        assert_eq!(parse_snapshot("").0.len(), 0);
        assert_eq!(parse_snapshot("   \n  ").0.len(), 0);
    }
}
