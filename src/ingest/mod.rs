// src/ingest/mod.rs
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod recency;
pub mod scheduler;
pub mod types;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::ingest::fetch::FeedTransport;
use crate::ingest::parse::ItemOutcome;
use crate::ingest::types::{FeedSource, HeadlineRecord, RunReport};
use crate::store::HeadlineStore;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_runs_total", "Completed ingestion runs.");
        describe_counter!("ingest_feeds_ok_total", "Feeds fetched and parsed cleanly.");
        describe_counter!(
            "ingest_fetch_errors_total",
            "Feeds skipped on timeout/network/HTTP status."
        );
        describe_counter!("ingest_parse_errors_total", "Feeds with unparseable XML.");
        describe_counter!(
            "ingest_items_dropped_total",
            "Items dropped for missing fields or bad dates."
        );
        describe_counter!(
            "ingest_items_stale_total",
            "Items rejected by the recency window."
        );
        describe_counter!("ingest_items_inserted_total", "Items newly stored.");
        describe_counter!(
            "ingest_items_dedup_total",
            "Items whose URL was already stored."
        );
        describe_counter!(
            "ingest_write_errors_total",
            "Items lost to isolated store failures."
        );
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when the ingest pipeline last ran."
        );
    });
}

/// Run one ingestion pass over `sources`: fetch each feed (at most
/// `max_in_flight` pipelines at once), parse, filter by recency, and
/// insert-or-ignore every accepted item. Waits for every pipeline to
/// finish; no feed's failure touches any other feed.
pub async fn run_once(
    sources: &[FeedSource],
    transport: &dyn FeedTransport,
    store: &dyn HeadlineStore,
    max_in_flight: usize,
) -> RunReport {
    ensure_metrics_described();

    let pipelines: Vec<_> = sources
        .iter()
        .map(|source| process_feed(source, transport, store))
        .collect();
    let report = stream::iter(pipelines)
        .buffer_unordered(max_in_flight.max(1))
        .fold(RunReport::default(), |mut acc, outcome| async move {
            acc.merge(&outcome);
            acc
        })
        .await;

    counter!("ingest_runs_total").increment(1);
    counter!("ingest_feeds_ok_total").increment(report.feeds_ok as u64);
    counter!("ingest_fetch_errors_total").increment(report.fetch_errors as u64);
    counter!("ingest_parse_errors_total").increment(report.parse_errors as u64);
    counter!("ingest_items_dropped_total").increment(report.items_dropped as u64);
    counter!("ingest_items_stale_total").increment(report.items_stale as u64);
    counter!("ingest_items_inserted_total").increment(report.items_inserted as u64);
    counter!("ingest_items_dedup_total").increment(report.items_deduplicated as u64);
    counter!("ingest_write_errors_total").increment(report.write_errors as u64);
    gauge!("ingest_last_run_ts").set(Utc::now().timestamp().max(0) as f64);

    tracing::info!(
        feeds = sources.len(),
        feeds_ok = report.feeds_ok,
        fetch_errors = report.fetch_errors,
        parse_errors = report.parse_errors,
        dropped = report.items_dropped,
        stale = report.items_stale,
        inserted = report.items_inserted,
        deduplicated = report.items_deduplicated,
        write_errors = report.write_errors,
        "ingestion run complete"
    );

    report
}

/// One feed end-to-end. Every failure mode below stays inside this
/// function's report; the caller only merges counters.
async fn process_feed(
    source: &FeedSource,
    transport: &dyn FeedTransport,
    store: &dyn HeadlineStore,
) -> RunReport {
    let mut report = RunReport::default();

    let body = match transport.get(&source.url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(url = %source.url, error = %e, "feed fetch failed, skipping");
            report.fetch_errors = 1;
            return report;
        }
    };

    let items = match parse::candidates(&body, &source.url) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(url = %source.url, error = %e, "feed body unparseable, skipping");
            report.parse_errors = 1;
            return report;
        }
    };
    report.feeds_ok = 1;

    let now = Utc::now();
    for outcome in items {
        let candidate = match outcome {
            ItemOutcome::Candidate(c) => c,
            ItemOutcome::MissingField | ItemOutcome::UnparseableDate => {
                report.items_dropped += 1;
                continue;
            }
        };
        if !recency::within_window(candidate.published_at, now) {
            report.items_stale += 1;
            continue;
        }

        let record = HeadlineRecord::from(candidate);
        match store.insert_ignore(&record).await {
            Ok(true) => report.items_inserted += 1,
            Ok(false) => report.items_deduplicated += 1,
            Err(e) => {
                tracing::warn!(url = %record.url, error = %e, "insert failed, record skipped");
                report.write_errors += 1;
            }
        }
    }

    tracing::debug!(
        url = %source.url,
        inserted = report.items_inserted,
        deduplicated = report.items_deduplicated,
        stale = report.items_stale,
        dropped = report.items_dropped,
        "feed processed"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_merge_sums_every_counter() {
        let mut a = RunReport {
            feeds_ok: 1,
            fetch_errors: 2,
            parse_errors: 1,
            items_dropped: 3,
            items_stale: 4,
            items_inserted: 5,
            items_deduplicated: 6,
            write_errors: 1,
        };
        let b = RunReport {
            feeds_ok: 1,
            items_inserted: 2,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.feeds_ok, 2);
        assert_eq!(a.items_inserted, 7);
        assert_eq!(a.items_accepted(), 7 + 6 + 1);
    }
}
