// src/ingest/scheduler.rs
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::ingest::fetch::FeedTransport;
use crate::ingest::types::FeedSource;
use crate::store::HeadlineStore;

#[derive(Clone, Copy, Debug)]
pub struct SchedulerCfg {
    pub interval_secs: u64,
    pub max_in_flight: usize,
}

/// Spawn a background task that re-runs the ingestion pipeline on a
/// fixed interval. The first pass starts immediately. The catalog is
/// fixed for the task's lifetime; restart the process to pick up a new
/// ticker list.
pub fn spawn_ingest_scheduler(
    cfg: SchedulerCfg,
    sources: Vec<FeedSource>,
    transport: Arc<dyn FeedTransport>,
    store: Arc<dyn HeadlineStore>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(cfg.interval_secs));
        loop {
            ticker.tick().await;
            let report = crate::ingest::run_once(
                &sources,
                transport.as_ref(),
                store.as_ref(),
                cfg.max_in_flight,
            )
            .await;
            tracing::info!(
                target: "ingest",
                inserted = report.items_inserted,
                deduplicated = report.items_deduplicated,
                fetch_errors = report.fetch_errors,
                "scheduled ingest tick"
            );
        }
    })
}
