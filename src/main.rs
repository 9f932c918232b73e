//! Stock News Ingestor — Binary Entrypoint
//! Polls the configured RSS feeds and keeps the headline store current;
//! `export`/`import` move JSON snapshots in and out of the store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stock_news_ingestor::config::DbConfig;
use stock_news_ingestor::ingest::fetch::{FetchConfig, HttpTransport};
use stock_news_ingestor::ingest::scheduler::{spawn_ingest_scheduler, SchedulerCfg};
use stock_news_ingestor::ingest::{catalog, config as tickers};
use stock_news_ingestor::store::PgHeadlineStore;
use stock_news_ingestor::{snapshot, HeadlineStore};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every configured feed once and store new headlines
    Run,
    /// Keep fetching on a fixed interval
    Watch {
        /// Seconds between ingestion passes
        #[arg(long, default_value_t = 900)]
        interval_secs: u64,
    },
    /// Write all stored headlines to a JSON snapshot file
    Export {
        #[arg(short, long, default_value = "data/news.json")]
        out: PathBuf,
    },
    /// Load a JSON snapshot file into the store
    Import {
        #[arg(short, long, default_value = "data/news.json")]
        input: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when vars come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let db = DbConfig::from_env()?;
    let store = PgHeadlineStore::connect(&db)
        .await
        .context("connecting to the record store")?;
    store
        .ensure_schema()
        .await
        .context("ensuring the news table exists")?;

    match cli.command {
        Command::Run => {
            let (sources, fetch_cfg) = build_run()?;
            let transport = HttpTransport::new(&fetch_cfg)?;
            stock_news_ingestor::ingest::run_once(
                &sources,
                &transport,
                &store,
                fetch_cfg.max_in_flight,
            )
            .await;
        }
        Command::Watch { interval_secs } => {
            let (sources, fetch_cfg) = build_run()?;
            let transport: Arc<HttpTransport> = Arc::new(HttpTransport::new(&fetch_cfg)?);
            let store: Arc<dyn HeadlineStore> = Arc::new(store);
            let handle = spawn_ingest_scheduler(
                SchedulerCfg {
                    interval_secs,
                    max_in_flight: fetch_cfg.max_in_flight,
                },
                sources,
                transport,
                store,
            );
            handle.await.context("scheduler task ended")?;
        }
        Command::Export { out } => {
            let count = snapshot::export_to_file(&store, &out).await?;
            println!("Wrote {count} records to {}", out.display());
        }
        Command::Import { input } => {
            let summary = snapshot::import_from_file(&store, &input).await?;
            println!(
                "Imported {} of {} records ({} lines skipped)",
                summary.written, summary.loaded, summary.skipped_lines
            );
        }
    }

    Ok(())
}

/// Resolve the ticker list and expand the feed catalog. Any failure
/// here is fatal: without a fetch set there is no run.
fn build_run() -> Result<(Vec<stock_news_ingestor::FeedSource>, FetchConfig)> {
    let symbols = tickers::load_tickers_default().context("loading ticker list")?;
    let sources = catalog::default_catalog(&symbols).context("building feed catalog")?;
    tracing::info!(
        tickers = symbols.len(),
        feeds = sources.len(),
        "feed catalog built"
    );
    Ok((sources, FetchConfig::default()))
}
