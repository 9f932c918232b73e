// src/ingest/error.rs
use std::path::PathBuf;

use reqwest::StatusCode;

/// Fatal before any fetch starts: the run's fetch set cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ticker list at {path} could not be read: {source}")]
    UnreadableTickers {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ticker list at {path} is not a JSON string array or TOML symbols table")]
    UnsupportedTickerFormat { path: PathBuf },
    #[error("no ticker list found (set TICKERS_PATH or provide config/tickers.json)")]
    MissingTickerFile,
    #[error("ticker list is empty")]
    EmptyTickers,
    #[error("feed template `{0}` must contain exactly one `{{}}` placeholder")]
    BadTemplate(String),
}

/// Isolated per feed: the feed is skipped and counted, the run goes on.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(StatusCode),
}

impl FetchError {
    /// Transient failures are worth a retry; client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Network(_) => true,
            FetchError::HttpStatus(status) => status.is_server_error(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

/// Isolated per feed: the body was not parseable RSS at all.
#[derive(Debug, thiserror::Error)]
#[error("malformed feed XML: {0}")]
pub struct ParseError(#[from] quick_xml::DeError);
