// src/ingest/fetch.rs
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::ingest::error::FetchError;

/// Browser-like identity; some finance feeds refuse default client UAs.
const FEED_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/115.0.0.0 Safari/537.36";
const FEED_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const FEED_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Retries after the first attempt, on timeout/connection error/5xx only.
const MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum feeds processed in flight at once.
    pub max_in_flight: usize,
    /// Minimum gap between the starts of consecutive requests.
    pub request_spacing: Duration,
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            request_spacing: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// How the pipeline gets feed bodies. The HTTP implementation lives
/// below; tests substitute canned responses.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Fetch one feed body. A non-2xx status is an error here; the
    /// caller decides that it only skips the feed.
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Reserves start slots so consecutive requests stay `spacing` apart.
/// The lock is held only to claim a slot; waiting happens outside it.
struct Pacer {
    next_slot: Mutex<Instant>,
    spacing: Duration,
}

impl Pacer {
    fn new(spacing: Duration) -> Self {
        Self {
            next_slot: Mutex::new(Instant::now()),
            spacing,
        }
    }

    async fn wait_for_slot(&self) {
        if self.spacing.is_zero() {
            return;
        }
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = if *next > now { *next } else { now };
            *next = slot + self.spacing;
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

/// Real HTTP transport: shared client with fixed headers and timeout,
/// bounded retries, polite spacing between request starts.
pub struct HttpTransport {
    client: reqwest::Client,
    pacer: Pacer,
}

impl HttpTransport {
    pub fn new(cfg: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(FEED_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(FEED_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(FEED_ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(cfg.request_timeout)
            .build()
            .context("building feed http client")?;

        Ok(Self {
            client,
            pacer: Pacer::new(cfg.request_spacing),
        })
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        self.pacer.wait_for_slot().await;
        let resp = self.client.get(url).send().await.map_err(FetchError::from)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }
        resp.text().await.map_err(FetchError::from)
    }
}

#[async_trait]
impl FeedTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0u32;
        loop {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < MAX_RETRIES => {
                    attempt += 1;
                    tracing::debug!(url, attempt, error = %e, "retrying feed fetch");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
