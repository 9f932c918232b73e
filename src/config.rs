// src/config.rs
use anyhow::{Context, Result};

/// Record-store connection settings, read once at process start.
/// `.env` loading happens in main before this is called.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub pool_size: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: var("DB_HOST")?,
            port: var("DB_PORT")?
                .parse()
                .context("DB_PORT is not a port number")?,
            name: var("DB_NAME")?,
            user: var("DB_USER")?,
            password: var("DB_PASS")?,
            pool_size: 5,
        })
    }
}

fn var(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing env var {key}"))
}
