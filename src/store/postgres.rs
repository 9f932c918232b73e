// src/store/postgres.rs
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use super::{HeadlineStore, StoreError};
use crate::config::DbConfig;
use crate::ingest::types::HeadlineRecord;

const INSERT_SQL: &str = "INSERT INTO news (date, title, url, summary, source_feed) \
     VALUES ($1, $2, $3, $4, $5) \
     ON CONFLICT (url) DO NOTHING";

const SELECT_ALL_SQL: &str =
    "SELECT date, title, url, summary, source_feed FROM news ORDER BY date DESC";

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS news (\
         date        TIMESTAMPTZ NOT NULL,\
         title       TEXT,\
         url         TEXT PRIMARY KEY,\
         summary     TEXT,\
         source_feed TEXT NOT NULL\
     )";

/// PostgreSQL-backed headline store. The pool is the only handle; it is
/// created once at startup and passed to whoever needs the store.
pub struct PgHeadlineStore {
    pool: PgPool,
}

impl PgHeadlineStore {
    pub async fn connect(cfg: &DbConfig) -> Result<Self, StoreError> {
        let opts = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .database(&cfg.name)
            .username(&cfg.user)
            .password(&cfg.password);
        let pool = PgPoolOptions::new()
            .max_connections(cfg.pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `news` table and its `url` uniqueness constraint if
    /// this is a fresh database.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl HeadlineStore for PgHeadlineStore {
    async fn insert_ignore(&self, record: &HeadlineRecord) -> Result<bool, StoreError> {
        let result = sqlx::query(INSERT_SQL)
            .bind(record.date)
            .bind(&record.title)
            .bind(&record.url)
            .bind(&record.summary)
            .bind(&record.source_feed)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_batch_ignore(&self, records: &[HeadlineRecord]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;
        for record in records {
            let result = sqlx::query(INSERT_SQL)
                .bind(record.date)
                .bind(&record.title)
                .bind(&record.url)
                .bind(&record.summary)
                .bind(&record.source_feed)
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    async fn all_by_date_desc(&self) -> Result<Vec<HeadlineRecord>, StoreError> {
        let rows = sqlx::query_as::<_, HeadlineRecord>(SELECT_ALL_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
