//! SQLite backend (embedded, one row per collection)

use crate::ports::CollectionBackend;
use crate::{Collection, Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Each collection is a JSON array in the `records` column of its row, so
/// replacing a collection is a single upsert statement.
pub struct SqliteBackend {
    pool: Arc<SqlitePool>,
}

impl SqliteBackend {
    pub async fn open(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::Storage(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database. A single connection that never expires,
    /// since every new connection would see a fresh empty database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        Self::run_migrations(&pool).await?;
        tracing::info!("SQLite storage ready");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                records TEXT NOT NULL DEFAULT '[]',
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CollectionBackend for SqliteBackend {
    async fn read_collection(&self, collection: Collection) -> Result<Vec<Value>> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT records FROM collections WHERE name = ?1
            "#,
        )
        .bind(collection.as_str())
        .fetch_optional(&*self.pool)
        .await?;

        match row {
            Some((records,)) => Ok(serde_json::from_str(&records)?),
            None => Ok(Vec::new()),
        }
    }

    async fn replace_collection(&self, collection: Collection, records: Vec<Value>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO collections (name, records, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(name) DO UPDATE SET
                records = excluded.records,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(serde_json::to_string_pretty(&records)?)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
