//! SQLite-backed history store.
//!
//! Uses a `sqlx` connection pool in WAL mode. Timestamps are stored as
//! fixed-width RFC 3339 UTC text so that lexicographic order in the
//! `created_at` index matches chronological order. Write serialization is
//! delegated to SQLite's own transaction discipline; each append is a single
//! INSERT and each clear a single DELETE.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::calc::Operation;

use super::{CalculationRecord, HistoryStore, StoreError};

/// SQLite implementation of [`HistoryStore`].
#[derive(Debug, Clone)]
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    /// Open (or create) the database at `path` and run migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::ConnectionFailed {
                message: format!("failed to create database directory: {e}"),
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(|e| StoreError::ConnectionFailed {
                message: format!("invalid database path: {e}"),
            })?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                message: format!("failed to connect to database: {e}"),
            })?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// In-memory instance for tests. A single connection keeps the whole
    /// pool on one private database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StoreError::ConnectionFailed {
                message: format!("invalid memory database options: {e}"),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                message: format!("failed to create in-memory database: {e}"),
            })?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        // raw_sql: the migration file holds more than one statement
        let schema = include_str!("../../migrations/001_create_calculations.sql");
        sqlx::raw_sql(schema)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed {
                message: format!("failed to create calculations table: {e}"),
            })?;

        Ok(())
    }

    fn query_error(query: &str, message: String) -> StoreError {
        StoreError::QueryFailed {
            query: query.to_string(),
            message,
        }
    }

    /// Fixed-width RFC 3339 UTC, microsecond precision. Width matters: the
    /// `created_at` column is TEXT and ordered lexicographically.
    fn format_timestamp(ts: DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
        s.parse::<DateTime<Utc>>().map_err(|e| StoreError::Internal {
            message: format!("failed to parse timestamp '{s}': {e}"),
        })
    }

    fn parse_operation(s: &str) -> Result<Operation, StoreError> {
        s.parse::<Operation>().map_err(|e| StoreError::Internal {
            message: format!("invalid operation in database: {e}"),
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    async fn append(
        &self,
        num1: f64,
        num2: f64,
        operation: Operation,
        result: f64,
    ) -> Result<CalculationRecord, StoreError> {
        // Round-trip through the stored text format so the returned record
        // compares equal to what a later read sees (microsecond precision).
        let created_str = Self::format_timestamp(Utc::now());
        let created_at = Self::parse_timestamp(&created_str)?;

        let insert = sqlx::query(
            "INSERT INTO calculations (num1, num2, operation, result, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(num1)
        .bind(num2)
        .bind(operation.as_str())
        .bind(result)
        .bind(&created_str)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT calculations", format!("{e}")))?;

        Ok(CalculationRecord {
            id: insert.last_insert_rowid(),
            num1,
            num2,
            operation,
            result,
            created_at,
        })
    }

    async fn recent(&self, limit: u32) -> Result<Vec<CalculationRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, num1, num2, operation, result, created_at FROM calculations \
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT calculations", format!("{e}")))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let operation: String = row.get("operation");
            let created_at: String = row.get("created_at");

            records.push(CalculationRecord {
                id: row.get("id"),
                num1: row.get("num1"),
                num2: row.get("num2"),
                operation: Self::parse_operation(&operation)?,
                result: row.get("result"),
                created_at: Self::parse_timestamp(&created_at)?,
            });
        }

        Ok(records)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let deleted = sqlx::query("DELETE FROM calculations")
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE calculations", format!("{e}")))?;

        Ok(deleted.rows_affected())
    }
}
