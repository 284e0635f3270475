//! Calculation history persistence.
//!
//! The history is an append-only log of completed calculations, read back
//! through a bounded newest-first window and cleared only in bulk. The
//! [`HistoryStore`] trait keeps persistence details out of the evaluator and
//! out of the HTTP layer; [`SqliteHistory`] is the SQLite implementation.

mod sqlite;

pub use sqlite::SqliteHistory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::calc::Operation;

/// A persisted entry capturing one completed calculation.
///
/// Records are immutable once stored. `id` is assigned by the store and is
/// strictly increasing in insertion order; `created_at` is non-decreasing
/// with `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRecord {
    pub id: i64,
    pub num1: f64,
    pub num2: f64,
    pub operation: Operation,
    pub result: f64,
    pub created_at: DateTime<Utc>,
}

impl CalculationRecord {
    /// Human-readable rendering of the calculation, derived on read.
    ///
    /// Floats are formatted with their shortest round-trip representation,
    /// so `2.0 + 3.0 = 5.0` rather than `2 + 3 = 5`.
    pub fn expression(&self) -> String {
        format!(
            "{:?} {} {:?} = {:?}",
            self.num1,
            self.operation.symbol(),
            self.num2,
            self.result
        )
    }
}

/// Persistence failure. Propagated immediately; the store never retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("database connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("migration failed: {message}")]
    MigrationFailed { message: String },

    #[error("query failed: {query} - {message}")]
    QueryFailed { query: String, message: String },

    #[error("storage error: {message}")]
    Internal { message: String },
}

/// Append-only record log with bounded-window read and full clear.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one calculation, assigning the next identifier and the
    /// current timestamp. Atomic: no partial record is ever visible.
    async fn append(
        &self,
        num1: f64,
        num2: f64,
        operation: Operation,
        result: f64,
    ) -> Result<CalculationRecord, StoreError>;

    /// Up to `limit` records, most recent first (ties broken by id
    /// descending). Empty when the store is empty.
    async fn recent(&self, limit: u32) -> Result<Vec<CalculationRecord>, StoreError>;

    /// Delete all records unconditionally, returning how many were removed.
    async fn clear(&self) -> Result<u64, StoreError>;
}
