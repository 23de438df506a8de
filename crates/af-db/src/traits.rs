//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// A parameter value bound into a prepared statement.
///
/// Dates are bound as ISO-8601 text and cast in SQL; the backend does
/// not need calendar types of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
}

/// Database abstraction trait for Ageflow
///
/// Implementations must be Send + Sync for async operation. Each call
/// acquires the underlying connection for the duration of one
/// statement and releases it on all exit paths.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a query and return all rows as nullable strings
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Execute a query and return its row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Query and return sample rows as formatted strings
    /// Returns up to `limit` rows, each as a comma-separated string
    async fn query_sample_rows(&self, sql: &str, limit: usize) -> DbResult<Vec<String>>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Run a parameterized statement once per row inside a single
    /// transaction. Rolls back on the first failure; returns the total
    /// number of affected rows on commit.
    async fn insert_rows(&self, sql: &str, rows: &[Vec<SqlValue>]) -> DbResult<usize>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
