//! af-db - Database abstraction layer for Ageflow
//!
//! This crate provides the `Database` trait and the DuckDB
//! implementation used by the ETL stages and the checkpoint runner.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::DbError;
pub use traits::{Database, SqlValue};
