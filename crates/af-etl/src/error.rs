//! Error types for af-etl
//!
//! One variant per pipeline stage; the variant names are the error
//! kinds the orchestrator reports on.

use thiserror::Error;

/// ETL stage errors
#[derive(Error, Debug)]
pub enum EtlError {
    /// Query or connectivity failure during read (ETL001)
    #[error("[ETL001] Extraction failed: {0}")]
    Extraction(String),

    /// Join, age-computation, or row-level validation failure (ETL002)
    #[error("[ETL002] Transformation failed: {0}")]
    Transformation(String),

    /// Insert, connectivity, or constraint failure during write (ETL003)
    #[error("[ETL003] Load failed: {0}")]
    Load(String),
}

/// Result type alias for EtlError
pub type EtlResult<T> = Result<T, EtlError>;
