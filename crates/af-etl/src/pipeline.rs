//! Sequential pipeline orchestration
//!
//! Runs extract, transform, in-memory validation, and load in order.
//! An empty source is an explicit `NothingToDo` outcome, not an error;
//! downstream stages are skipped.

use crate::error::{EtlError, EtlResult};
use crate::extract::Extractor;
use crate::load::Loader;
use crate::transform::{transform, validate_transformed};
use af_core::config::EtlConfig;
use af_db::Database;
use chrono::NaiveDate;
use std::sync::Arc;

/// Row counts from a completed ETL run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtlStats {
    /// Source rows extracted
    pub source_rows: usize,

    /// Target rows extracted
    pub target_rows: usize,

    /// Rows produced by the transform
    pub transformed: usize,

    /// Rows inserted into the results relation
    pub loaded: usize,
}

/// Outcome of an ETL run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtlOutcome {
    /// All stages ran; stats carry the row counts
    Completed(EtlStats),

    /// The source relation was empty; downstream stages were skipped
    NothingToDo,
}

/// The ETL pipeline: extract, transform, validate, load
pub struct Pipeline {
    db: Arc<dyn Database>,
    etl: EtlConfig,
}

impl Pipeline {
    /// Create a pipeline over an open database handle
    pub fn new(db: Arc<dyn Database>, etl: EtlConfig) -> Self {
        Self { db, etl }
    }

    /// Create the schema and seed sample data for `snapshot`.
    pub async fn setup(&self, snapshot: NaiveDate) -> EtlResult<()> {
        let loader = Loader::new(self.db.as_ref(), &self.etl);
        loader.create_schema().await?;
        loader.seed_sample_data(snapshot).await?;
        Ok(())
    }

    /// Run extract, transform, validate, and load sequentially.
    ///
    /// `snapshot` limits the target extraction to one snapshot date;
    /// `None` processes every target row.
    pub async fn run(&self, snapshot: Option<NaiveDate>) -> EtlResult<EtlOutcome> {
        let extractor = Extractor::new(self.db.as_ref(), &self.etl);

        let source = extractor.extract_source().await?;
        if source.is_empty() {
            log::warn!("pipeline: source relation is empty, nothing to do");
            return Ok(EtlOutcome::NothingToDo);
        }

        let targets = extractor.extract_targets(snapshot).await?;

        let batch = transform(&source, &targets);
        if !validate_transformed(&batch) {
            return Err(EtlError::Transformation(
                "transformed data failed validation".to_string(),
            ));
        }

        let loader = Loader::new(self.db.as_ref(), &self.etl);
        let loaded = loader.load(&batch).await?;

        let stats = EtlStats {
            source_rows: source.len(),
            target_rows: targets.len(),
            transformed: batch.len(),
            loaded,
        };
        log::info!(
            "pipeline: completed (source={}, target={}, transformed={}, loaded={})",
            stats.source_rows,
            stats.target_rows,
            stats.transformed,
            stats.loaded
        );
        Ok(EtlOutcome::Completed(stats))
    }
}
