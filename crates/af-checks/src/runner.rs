//! Checkpoint execution
//!
//! Runs a checkpoint's expectations in declaration order, collects the
//! explicit result structure, and applies the checkpoint's actions.

use crate::checkpoint::{Checkpoint, CheckpointAction};
use crate::docs::build_data_docs;
use crate::error::{CheckError, CheckResult};
use crate::generator::GeneratedExpectation;
use af_db::Database;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How many unexpected values a failure report keeps
const SAMPLE_LIMIT: usize = 5;

/// A single failed expectation with a bounded sample of offenders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationFailure {
    /// Identifying expectation name
    pub expectation_name: String,

    /// Number of failing rows
    pub failure_count: usize,

    /// Up to five offending rows, formatted
    pub sample_unexpected_values: Vec<String>,
}

/// Result of one checkpoint run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    /// Suite that was executed
    pub suite_name: String,

    /// Checkpoint that bound the suite
    pub checkpoint_name: String,

    /// Unique run identifier (timestamped)
    pub run_name: String,

    /// Execution time, UTC
    pub executed_at: DateTime<Utc>,

    /// Scope description (all / latest / a snapshot date)
    pub scope: String,

    /// Expectations evaluated
    pub total: usize,

    /// Expectations that passed
    pub succeeded: usize,

    /// Failed expectations, in declaration order
    pub failures: Vec<ExpectationFailure>,
}

impl SuiteResult {
    /// Overall success: every expectation passed.
    pub fn success(&self) -> bool {
        self.failures.is_empty() && self.succeeded == self.total
    }
}

/// Evaluation parameters stored alongside a suite result
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EvaluationParams {
    checkpoint_name: String,
    suite_name: String,
    table: String,
    scope: String,
    expectations: Vec<String>,
}

/// Executes checkpoints and applies their actions
pub struct CheckpointRunner<'a> {
    db: &'a dyn Database,
    target_dir: PathBuf,
}

impl<'a> CheckpointRunner<'a> {
    /// Create a runner storing results under `target_dir/validations`
    /// and docs under `target_dir/docs`.
    pub fn new(db: &'a dyn Database, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            target_dir: target_dir.into(),
        }
    }

    /// Directory holding stored validation results.
    pub fn validations_dir(&self) -> PathBuf {
        self.target_dir.join("validations")
    }

    /// Execute a checkpoint and apply its actions.
    ///
    /// Failed expectations produce a `SuiteResult` with failures, not
    /// an error; `Err` means the checkpoint itself could not execute.
    pub async fn run(&self, checkpoint: &Checkpoint) -> CheckResult<SuiteResult> {
        log::info!(
            "validation: running checkpoint '{}' (suite '{}', scope {})",
            checkpoint.name,
            checkpoint.suite.name,
            checkpoint.scope.describe()
        );

        let mut succeeded = 0;
        let mut failures = Vec::new();

        for expectation in &checkpoint.suite.expectations {
            let generated = GeneratedExpectation::from_expectation(
                expectation,
                &checkpoint.suite.table,
                &checkpoint.scope,
            );

            let count = self.db.query_count(&generated.sql).await.map_err(|e| {
                log::error!(
                    "validation: expectation '{}' could not execute: {}",
                    generated.name,
                    e
                );
                CheckError::Execution {
                    name: generated.name.clone(),
                    message: e.to_string(),
                }
            })?;

            if count == 0 {
                succeeded += 1;
                continue;
            }

            let samples = match self.db.query_sample_rows(&generated.sql, SAMPLE_LIMIT).await {
                Ok(samples) => samples,
                Err(e) => {
                    log::warn!(
                        "validation: could not fetch samples for '{}': {}",
                        generated.name,
                        e
                    );
                    Vec::new()
                }
            };

            log::error!(
                "validation: expectation '{}' failed ({} rows), sample: {:?}",
                generated.name,
                count,
                samples
            );
            failures.push(ExpectationFailure {
                expectation_name: generated.name,
                failure_count: count,
                sample_unexpected_values: samples,
            });
        }

        let executed_at = Utc::now();
        let result = SuiteResult {
            suite_name: checkpoint.suite.name.clone(),
            checkpoint_name: checkpoint.name.clone(),
            run_name: format!(
                "{}-{}",
                executed_at.format("%Y%m%d-%H%M%S"),
                checkpoint.name
            ),
            executed_at,
            scope: checkpoint.scope.describe(),
            total: checkpoint.suite.expectations.len(),
            succeeded,
            failures,
        };

        log::info!(
            "validation: suite '{}': {}/{} expectations succeeded",
            result.suite_name,
            result.succeeded,
            result.total
        );

        self.apply_actions(checkpoint, &result)?;
        Ok(result)
    }

    /// Resolve and execute a pre-declared checkpoint by name.
    pub async fn run_named(
        &self,
        config: &af_core::config::Config,
        name: &str,
    ) -> CheckResult<SuiteResult> {
        let checkpoint = Checkpoint::from_config(config, name)?;
        self.run(&checkpoint).await
    }

    fn apply_actions(&self, checkpoint: &Checkpoint, result: &SuiteResult) -> CheckResult<()> {
        for action in &checkpoint.actions {
            match action {
                CheckpointAction::StoreValidationResult => {
                    let path = self
                        .validations_dir()
                        .join(format!("{}.json", result.run_name));
                    write_json(&path, result)?;
                    log::debug!("validation: result stored at {}", path.display());
                }
                CheckpointAction::StoreEvaluationParams => {
                    let params = EvaluationParams {
                        checkpoint_name: checkpoint.name.clone(),
                        suite_name: checkpoint.suite.name.clone(),
                        table: checkpoint.suite.table.clone(),
                        scope: checkpoint.scope.describe(),
                        expectations: checkpoint
                            .suite
                            .expectations
                            .iter()
                            .map(|e| e.name(&checkpoint.suite.table))
                            .collect(),
                    };
                    let path = self
                        .validations_dir()
                        .join(format!("{}.params.json", result.run_name));
                    write_json(&path, &params)?;
                }
                CheckpointAction::UpdateDataDocs => {
                    let summary = build_data_docs(&self.target_dir)?;
                    log::info!(
                        "validation: data docs regenerated ({} suites, {} runs)",
                        summary.suites,
                        summary.runs
                    );
                }
            }
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CheckResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
