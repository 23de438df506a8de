//! Checkpoint definitions
//!
//! A checkpoint binds an expectation suite to a batch scope and an
//! action list. Two construction modes produce an equivalent success
//! signal: resolving a pre-declared checkpoint from configuration, or
//! building one programmatically for a specific snapshot date.

use crate::error::{CheckError, CheckResult};
use af_core::config::{Config, ScopeSpec};
use af_core::sql_utils::quote_ident;
use af_core::suite::Suite;
use chrono::NaiveDate;

/// Which rows of the suite's relation a checkpoint validates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchScope {
    /// Every row of the relation
    All,

    /// Rows of the most recent snapshot_date
    LatestSnapshot,

    /// Rows of one specific snapshot_date
    Snapshot(NaiveDate),
}

impl BatchScope {
    /// WHERE predicate selecting the scoped rows, or None for the whole
    /// relation.
    pub fn filter_sql(&self, table: &str) -> Option<String> {
        match self {
            BatchScope::All => None,
            BatchScope::LatestSnapshot => Some(format!(
                "snapshot_date = (SELECT MAX(snapshot_date) FROM {})",
                quote_ident(table)
            )),
            BatchScope::Snapshot(date) => Some(format!("snapshot_date = DATE '{}'", date)),
        }
    }

    /// Human-readable scope description for reports and logs.
    pub fn describe(&self) -> String {
        match self {
            BatchScope::All => "all".to_string(),
            BatchScope::LatestSnapshot => "latest".to_string(),
            BatchScope::Snapshot(date) => date.to_string(),
        }
    }
}

impl From<ScopeSpec> for BatchScope {
    fn from(spec: ScopeSpec) -> Self {
        match spec {
            ScopeSpec::Latest => BatchScope::LatestSnapshot,
            ScopeSpec::All => BatchScope::All,
        }
    }
}

/// Action applied after a checkpoint's expectations have executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointAction {
    /// Persist the suite result as JSON
    StoreValidationResult,

    /// Persist the evaluation parameters alongside the result
    StoreEvaluationParams,

    /// Regenerate the data-docs site
    UpdateDataDocs,
}

/// An executable checkpoint
#[derive(Debug, Clone)]
pub struct Checkpoint {
    /// Checkpoint name, used in run names and reports
    pub name: String,

    /// The suite to execute
    pub suite: Suite,

    /// Rows the expectations run against
    pub scope: BatchScope,

    /// Actions applied after execution
    pub actions: Vec<CheckpointAction>,
}

impl Checkpoint {
    fn default_actions() -> Vec<CheckpointAction> {
        vec![
            CheckpointAction::StoreValidationResult,
            CheckpointAction::StoreEvaluationParams,
            CheckpointAction::UpdateDataDocs,
        ]
    }

    /// Resolve a pre-declared checkpoint from configuration.
    pub fn from_config(config: &Config, name: &str) -> CheckResult<Self> {
        let spec = config
            .checkpoint(name)
            .ok_or_else(|| CheckError::UnknownCheckpoint(name.to_string()))?;
        let suite = config
            .suite(&spec.suite)
            .ok_or_else(|| CheckError::UnknownSuite(spec.suite.clone()))?;

        Ok(Self {
            name: spec.name.clone(),
            suite: suite.clone(),
            scope: spec.scope.into(),
            actions: Self::default_actions(),
        })
    }

    /// Build a checkpoint programmatically for one snapshot date, with
    /// the fixed action list (store result, store evaluation
    /// parameters, refresh data docs).
    pub fn for_snapshot(suite: Suite, snapshot: NaiveDate) -> Self {
        let name = format!(
            "programmatic_{}_{}",
            suite.name,
            snapshot.format("%Y%m%d")
        );
        Self {
            name,
            suite,
            scope: BatchScope::Snapshot(snapshot),
            actions: Self::default_actions(),
        }
    }
}
