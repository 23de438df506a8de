//! Configuration types and parsing for ageflow.yml

use crate::error::{CoreError, CoreResult};
use crate::suite::Suite;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main project configuration from ageflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// ETL relation names and optional snapshot override
    #[serde(default)]
    pub etl: EtlConfig,

    /// Output directory for stored validation results and the docs site
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Expectation suites available to checkpoints
    #[serde(default)]
    pub suites: Vec<Suite>,

    /// Pre-declared named checkpoints
    #[serde(default)]
    pub checkpoints: Vec<CheckpointSpec>,
}

impl Config {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency: every checkpoint must reference a
    /// declared suite.
    fn validate(&self) -> CoreResult<()> {
        for checkpoint in &self.checkpoints {
            if !self.suites.iter().any(|s| s.name == checkpoint.suite) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "checkpoint '{}' references unknown suite '{}'",
                        checkpoint.name, checkpoint.suite
                    ),
                });
            }
        }
        Ok(())
    }

    /// Find a suite by name.
    pub fn suite(&self, name: &str) -> Option<&Suite> {
        self.suites.iter().find(|s| s.name == name)
    }

    /// Find a pre-declared checkpoint by name.
    pub fn checkpoint(&self, name: &str) -> Option<&CheckpointSpec> {
        self.checkpoints.iter().find(|c| c.name == name)
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (file-based or ":memory:")
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// ETL relation names and the optional fixed snapshot date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EtlConfig {
    /// Source relation: (id, birth_date)
    #[serde(default = "default_source_table")]
    pub source_table: String,

    /// Target relation: (snapshot_date, id, age placeholder)
    #[serde(default = "default_target_table")]
    pub target_table: String,

    /// Results relation: (snapshot_date, id, birth_date, age)
    #[serde(default = "default_results_table")]
    pub results_table: String,

    /// Fixed snapshot date override (YYYY-MM-DD); the current date is
    /// used when absent
    #[serde(default)]
    pub snapshot_date: Option<String>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source_table: default_source_table(),
            target_table: default_target_table(),
            results_table: default_results_table(),
            snapshot_date: None,
        }
    }
}

/// Which rows of the suite's relation a checkpoint runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScopeSpec {
    /// Rows of the most recent snapshot_date (default)
    #[default]
    Latest,
    /// Every row of the relation
    All,
}

/// A pre-declared named checkpoint binding a suite to a scope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointSpec {
    /// Checkpoint name
    pub name: String,

    /// Referenced suite name
    pub suite: String,

    /// Batch scope
    #[serde(default)]
    pub scope: ScopeSpec,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_db_path() -> String {
    "target/ageflow.duckdb".to_string()
}

fn default_target_path() -> String {
    "target".to_string()
}

fn default_source_table() -> String {
    "source_table".to_string()
}

fn default_target_table() -> String {
    "target_table".to_string()
}

fn default_results_table() -> String {
    "target_results".to_string()
}
