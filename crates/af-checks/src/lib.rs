//! af-checks - Data-quality checkpoints for Ageflow
//!
//! This crate compiles declarative expectations to failing-rows SQL,
//! executes them against a dataset scope (typically the latest
//! snapshot), stores the results, and regenerates the data-docs site.
//! Failed expectations are a reported outcome, not an error; only an
//! inability to execute the checkpoint is a `CheckError`.

pub mod checkpoint;
pub mod docs;
pub mod error;
pub mod generator;
pub mod runner;

pub use checkpoint::{BatchScope, Checkpoint, CheckpointAction};
pub use docs::build_data_docs;
pub use error::{CheckError, CheckResult};
pub use generator::GeneratedExpectation;
pub use runner::{CheckpointRunner, ExpectationFailure, SuiteResult};
