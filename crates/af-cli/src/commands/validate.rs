//! Validate command implementation

use anyhow::{bail, Context, Result};
use af_checks::{Checkpoint, CheckpointRunner, SuiteResult};
use af_core::age::parse_date;
use af_core::config::Config;
use af_db::Database;
use chrono::NaiveDate;
use std::path::Path;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{load_config, open_db, target_dir};

/// Execute the validate command: run data-quality checks only.
///
/// Failed expectations exit with code 1; a checkpoint that cannot
/// execute at all propagates as an error.
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_config(global)?;
    let db = open_db(&config, global, &root)?;

    let snapshot = args
        .snapshot_date
        .as_ref()
        .map(|s| parse_date(s).context("Invalid snapshot date"))
        .transpose()?;

    let store = target_dir(&config, &root);
    let result = run_checks(
        db.as_ref(),
        &config,
        &store,
        args.checkpoint.as_deref(),
        snapshot,
    )
    .await?;

    print_result(&result);

    if !result.success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Run a checkpoint: the pre-declared one by name, or a programmatic
/// one bound to `snapshot` when a date is given. Shared with the run
/// command.
pub(crate) async fn run_checks(
    db: &dyn Database,
    config: &Config,
    store: &Path,
    checkpoint_name: Option<&str>,
    snapshot: Option<NaiveDate>,
) -> Result<SuiteResult> {
    let name = match checkpoint_name {
        Some(name) => name.to_string(),
        None => match config.checkpoints.first() {
            Some(spec) => spec.name.clone(),
            None => bail!("No checkpoints declared in config"),
        },
    };

    let runner = CheckpointRunner::new(db, store);
    let result = match snapshot {
        Some(date) => {
            let checkpoint = Checkpoint::from_config(config, &name)?;
            runner
                .run(&Checkpoint::for_snapshot(checkpoint.suite, date))
                .await?
        }
        None => runner.run_named(config, &name).await?,
    };

    Ok(result)
}

/// Print a suite result the way the test runner reports: one line per
/// failure with its bounded sample, then the aggregate.
pub(crate) fn print_result(result: &SuiteResult) {
    println!(
        "\nSuite '{}' ({}): {}/{} expectations succeeded",
        result.suite_name, result.scope, result.succeeded, result.total
    );

    for failure in &result.failures {
        println!(
            "  x {} ({} failing rows)",
            failure.expectation_name, failure.failure_count
        );
        for (i, value) in failure.sample_unexpected_values.iter().enumerate() {
            println!("      {}. {}", i + 1, value);
        }
    }

    if result.success() {
        println!("All expectations passed.");
    } else {
        println!("{} expectation(s) failed.", result.failures.len());
    }
}
