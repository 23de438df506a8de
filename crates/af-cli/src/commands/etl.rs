//! Etl command implementation

use anyhow::Result;
use af_etl::{EtlOutcome, Pipeline};

use crate::cli::{EtlArgs, GlobalArgs};
use crate::commands::common::{load_config, open_db, resolve_snapshot};

/// Execute the etl command: extract, transform, validate, load.
pub async fn execute(args: &EtlArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_config(global)?;
    let db = open_db(&config, global, &root)?;

    let snapshot = resolve_snapshot(&args.snapshot_date, &config)?;
    match snapshot {
        Some(date) => println!("Running ETL for snapshot {}...", date),
        None => println!("Running ETL for all snapshots..."),
    }

    let pipeline = Pipeline::new(db, config.etl.clone());
    match pipeline.run(snapshot).await? {
        EtlOutcome::Completed(stats) => {
            println!(
                "ETL completed: {} source rows, {} target rows, {} loaded into '{}'.",
                stats.source_rows, stats.target_rows, stats.loaded, config.etl.results_table
            );
        }
        EtlOutcome::NothingToDo => {
            println!("Nothing to do: source relation is empty.");
        }
    }

    Ok(())
}
