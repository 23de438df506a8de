//! Setup command implementation

use anyhow::Result;
use af_etl::Pipeline;

use crate::cli::{GlobalArgs, SetupArgs};
use crate::commands::common::{load_config, open_db, resolve_snapshot, today};

/// Execute the setup command: create the schema and seed sample data.
pub async fn execute(args: &SetupArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_config(global)?;
    let db = open_db(&config, global, &root)?;

    let snapshot = resolve_snapshot(&args.snapshot_date, &config)?.unwrap_or_else(today);

    println!("Setting up database for snapshot {}...", snapshot);

    let pipeline = Pipeline::new(db, config.etl.clone());
    pipeline.setup(snapshot).await?;

    println!("Schema created and sample data seeded.");
    Ok(())
}
