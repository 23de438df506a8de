//! Shared helpers for command implementations

use crate::cli::GlobalArgs;
use af_core::age::parse_date;
use af_core::config::Config;
use af_db::{Database, DuckDbBackend};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load the project config, honoring the `--config` override.
pub fn load_config(global: &GlobalArgs) -> Result<(Config, PathBuf)> {
    let root = PathBuf::from(&global.project_dir);
    let config_path = match &global.config {
        Some(path) => PathBuf::from(path),
        None => root.join("ageflow.yml"),
    };
    let config = Config::load(&config_path).context("Failed to load project config")?;
    Ok((config, root))
}

/// Open the database, honoring the `--database` override. Relative
/// file paths resolve against the project root.
pub fn open_db(config: &Config, global: &GlobalArgs, root: &Path) -> Result<Arc<dyn Database>> {
    let db_path = global
        .database
        .clone()
        .unwrap_or_else(|| config.database.path.clone());

    let resolved = if db_path == ":memory:" || Path::new(&db_path).is_absolute() {
        db_path
    } else {
        root.join(&db_path).to_string_lossy().into_owned()
    };

    if resolved != ":memory:" {
        if let Some(parent) = Path::new(&resolved).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let db = DuckDbBackend::new(&resolved).context("Failed to connect to database")?;
    if global.verbose {
        eprintln!("[verbose] Connected to {} database at {}", db.db_type(), resolved);
    }
    Ok(Arc::new(db))
}

/// Directory holding stored validation results and the docs site.
pub fn target_dir(config: &Config, root: &Path) -> PathBuf {
    root.join(&config.target_path)
}

/// Resolve the effective snapshot date: CLI argument first, then the
/// config override. `None` means no fixed snapshot.
pub fn resolve_snapshot(arg: &Option<String>, config: &Config) -> Result<Option<NaiveDate>> {
    let value = arg.as_ref().or(config.etl.snapshot_date.as_ref());
    match value {
        Some(s) => {
            let date = parse_date(s).context("Invalid snapshot date")?;
            Ok(Some(date))
        }
        None => Ok(None),
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
