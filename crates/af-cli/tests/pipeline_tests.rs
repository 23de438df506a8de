//! Integration tests for the full Ageflow pipeline

use af_checks::{build_data_docs, Checkpoint, CheckpointRunner};
use af_core::age::parse_date;
use af_core::config::Config;
use af_db::{Database, DuckDbBackend};
use af_etl::{EtlError, EtlOutcome, Pipeline};
use std::path::Path;
use std::sync::Arc;

fn load_fixture_config() -> Config {
    Config::load(Path::new("tests/fixtures/demo_project/ageflow.yml")).unwrap()
}

/// Test loading the demo project config
#[test]
fn test_load_demo_project_config() {
    let config = load_fixture_config();

    assert_eq!(config.name, "demo_project");
    assert_eq!(config.etl.source_table, "source_people");
    assert_eq!(config.etl.results_table, "people_results");
    assert_eq!(config.etl.snapshot_date.as_deref(), Some("2024-01-15"));
    assert_eq!(config.suites.len(), 1);
    assert_eq!(config.suites[0].expectations.len(), 5);
    assert!(config.checkpoint("people_results_checkpoint").is_some());
}

/// Setup, ETL, and a pre-declared checkpoint against one shared
/// in-memory database
#[tokio::test]
async fn test_full_pipeline_end_to_end() {
    let config = load_fixture_config();
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let snapshot = parse_date(config.etl.snapshot_date.as_deref().unwrap()).unwrap();

    let pipeline = Pipeline::new(db.clone(), config.etl.clone());
    pipeline.setup(snapshot).await.unwrap();

    let outcome = pipeline.run(Some(snapshot)).await.unwrap();
    match outcome {
        EtlOutcome::Completed(stats) => {
            assert_eq!(stats.source_rows, 5);
            assert_eq!(stats.loaded, 5);
        }
        EtlOutcome::NothingToDo => panic!("expected a completed run"),
    }

    // Ages at 2024-01-15 for the seeded birth dates
    let rows = db
        .query_rows("SELECT id, age FROM people_results ORDER BY id")
        .await
        .unwrap();
    let ages: Vec<(String, String)> = rows
        .into_iter()
        .map(|r| (r[0].clone().unwrap(), r[1].clone().unwrap()))
        .collect();
    assert_eq!(
        ages,
        vec![
            ("1".to_string(), "33".to_string()),
            ("2".to_string(), "38".to_string()),
            ("3".to_string(), "23".to_string()),
            ("4".to_string(), "48".to_string()),
            ("5".to_string(), "28".to_string()),
        ]
    );

    // Data-quality checks against the loaded snapshot
    let store = tempfile::tempdir().unwrap();
    let runner = CheckpointRunner::new(db.as_ref(), store.path());
    let result = runner
        .run_named(&config, "people_results_checkpoint")
        .await
        .unwrap();

    assert!(result.success());
    assert_eq!(result.total, 5);
    assert_eq!(result.succeeded, 5);

    // Actions stored the result and refreshed the docs site
    assert!(store.path().join("docs").join("index.html").exists());
    let summary = build_data_docs(store.path()).unwrap();
    assert_eq!(summary.suites, 1);
    assert_eq!(summary.runs, 1);
}

/// Programmatic and pre-declared checkpoints agree on clean data
#[tokio::test]
async fn test_programmatic_checkpoint_matches_named() {
    let config = load_fixture_config();
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let snapshot = parse_date("2024-01-15").unwrap();

    let pipeline = Pipeline::new(db.clone(), config.etl.clone());
    pipeline.setup(snapshot).await.unwrap();
    pipeline.run(Some(snapshot)).await.unwrap();

    let store = tempfile::tempdir().unwrap();
    let runner = CheckpointRunner::new(db.as_ref(), store.path());

    let named = runner
        .run_named(&config, "people_results_checkpoint")
        .await
        .unwrap();

    let suite = config.suite("people_results_suite").unwrap().clone();
    let programmatic = runner
        .run(&Checkpoint::for_snapshot(suite, snapshot))
        .await
        .unwrap();

    assert!(named.success());
    assert!(programmatic.success());
    assert_eq!(named.total, programmatic.total);
}

/// Re-running an already-loaded batch fails on the results primary key
#[tokio::test]
async fn test_rerun_rejected_by_uniqueness_constraint() {
    let config = load_fixture_config();
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let snapshot = parse_date("2024-01-15").unwrap();

    let pipeline = Pipeline::new(db.clone(), config.etl.clone());
    pipeline.setup(snapshot).await.unwrap();
    pipeline.run(Some(snapshot)).await.unwrap();

    let err = pipeline.run(Some(snapshot)).await.unwrap_err();
    assert!(matches!(err, EtlError::Load(_)));

    // The failed batch must not have partially landed
    assert_eq!(
        db.query_count("SELECT * FROM people_results").await.unwrap(),
        5
    );
}

/// Checks find planted bad rows and report bounded samples
#[tokio::test]
async fn test_checks_catch_bad_rows() {
    let config = load_fixture_config();
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let snapshot = parse_date("2024-01-15").unwrap();

    let pipeline = Pipeline::new(db.clone(), config.etl.clone());
    pipeline.setup(snapshot).await.unwrap();
    pipeline.run(Some(snapshot)).await.unwrap();

    // Plant age violations in the validated snapshot (ids stay unique:
    // the relation's primary key already guarantees that)
    db.execute_batch(
        "UPDATE people_results SET age = -1 WHERE id = 3; \
         UPDATE people_results SET age = 200 WHERE id = 4;",
    )
    .await
    .unwrap();

    let store = tempfile::tempdir().unwrap();
    let runner = CheckpointRunner::new(db.as_ref(), store.path());
    let result = runner
        .run_named(&config, "people_results_checkpoint")
        .await
        .unwrap();

    assert!(!result.success());
    assert_eq!(result.succeeded, 3);
    let failed: Vec<&str> = result
        .failures
        .iter()
        .map(|f| f.expectation_name.as_str())
        .collect();
    assert!(failed.contains(&"non_negative_people_results__age"));
    assert!(failed.contains(&"max_value_people_results__age"));
    for failure in &result.failures {
        assert!(failure.failure_count > 0);
        assert!(failure.sample_unexpected_values.len() <= 5);
    }

    // The stored result round-trips and the docs reflect the failure
    let summary = build_data_docs(store.path()).unwrap();
    assert_eq!(summary.suites, 1);
    let index = std::fs::read_to_string(&summary.index_path).unwrap();
    assert!(index.contains("FAILED"));
}
