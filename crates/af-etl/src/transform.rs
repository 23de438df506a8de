//! Transformation stage
//!
//! Left-joins target rows onto source rows by id, computes ages under
//! the integer calendar-year rule, and validates the result set before
//! it reaches the loader.

use af_core::age::calculate_age;
use af_core::record::{ResultBatch, ResultRecord, SourceRecord, TargetRecord, RESULT_COLUMNS};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Left-join targets onto sources by id and compute ages.
///
/// Produces exactly one row per target `(snapshot_date, id)` pair.
/// Target ids with no matching source row keep a NULL birth date and a
/// NULL age; they do not fail the transform.
pub fn transform(source: &[SourceRecord], targets: &[TargetRecord]) -> ResultBatch {
    let birth_dates: HashMap<i64, NaiveDate> = source
        .iter()
        .filter_map(|s| s.birth_date.map(|d| (s.id, d)))
        .collect();

    let rows: Vec<ResultRecord> = targets
        .iter()
        .map(|t| {
            let birth_date = birth_dates.get(&t.id).copied();
            ResultRecord {
                snapshot_date: t.snapshot_date,
                id: t.id,
                birth_date,
                age: birth_date.map(|b| calculate_age(b, t.snapshot_date)),
            }
        })
        .collect();

    log::info!("transformation: {} rows transformed", rows.len());
    ResultBatch::new(rows)
}

/// Validate a transformed batch before loading.
///
/// Checks, in order: required columns present (invalid if not), null
/// counts (warning only), negative ages (invalid), ages above 150
/// (warning only). Returns true iff the column check and the
/// negative-age check pass.
pub fn validate_transformed(batch: &ResultBatch) -> bool {
    let missing: Vec<&str> = RESULT_COLUMNS
        .iter()
        .filter(|c| !batch.columns.iter().any(|have| have == *c))
        .copied()
        .collect();
    if !missing.is_empty() {
        log::error!("transformation: missing required columns: {:?}", missing);
        return false;
    }

    let null_birth_dates = batch.rows.iter().filter(|r| r.birth_date.is_none()).count();
    let null_ages = batch.rows.iter().filter(|r| r.age.is_none()).count();
    if null_birth_dates > 0 || null_ages > 0 {
        log::warn!(
            "transformation: null values detected: birth_date={}, age={}",
            null_birth_dates,
            null_ages
        );
    }

    let negative_ages = batch
        .rows
        .iter()
        .filter(|r| r.age.is_some_and(|a| a < 0))
        .count();
    if negative_ages > 0 {
        log::error!("transformation: {} rows with negative age", negative_ages);
        return false;
    }

    let implausible_ages = batch
        .rows
        .iter()
        .filter(|r| r.age.is_some_and(|a| a > 150))
        .count();
    if implausible_ages > 0 {
        log::warn!("transformation: {} rows with age above 150", implausible_ages);
    }

    log::info!("transformation: validation passed for {} rows", batch.len());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn source(id: i64, birth: &str) -> SourceRecord {
        SourceRecord {
            id,
            birth_date: Some(date(birth)),
        }
    }

    fn target(snapshot: &str, id: i64) -> TargetRecord {
        TargetRecord {
            snapshot_date: date(snapshot),
            id,
            age: None,
        }
    }

    #[test]
    fn test_transform_joins_and_computes_age() {
        let sources = vec![source(1, "1990-05-15"), source(2, "1990-06-15")];
        let targets = vec![target("2024-01-15", 1), target("2024-01-15", 2)];

        let batch = transform(&sources, &targets);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.rows[0].age, Some(33));
        assert_eq!(batch.rows[1].age, Some(33)); // birthday not yet reached
        assert_eq!(batch.rows[0].birth_date, Some(date("1990-05-15")));
    }

    #[test]
    fn test_transform_future_birth_date_clamped() {
        let sources = vec![source(1, "2025-01-01")];
        let targets = vec![target("2024-01-15", 1)];

        let batch = transform(&sources, &targets);

        assert_eq!(batch.rows[0].age, Some(0));
    }

    #[test]
    fn test_transform_unmatched_target_keeps_nulls() {
        let sources = vec![source(1, "1990-05-15")];
        let targets = vec![target("2024-01-15", 1), target("2024-01-15", 99)];

        let batch = transform(&sources, &targets);

        assert_eq!(batch.len(), 2);
        let orphan = &batch.rows[1];
        assert_eq!(orphan.id, 99);
        assert_eq!(orphan.birth_date, None);
        assert_eq!(orphan.age, None);
    }

    #[test]
    fn test_transform_one_row_per_target_pair() {
        let sources = vec![source(1, "1990-05-15")];
        let targets = vec![target("2023-12-31", 1), target("2024-01-15", 1)];

        let batch = transform(&sources, &targets);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.rows[0].age, Some(33));
        assert_eq!(batch.rows[1].age, Some(33));
    }

    #[test]
    fn test_validate_accepts_clean_batch() {
        let batch = transform(
            &[source(1, "1990-05-15")],
            &[target("2024-01-15", 1), target("2024-01-15", 2)],
        );
        assert!(validate_transformed(&batch));
    }

    #[test]
    fn test_validate_rejects_negative_age() {
        let mut batch = ResultBatch::new(vec![ResultRecord {
            snapshot_date: date("2024-01-15"),
            id: 1,
            birth_date: Some(date("1990-05-15")),
            age: Some(-1),
        }]);
        assert!(!validate_transformed(&batch));

        // Still invalid when mixed with valid rows
        batch.rows.push(ResultRecord {
            snapshot_date: date("2024-01-15"),
            id: 2,
            birth_date: Some(date("1990-05-15")),
            age: Some(33),
        });
        assert!(!validate_transformed(&batch));
    }

    #[test]
    fn test_validate_rejects_missing_columns() {
        let mut batch = ResultBatch::new(Vec::new());
        batch.columns.retain(|c| c != "age");
        assert!(!validate_transformed(&batch));
    }

    #[test]
    fn test_validate_implausible_age_is_warning_only() {
        let batch = ResultBatch::new(vec![ResultRecord {
            snapshot_date: date("2024-01-15"),
            id: 1,
            birth_date: Some(date("1850-01-01")),
            age: Some(174),
        }]);
        assert!(validate_transformed(&batch));
    }

    #[test]
    fn test_validate_empty_batch_passes() {
        assert!(validate_transformed(&ResultBatch::new(Vec::new())));
    }
}
