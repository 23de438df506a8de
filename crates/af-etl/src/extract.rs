//! Extraction stage
//!
//! Reads source and target rows through the `Database` trait. Dates
//! travel as ISO-8601 text (CAST in SQL) so the backend stays free of
//! calendar types.

use crate::error::{EtlError, EtlResult};
use af_core::config::EtlConfig;
use af_core::record::{SourceRecord, TargetRecord};
use af_core::sql_utils::quote_ident;
use af_db::Database;
use chrono::NaiveDate;

/// Extractor for the source and target relations
pub struct Extractor<'a> {
    db: &'a dyn Database,
    etl: &'a EtlConfig,
}

impl<'a> Extractor<'a> {
    /// Create a new extractor
    pub fn new(db: &'a dyn Database, etl: &'a EtlConfig) -> Self {
        Self { db, etl }
    }

    /// Extract source rows with a known birth date, ordered by id.
    ///
    /// Zero rows is a valid result; the caller decides whether an empty
    /// source means there is nothing to do.
    pub async fn extract_source(&self) -> EtlResult<Vec<SourceRecord>> {
        let sql = format!(
            "SELECT id, CAST(birth_date AS VARCHAR) AS birth_date \
             FROM {} WHERE birth_date IS NOT NULL ORDER BY id",
            quote_ident(&self.etl.source_table)
        );

        let rows = self.db.query_rows(&sql).await.map_err(|e| {
            log::error!(
                "extraction: source query against '{}' failed: {}",
                self.etl.source_table,
                e
            );
            EtlError::Extraction(e.to_string())
        })?;

        let records = rows
            .iter()
            .map(|row| {
                Ok(SourceRecord {
                    id: parse_id(row.first(), "source id")?,
                    birth_date: parse_opt_date(row.get(1), "source birth_date")?,
                })
            })
            .collect::<EtlResult<Vec<_>>>()?;

        log::info!(
            "extraction: {} rows extracted from '{}'",
            records.len(),
            self.etl.source_table
        );
        Ok(records)
    }

    /// Extract target rows, either for a single snapshot or for all of
    /// them, ordered by (snapshot_date, id).
    pub async fn extract_targets(
        &self,
        snapshot: Option<NaiveDate>,
    ) -> EtlResult<Vec<TargetRecord>> {
        let filter = match snapshot {
            Some(date) => format!(" WHERE snapshot_date = DATE '{}'", date),
            None => String::new(),
        };
        let sql = format!(
            "SELECT CAST(snapshot_date AS VARCHAR) AS snapshot_date, id, age \
             FROM {}{} ORDER BY snapshot_date, id",
            quote_ident(&self.etl.target_table),
            filter
        );

        let rows = self.db.query_rows(&sql).await.map_err(|e| {
            log::error!(
                "extraction: target query against '{}' failed: {}",
                self.etl.target_table,
                e
            );
            EtlError::Extraction(e.to_string())
        })?;

        let records = rows
            .iter()
            .map(|row| {
                Ok(TargetRecord {
                    snapshot_date: parse_date(row.first(), "target snapshot_date")?,
                    id: parse_id(row.get(1), "target id")?,
                    age: parse_opt_age(row.get(2))?,
                })
            })
            .collect::<EtlResult<Vec<_>>>()?;

        log::info!(
            "extraction: {} rows extracted from '{}'",
            records.len(),
            self.etl.target_table
        );
        Ok(records)
    }
}

fn parse_id(value: Option<&Option<String>>, what: &str) -> EtlResult<i64> {
    match value.and_then(|v| v.as_deref()) {
        Some(s) => s
            .parse::<i64>()
            .map_err(|_| EtlError::Extraction(format!("{} is not an integer: '{}'", what, s))),
        None => Err(EtlError::Extraction(format!("{} is unexpectedly NULL", what))),
    }
}

fn parse_date(value: Option<&Option<String>>, what: &str) -> EtlResult<NaiveDate> {
    match parse_opt_date(value, what)? {
        Some(date) => Ok(date),
        None => Err(EtlError::Extraction(format!("{} is unexpectedly NULL", what))),
    }
}

fn parse_opt_date(value: Option<&Option<String>>, what: &str) -> EtlResult<Option<NaiveDate>> {
    match value.and_then(|v| v.as_deref()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| EtlError::Extraction(format!("{} is not a date: '{}'", what, s))),
        None => Ok(None),
    }
}

fn parse_opt_age(value: Option<&Option<String>>) -> EtlResult<Option<i32>> {
    match value.and_then(|v| v.as_deref()) {
        Some(s) => s
            .parse::<i32>()
            .map(Some)
            .map_err(|_| EtlError::Extraction(format!("target age is not an integer: '{}'", s))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_db::DuckDbBackend;

    fn etl_config() -> EtlConfig {
        EtlConfig::default()
    }

    async fn seeded_db() -> DuckDbBackend {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE source_table (id INTEGER, birth_date DATE); \
             CREATE TABLE target_table (snapshot_date DATE, id INTEGER, age INTEGER); \
             INSERT INTO source_table VALUES \
               (2, DATE '1985-12-03'), (1, DATE '1990-05-15'), (3, NULL); \
             INSERT INTO target_table VALUES \
               (DATE '2024-01-15', 1, NULL), (DATE '2024-01-15', 2, NULL), \
               (DATE '2023-12-31', 1, NULL);",
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_extract_source_filters_nulls_and_orders() {
        let db = seeded_db().await;
        let etl = etl_config();
        let extractor = Extractor::new(&db, &etl);

        let rows = extractor.extract_source().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(
            rows[0].birth_date,
            Some(NaiveDate::from_ymd_opt(1990, 5, 15).unwrap())
        );
        assert_eq!(rows[1].id, 2);
    }

    #[tokio::test]
    async fn test_extract_targets_all_snapshots() {
        let db = seeded_db().await;
        let etl = etl_config();
        let extractor = Extractor::new(&db, &etl);

        let rows = extractor.extract_targets(None).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].snapshot_date,
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
        assert!(rows.iter().all(|r| r.age.is_none()));
    }

    #[tokio::test]
    async fn test_extract_targets_single_snapshot() {
        let db = seeded_db().await;
        let etl = etl_config();
        let extractor = Extractor::new(&db, &etl);

        let snapshot = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let rows = extractor.extract_targets(Some(snapshot)).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.snapshot_date == snapshot));
    }

    #[tokio::test]
    async fn test_extract_source_empty_is_ok() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE source_table (id INTEGER, birth_date DATE)")
            .await
            .unwrap();
        let etl = etl_config();
        let extractor = Extractor::new(&db, &etl);

        let rows = extractor.extract_source().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_extract_missing_table_is_error() {
        let db = DuckDbBackend::in_memory().unwrap();
        let etl = etl_config();
        let extractor = Extractor::new(&db, &etl);

        let err = extractor.extract_source().await.unwrap_err();
        assert!(matches!(err, EtlError::Extraction(_)));
    }
}
