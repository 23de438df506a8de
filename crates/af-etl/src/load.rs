//! Load stage and schema management
//!
//! Inserts transformed batches into the results relation as one
//! transaction, and owns the idempotent schema-creation and
//! sample-seeding operations used by `ageflow setup`.

use crate::error::{EtlError, EtlResult};
use af_core::config::EtlConfig;
use af_core::record::ResultBatch;
use af_core::sql_utils::{escape_sql_string, quote_ident};
use af_db::{Database, SqlValue};
use chrono::NaiveDate;

/// Sample source rows seeded by `ageflow setup`. Fixed ids keep the
/// conflict-ignore insert idempotent across repeated runs.
const SAMPLE_ROWS: [(i64, &str); 5] = [
    (1, "1990-05-15"),
    (2, "1985-12-03"),
    (3, "2000-08-22"),
    (4, "1975-03-10"),
    (5, "1995-11-28"),
];

/// Loader for the results relation
pub struct Loader<'a> {
    db: &'a dyn Database,
    etl: &'a EtlConfig,
}

impl<'a> Loader<'a> {
    /// Create a new loader
    pub fn new(db: &'a dyn Database, etl: &'a EtlConfig) -> Self {
        Self { db, etl }
    }

    /// Insert every row of the batch into the results relation.
    ///
    /// The whole batch is one transaction: all rows land or none do. A
    /// duplicate `(snapshot_date, id)` fails on the relation's primary
    /// key instead of silently upserting. An empty batch is a logged
    /// no-op, not an error.
    pub async fn load(&self, batch: &ResultBatch) -> EtlResult<usize> {
        if batch.is_empty() {
            log::info!("load: empty batch, nothing to insert");
            return Ok(0);
        }

        let sql = format!(
            "INSERT INTO {} (snapshot_date, id, birth_date, age) \
             VALUES (CAST(? AS DATE), ?, CAST(? AS DATE), ?)",
            quote_ident(&self.etl.results_table)
        );

        let rows: Vec<Vec<SqlValue>> = batch
            .rows
            .iter()
            .map(|r| {
                vec![
                    SqlValue::Text(r.snapshot_date.to_string()),
                    SqlValue::Int(r.id),
                    r.birth_date
                        .map(|d| SqlValue::Text(d.to_string()))
                        .unwrap_or(SqlValue::Null),
                    r.age.map(|a| SqlValue::Int(a as i64)).unwrap_or(SqlValue::Null),
                ]
            })
            .collect();

        let inserted = self.db.insert_rows(&sql, &rows).await.map_err(|e| {
            log::error!(
                "load: insert into '{}' failed: {}",
                self.etl.results_table,
                e
            );
            EtlError::Load(e.to_string())
        })?;

        log::info!(
            "load: {} rows inserted into '{}'",
            inserted,
            self.etl.results_table
        );
        Ok(inserted)
    }

    /// Create the source, target, and results relations if absent.
    ///
    /// Safe to call repeatedly.
    pub async fn create_schema(&self) -> EtlResult<()> {
        let seq_name = format!("{}_id_seq", self.etl.source_table);
        let ddl = format!(
            "CREATE SEQUENCE IF NOT EXISTS {seq_ident} START 1;\n\
             CREATE TABLE IF NOT EXISTS {source} (\n\
                 id INTEGER PRIMARY KEY DEFAULT nextval('{seq_literal}'),\n\
                 birth_date DATE\n\
             );\n\
             CREATE TABLE IF NOT EXISTS {target} (\n\
                 snapshot_date DATE NOT NULL,\n\
                 id INTEGER NOT NULL,\n\
                 age INTEGER,\n\
                 PRIMARY KEY (snapshot_date, id)\n\
             );\n\
             CREATE TABLE IF NOT EXISTS {results} (\n\
                 snapshot_date DATE NOT NULL,\n\
                 id INTEGER NOT NULL,\n\
                 birth_date DATE,\n\
                 age INTEGER,\n\
                 PRIMARY KEY (snapshot_date, id)\n\
             );",
            seq_ident = quote_ident(&seq_name),
            seq_literal = escape_sql_string(&seq_name),
            source = quote_ident(&self.etl.source_table),
            target = quote_ident(&self.etl.target_table),
            results = quote_ident(&self.etl.results_table),
        );

        self.db.execute_batch(&ddl).await.map_err(|e| {
            log::error!("load: schema creation failed: {}", e);
            EtlError::Load(e.to_string())
        })?;

        log::info!(
            "load: schema ready ('{}', '{}', '{}')",
            self.etl.source_table,
            self.etl.target_table,
            self.etl.results_table
        );
        Ok(())
    }

    /// Seed sample source rows and matching target placeholders for
    /// `snapshot`. Conflict-ignore inserts make re-seeding a no-op.
    pub async fn seed_sample_data(&self, snapshot: NaiveDate) -> EtlResult<usize> {
        let source_sql = format!(
            "INSERT INTO {} (id, birth_date) VALUES (?, CAST(? AS DATE)) \
             ON CONFLICT DO NOTHING",
            quote_ident(&self.etl.source_table)
        );
        let source_rows: Vec<Vec<SqlValue>> = SAMPLE_ROWS
            .iter()
            .map(|(id, birth)| vec![SqlValue::Int(*id), SqlValue::Text(birth.to_string())])
            .collect();

        let target_sql = format!(
            "INSERT INTO {} (snapshot_date, id, age) VALUES (CAST(? AS DATE), ?, NULL) \
             ON CONFLICT DO NOTHING",
            quote_ident(&self.etl.target_table)
        );
        let target_rows: Vec<Vec<SqlValue>> = SAMPLE_ROWS
            .iter()
            .map(|(id, _)| vec![SqlValue::Text(snapshot.to_string()), SqlValue::Int(*id)])
            .collect();

        let mut seeded = 0;
        for (sql, rows, table) in [
            (&source_sql, &source_rows, &self.etl.source_table),
            (&target_sql, &target_rows, &self.etl.target_table),
        ] {
            seeded += self.db.insert_rows(sql, rows).await.map_err(|e| {
                log::error!("load: seeding '{}' failed: {}", table, e);
                EtlError::Load(e.to_string())
            })?;
        }

        log::info!("load: {} sample rows seeded", seeded);
        Ok(seeded)
    }
}
