//! Record types flowing through the pipeline

use chrono::NaiveDate;

/// Column header of a transformed result set, in insertion order.
pub const RESULT_COLUMNS: [&str; 4] = ["snapshot_date", "id", "birth_date", "age"];

/// A row of the source relation. External input, read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// Unique entity identifier
    pub id: i64,

    /// Birth date; nullable in the relation
    pub birth_date: Option<NaiveDate>,
}

/// A row of the target relation: a `(snapshot_date, id)` pair awaiting
/// enrichment. The `age` column is a placeholder and is ignored by the
/// transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRecord {
    pub snapshot_date: NaiveDate,
    pub id: i64,
    pub age: Option<i32>,
}

/// An enriched row destined for the results relation. Produced fresh
/// each run and only ever inserted, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub snapshot_date: NaiveDate,
    pub id: i64,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i32>,
}

/// A transformed dataset together with its column header.
///
/// Carrying the header lets `validate_transformed` check for required
/// columns instead of trusting the producer.
#[derive(Debug, Clone)]
pub struct ResultBatch {
    pub columns: Vec<String>,
    pub rows: Vec<ResultRecord>,
}

impl ResultBatch {
    /// Create a batch with the canonical result columns.
    pub fn new(rows: Vec<ResultRecord>) -> Self {
        Self {
            columns: RESULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
