//! Expectation SQL generation
//!
//! Each expectation compiles to a query returning its failing rows;
//! zero rows means the expectation passes.

use crate::checkpoint::BatchScope;
use af_core::sql_utils::quote_ident;
use af_core::suite::{Expectation, ExpectationKind};

/// Relation expression the expectation queries run against: the bare
/// table, or a scoped subselect.
fn scoped_relation(table: &str, scope: &BatchScope) -> String {
    let qt = quote_ident(table);
    match scope.filter_sql(table) {
        None => qt,
        Some(filter) => format!("(SELECT * FROM {} WHERE {}) AS batch", qt, filter),
    }
}

/// Generate SQL for a not_null expectation
///
/// Returns rows where the column is NULL.
pub fn generate_not_null_sql(relation: &str, column: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} IS NULL",
        relation,
        quote_ident(column)
    )
}

/// Generate SQL for a unique expectation
///
/// Returns values that appear more than once.
pub fn generate_unique_sql(relation: &str, column: &str) -> String {
    let qc = quote_ident(column);
    format!("SELECT {qc}, COUNT(*) as cnt\nFROM {relation}\nGROUP BY {qc}\nHAVING COUNT(*) > 1")
}

/// Generate SQL for a non_negative expectation
///
/// Returns rows where the column value is < 0.
pub fn generate_non_negative_sql(relation: &str, column: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} < 0",
        relation,
        quote_ident(column)
    )
}

/// Generate SQL for a max_value expectation
///
/// Returns rows where the column value is greater than the threshold.
pub fn generate_max_value_sql(relation: &str, column: &str, max: f64) -> String {
    if !max.is_finite() {
        // Yield one row so the expectation FAILS instead of silently passing
        return format!(
            "SELECT 'ERROR: max_value threshold must be finite, got {}' AS error",
            max
        );
    }
    format!(
        "SELECT * FROM {} WHERE {} > {}",
        relation,
        quote_ident(column),
        max
    )
}

/// Generate SQL for a between expectation
///
/// Returns rows where the column value is outside the inclusive range.
pub fn generate_between_sql(relation: &str, column: &str, min: f64, max: f64) -> String {
    if !min.is_finite() || !max.is_finite() {
        return format!(
            "SELECT 'ERROR: between bounds must be finite, got {}..{}' AS error",
            min, max
        );
    }
    let qc = quote_ident(column);
    format!("SELECT * FROM {relation} WHERE {qc} < {min} OR {qc} > {max}")
}

/// Generate SQL for a valid_date expectation
///
/// Returns non-null rows that do not cast to a calendar date.
pub fn generate_valid_date_sql(relation: &str, column: &str) -> String {
    let qc = quote_ident(column);
    format!(
        "SELECT * FROM {relation} WHERE {qc} IS NOT NULL \
         AND TRY_CAST(CAST({qc} AS VARCHAR) AS DATE) IS NULL"
    )
}

/// Expectation SQL with metadata
#[derive(Debug, Clone)]
pub struct GeneratedExpectation {
    /// Identifying expectation name
    pub name: String,

    /// Column being checked
    pub column: String,

    /// Generated failing-rows SQL
    pub sql: String,
}

impl GeneratedExpectation {
    /// Compile an expectation against a table and scope.
    pub fn from_expectation(
        expectation: &Expectation,
        table: &str,
        scope: &BatchScope,
    ) -> Self {
        let relation = scoped_relation(table, scope);
        let column = expectation.column.as_str();
        let sql = match &expectation.kind {
            ExpectationKind::NotNull => generate_not_null_sql(&relation, column),
            ExpectationKind::Unique => generate_unique_sql(&relation, column),
            ExpectationKind::NonNegative => generate_non_negative_sql(&relation, column),
            ExpectationKind::MaxValue { value } => {
                generate_max_value_sql(&relation, column, *value)
            }
            ExpectationKind::Between { min, max } => {
                generate_between_sql(&relation, column, *min, *max)
            }
            ExpectationKind::ValidDate => generate_valid_date_sql(&relation, column),
        };

        Self {
            name: expectation.name(table),
            column: expectation.column.clone(),
            sql,
        }
    }
}
