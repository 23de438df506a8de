//! Expectation suite definitions
//!
//! Declarative data-quality predicates bound to a relation. Suites are
//! declared in `ageflow.yml` and compiled to failing-rows SQL by
//! af-checks.

use serde::{Deserialize, Serialize};

/// Kind of a single expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectationKind {
    /// No NULL values in the column
    NotNull,

    /// No duplicate values in the column (within the checkpoint scope)
    Unique,

    /// No values below zero
    NonNegative,

    /// No values above the threshold
    MaxValue { value: f64 },

    /// All values within the inclusive range
    Between { min: f64, max: f64 },

    /// All non-null values castable to a calendar date
    ValidDate,
}

impl std::fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            ExpectationKind::NotNull => "not_null",
            ExpectationKind::Unique => "unique",
            ExpectationKind::NonNegative => "non_negative",
            ExpectationKind::MaxValue { .. } => "max_value",
            ExpectationKind::Between { .. } => "between",
            ExpectationKind::ValidDate => "valid_date",
        };
        write!(f, "{}", token)
    }
}

/// A single expectation over one column of a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Column name to check
    pub column: String,

    /// Predicate applied to the column
    #[serde(flatten)]
    pub kind: ExpectationKind,
}

impl Expectation {
    /// Identifying name, e.g. `non_negative_target_results__age`.
    pub fn name(&self, table: &str) -> String {
        format!("{}_{}__{}", self.kind, table, self.column)
    }
}

/// A named set of expectations bound to a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name, referenced by checkpoints
    pub name: String,

    /// Relation the expectations run against
    pub table: String,

    /// Expectations, executed in declaration order
    #[serde(default)]
    pub expectations: Vec<Expectation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectation_name() {
        let exp = Expectation {
            column: "age".to_string(),
            kind: ExpectationKind::NonNegative,
        };
        assert_eq!(exp.name("target_results"), "non_negative_target_results__age");
    }

    #[test]
    fn test_parse_suite_yaml() {
        let yaml = r#"
name: target_results_suite
table: target_results
expectations:
  - column: id
    kind: not_null
  - column: age
    kind: max_value
    value: 150
  - column: age
    kind: between
    min: 0
    max: 150
  - column: birth_date
    kind: valid_date
"#;
        let suite: Suite = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(suite.name, "target_results_suite");
        assert_eq!(suite.expectations.len(), 4);
        assert_eq!(suite.expectations[0].kind, ExpectationKind::NotNull);
        assert_eq!(
            suite.expectations[1].kind,
            ExpectationKind::MaxValue { value: 150.0 }
        );
        assert_eq!(
            suite.expectations[2].kind,
            ExpectationKind::Between {
                min: 0.0,
                max: 150.0
            }
        );
    }

    #[test]
    fn test_parse_suite_unknown_kind_rejected() {
        let yaml = r#"
name: s
table: t
expectations:
  - column: id
    kind: sometimes_null
"#;
        assert!(serde_yaml::from_str::<Suite>(yaml).is_err());
    }
}
