//! Data-docs site generation
//!
//! Renders the stored validation results into a static HTML site: an
//! index summarizing every suite's latest run, plus one page per
//! stored run. Regenerated in full after each validation run.

use crate::error::CheckResult;
use crate::runner::SuiteResult;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What the generator produced
#[derive(Debug, Clone)]
pub struct DocsSummary {
    /// Distinct suites with at least one stored run
    pub suites: usize,

    /// Stored runs rendered
    pub runs: usize,

    /// Path of the generated index page
    pub index_path: PathBuf,
}

/// Rebuild the data-docs site under `target_dir/docs` from the results
/// stored under `target_dir/validations`.
pub fn build_data_docs(target_dir: &Path) -> CheckResult<DocsSummary> {
    let results = load_results(&target_dir.join("validations"));

    // Latest run per suite, suites ordered by name
    let mut latest: BTreeMap<&str, &SuiteResult> = BTreeMap::new();
    for result in &results {
        let entry = latest.entry(result.suite_name.as_str()).or_insert(result);
        if result.executed_at > entry.executed_at {
            *entry = result;
        }
    }

    let site_dir = target_dir.join("docs");
    std::fs::create_dir_all(&site_dir)?;

    for result in &results {
        let page = render_run_page(result);
        std::fs::write(site_dir.join(run_page_name(result)), page)?;
    }

    let index_path = site_dir.join("index.html");
    std::fs::write(&index_path, render_index(&latest, &results))?;

    Ok(DocsSummary {
        suites: latest.len(),
        runs: results.len(),
        index_path,
    })
}

/// Read every stored suite result, skipping files that don't parse.
fn load_results(validations_dir: &Path) -> Vec<SuiteResult> {
    let entries = match std::fs::read_dir(validations_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(), // nothing stored yet
    };

    let mut results = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if !name.ends_with(".json") || name.ends_with(".params.json") {
            continue;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("docs: cannot read {}: {}", path.display(), e);
                continue;
            }
        };
        match serde_json::from_str::<SuiteResult>(&content) {
            Ok(result) => results.push(result),
            Err(e) => log::warn!("docs: skipping {}: {}", path.display(), e),
        }
    }

    results.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
    results
}

fn run_page_name(result: &SuiteResult) -> String {
    format!("run-{}.html", result.run_name)
}

fn status_label(result: &SuiteResult) -> &'static str {
    if result.success() {
        "PASSED"
    } else {
        "FAILED"
    }
}

fn render_index(latest: &BTreeMap<&str, &SuiteResult>, all: &[SuiteResult]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Ageflow Data Docs</title>\n");
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n<h1>Ageflow Data Docs</h1>\n");

    if latest.is_empty() {
        html.push_str("<p>No validation runs stored yet.</p>\n");
    } else {
        html.push_str("<h2>Expectation suites</h2>\n<table>\n");
        html.push_str(
            "<tr><th>Suite</th><th>Latest run</th><th>Executed</th>\
             <th>Succeeded</th><th>Status</th></tr>\n",
        );
        for result in latest.values() {
            html.push_str(&format!(
                "<tr><td>{}</td><td><a href=\"{}\">{}</a></td><td>{}</td>\
                 <td>{}/{}</td><td class=\"{}\">{}</td></tr>\n",
                html_escape(&result.suite_name),
                html_escape(&run_page_name(result)),
                html_escape(&result.run_name),
                result.executed_at.format("%Y-%m-%d %H:%M:%S UTC"),
                result.succeeded,
                result.total,
                status_label(result).to_lowercase(),
                status_label(result),
            ));
        }
        html.push_str("</table>\n");

        html.push_str("<h2>Run history</h2>\n<ul>\n");
        for result in all {
            html.push_str(&format!(
                "<li><a href=\"{}\">{}</a> — {} ({}/{})</li>\n",
                html_escape(&run_page_name(result)),
                html_escape(&result.run_name),
                status_label(result),
                result.succeeded,
                result.total,
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_run_page(result: &SuiteResult) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n",
        html_escape(&result.run_name)
    ));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<h1>Suite: {}</h1>\n<p>Checkpoint <code>{}</code>, scope <code>{}</code>, \
         executed {}.</p>\n<p class=\"{}\">{}: {}/{} expectations succeeded</p>\n",
        html_escape(&result.suite_name),
        html_escape(&result.checkpoint_name),
        html_escape(&result.scope),
        result.executed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        status_label(result).to_lowercase(),
        status_label(result),
        result.succeeded,
        result.total,
    ));

    if !result.failures.is_empty() {
        html.push_str("<h2>Failed expectations</h2>\n<table>\n");
        html.push_str("<tr><th>Expectation</th><th>Failing rows</th><th>Sample values</th></tr>\n");
        for failure in &result.failures {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                html_escape(&failure.expectation_name),
                failure.failure_count,
                html_escape(&failure.sample_unexpected_values.join("; ")),
            ));
        }
        html.push_str("</table>\n");
    }

    html.push_str("<p><a href=\"index.html\">Back to index</a></p>\n</body>\n</html>\n");
    html
}

const STYLE: &str = "<style>\n\
body { font-family: sans-serif; margin: 2em; }\n\
table { border-collapse: collapse; }\n\
th, td { border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: left; }\n\
.passed { color: #2e7d32; }\n\
.failed { color: #c62828; }\n\
</style>\n";

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ExpectationFailure;
    use chrono::{TimeZone, Utc};

    fn stored_result(
        dir: &Path,
        suite: &str,
        run: &str,
        hour: u32,
        failures: Vec<ExpectationFailure>,
    ) {
        let total = 2;
        let result = SuiteResult {
            suite_name: suite.to_string(),
            checkpoint_name: format!("{}_checkpoint", suite),
            run_name: run.to_string(),
            executed_at: Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap(),
            scope: "latest".to_string(),
            total,
            succeeded: total - failures.len(),
            failures,
        };
        let validations = dir.join("validations");
        std::fs::create_dir_all(&validations).unwrap();
        std::fs::write(
            validations.join(format!("{}.json", run)),
            serde_json::to_string_pretty(&result).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_build_docs_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let summary = build_data_docs(dir.path()).unwrap();

        assert_eq!(summary.suites, 0);
        assert_eq!(summary.runs, 0);
        let index = std::fs::read_to_string(&summary.index_path).unwrap();
        assert!(index.contains("No validation runs stored yet"));
    }

    #[test]
    fn test_build_docs_renders_latest_per_suite() {
        let dir = tempfile::tempdir().unwrap();
        stored_result(dir.path(), "suite_a", "run-old", 8, Vec::new());
        stored_result(
            dir.path(),
            "suite_a",
            "run-new",
            12,
            vec![ExpectationFailure {
                expectation_name: "non_negative_t__age".to_string(),
                failure_count: 3,
                sample_unexpected_values: vec!["-1".to_string()],
            }],
        );

        let summary = build_data_docs(dir.path()).unwrap();
        assert_eq!(summary.suites, 1);
        assert_eq!(summary.runs, 2);

        let index = std::fs::read_to_string(&summary.index_path).unwrap();
        // Latest run (failed) wins the suite table
        assert!(index.contains("run-new"));
        assert!(index.contains("FAILED"));
        assert!(index.contains("1/2"));

        let run_page =
            std::fs::read_to_string(dir.path().join("docs").join("run-run-new.html")).unwrap();
        assert!(run_page.contains("non_negative_t__age"));
        assert!(run_page.contains("-1"));
    }

    #[test]
    fn test_unparseable_result_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let validations = dir.path().join("validations");
        std::fs::create_dir_all(&validations).unwrap();
        std::fs::write(validations.join("broken.json"), "{not json").unwrap();
        stored_result(dir.path(), "suite_a", "run-ok", 9, Vec::new());

        let summary = build_data_docs(dir.path()).unwrap();
        assert_eq!(summary.runs, 1);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
