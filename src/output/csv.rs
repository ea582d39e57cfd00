//! CSV report export

use crate::output::traits::{sorted_entries, ReportWriter};
use crate::state::ResultSnapshot;
use crate::OutputResult;
use std::path::Path;

/// Writes `URL,Status` rows sorted by URL
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReport;

impl ReportWriter for CsvReport {
    fn name(&self) -> &'static str {
        "CSV"
    }

    fn render(&self, results: &ResultSnapshot) -> OutputResult<String> {
        let mut out = String::from("URL,Status\n");
        for (url, outcome) in sorted_entries(results) {
            out.push_str(&escape_field(url.as_str()));
            out.push(',');
            out.push_str(&outcome.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}

/// Exports `results` as CSV to `path`
///
/// # Example
///
/// ```no_run
/// use link_auditor::output::export_csv;
/// use link_auditor::url::normalize_url;
/// use link_auditor::Outcome;
/// use std::collections::HashMap;
/// use std::path::Path;
///
/// let mut results = HashMap::new();
/// results.insert(normalize_url("https://example.com/"), Outcome::Status(200));
/// export_csv(&results, Path::new("internal_links_report.csv")).unwrap();
/// ```
pub fn export_csv(results: &ResultSnapshot, path: &Path) -> OutputResult<()> {
    CsvReport.write(results, path)
}

/// Quotes a field if it contains a separator, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
