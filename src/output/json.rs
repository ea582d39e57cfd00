//! JSON report export

use crate::output::traits::{sorted_entries, ReportWriter};
use crate::state::{Outcome, ResultSnapshot};
use crate::OutputResult;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

/// Writes a `{ url: status }` object, keys sorted, four-space indent
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

impl ReportWriter for JsonReport {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn render(&self, results: &ResultSnapshot) -> OutputResult<String> {
        let ordered: BTreeMap<&str, &Outcome> = sorted_entries(results)
            .into_iter()
            .map(|(url, outcome)| (url.as_str(), outcome))
            .collect();

        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        ordered.serialize(&mut serializer)?;
        buffer.push(b'\n');

        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Exports `results` as pretty-printed JSON to `path`
pub fn export_json(results: &ResultSnapshot, path: &Path) -> OutputResult<()> {
    JsonReport.write(results, path)
}
