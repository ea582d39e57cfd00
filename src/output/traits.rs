//! Report writer trait
//!
//! Each on-disk report format implements [`ReportWriter`]; the CLI runs every
//! configured writer over the same result snapshot.

use crate::state::{Outcome, ResultSnapshot};
use crate::url::NormalizedUrl;
use crate::OutputResult;
use std::path::Path;

/// A report format that can be written from a result snapshot
pub trait ReportWriter {
    /// Short format name used in log messages
    fn name(&self) -> &'static str;

    /// Renders `results` into the format's text representation
    fn render(&self, results: &ResultSnapshot) -> OutputResult<String>;

    /// Renders `results` and writes them to `path`, replacing any existing file
    fn write(&self, results: &ResultSnapshot, path: &Path) -> OutputResult<()> {
        let rendered = self.render(results)?;
        std::fs::write(path, rendered)?;
        tracing::info!(
            "Wrote {} report with {} entries to {}",
            self.name(),
            results.len(),
            path.display()
        );
        Ok(())
    }
}

/// Returns the snapshot entries ordered by URL string
pub fn sorted_entries(results: &ResultSnapshot) -> Vec<(&NormalizedUrl, &Outcome)> {
    let mut entries: Vec<_> = results.iter().collect();
    entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
    entries
}
