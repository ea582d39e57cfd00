//! Output module for audit reports and summaries
//!
//! This module handles:
//! - Exporting the result map as CSV and JSON
//! - Summarizing a finished crawl for the terminal

mod csv;
mod json;
mod summary;
mod traits;

pub use self::csv::{export_csv, CsvReport};
pub use self::json::{export_json, JsonReport};
pub use summary::{print_summary, AuditSummary};
pub use traits::{sorted_entries, ReportWriter};

use crate::config::OutputConfig;
use crate::state::ResultSnapshot;
use crate::OutputResult;
use std::path::PathBuf;

/// Writes every report configured in `output`
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths written, CSV first
/// * `Err(OutputError)` - A report could not be written
pub fn export_reports(results: &ResultSnapshot, output: &OutputConfig) -> OutputResult<Vec<PathBuf>> {
    export_csv(results, &output.csv_path)?;
    export_json(results, &output.json_path)?;
    Ok(vec![output.csv_path.clone(), output.json_path.clone()])
}
