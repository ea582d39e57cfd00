//! End-of-run audit summary
//!
//! Condenses a [`CrawlReport`] into the counts and timestamps the CLI prints
//! once the reports are written.

use crate::crawler::CrawlReport;
use crate::state::Outcome;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Audit summary statistics
#[derive(Debug, Clone)]
pub struct AuditSummary {
    /// Normalized start URL
    pub start_url: String,

    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,

    /// Wall-clock end of the run
    pub finished_at: DateTime<Utc>,

    /// Number of pages with a recorded outcome
    pub total_pages: usize,

    /// Pages that did not answer 200, sorted by URL
    pub broken: Vec<(String, Outcome)>,

    /// True if the run was interrupted
    pub cancelled: bool,

    /// True if robots.txt was unavailable and every URL was allowed
    pub robots_fallback: bool,

    /// Written report files
    pub reports: Vec<PathBuf>,
}

impl AuditSummary {
    /// Builds a summary for `report`, which ran from `started_at` to `finished_at`
    pub fn new(report: &CrawlReport, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        let mut broken: Vec<(String, Outcome)> = report
            .broken()
            .map(|(url, outcome)| (url.as_str().to_string(), *outcome))
            .collect();
        broken.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            start_url: report.start_url.as_str().to_string(),
            started_at,
            finished_at,
            total_pages: report.results.len(),
            broken,
            cancelled: report.cancelled,
            robots_fallback: report.robots_fallback,
            reports: Vec::new(),
        }
    }

    /// Records a written report path
    pub fn add_report(&mut self, path: &Path) {
        self.reports.push(path.to_path_buf());
    }

    /// Number of pages whose outcome is not HTTP 200
    pub fn broken_count(&self) -> usize {
        self.broken.len()
    }

    /// Run duration in seconds, never negative
    pub fn duration_seconds(&self) -> f64 {
        let millis = (self.finished_at - self.started_at).num_milliseconds().max(0);
        millis as f64 / 1000.0
    }
}

/// Prints the summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &AuditSummary) {
    println!("=== Link Audit Summary ===\n");

    println!("Run:");
    println!("  Start URL: {}", summary.start_url);
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {:.2}s", summary.duration_seconds());
    if summary.cancelled {
        println!("  Status: interrupted (partial results)");
    }
    if summary.robots_fallback {
        println!("  robots.txt: unavailable, all URLs allowed");
    }
    println!();

    println!("Overview:");
    println!("  Total internal pages found: {}", summary.total_pages);
    println!("  Broken or error pages: {}", summary.broken_count());
    println!();

    if !summary.broken.is_empty() {
        println!("Broken Pages ({}):", summary.broken.len());
        for (url, outcome) in &summary.broken {
            println!("  - [{}] {}", outcome, url);
        }
        println!();
    }

    if !summary.reports.is_empty() {
        println!("Reports:");
        for path in &summary.reports {
            println!("  - {}", path.display());
        }
    }
}
