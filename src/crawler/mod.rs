//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - The fetch seam and its reqwest implementation
//! - Link extraction from HTML
//! - The worker pool with quiescence detection
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, FetchResponse, HttpTransport, Transport};
pub(crate) use fetcher::MAX_REDIRECTS;
pub use parser::{extract_hrefs, HtmlLinkExtractor, LinkExtractor};
pub use scheduler::{CrawlTask, TaskQueue, WorkerPool};

use crate::config::AuditConfig;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for an audit. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Load robots.txt for the start domain
/// 4. Fetch every reachable in-scope page up to the depth bound
/// 5. Return the URL → outcome map
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed; per-URL failures are in the results
/// * `Err(AuditError)` - The configuration was rejected before any work began
///
/// # Example
///
/// ```no_run
/// use link_auditor::{crawl, AuditConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(AuditConfig::new("https://example.com/", 2)).await?;
/// for (url, outcome) in report.broken() {
///     println!("{} {}", url, outcome);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: AuditConfig) -> crate::Result<CrawlReport> {
    crawl_with_cancellation(config, CancellationToken::new()).await
}

/// Runs a crawl that stops early when `cancel` fires
///
/// Results recorded before cancellation are kept in the report.
pub async fn crawl_with_cancellation(
    config: AuditConfig,
    cancel: CancellationToken,
) -> crate::Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run_with_cancellation(cancel).await)
}
