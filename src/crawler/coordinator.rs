//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal engine that coordinates one crawl run:
//! - Normalizing the start URL and deriving the crawl domain
//! - Loading the robots policy once
//! - Driving every task through depth check, claim, robots check, fetch,
//!   record and expansion on the worker pool
//! - Collecting the final result map

use crate::config::AuditConfig;
use crate::crawler::fetcher::{FetchResponse, HttpTransport, Transport};
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::scheduler::{CrawlTask, TaskQueue, WorkerPool};
use crate::robots::{load_robots, RobotsGate};
use crate::state::{Outcome, ResultSnapshot, ResultStore, VisitedRegistry};
use crate::url::{normalize, normalize_url, NormalizedUrl, ScopeFilter};
use crate::{ConfigError, TransportError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Everything a finished crawl run hands back
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The normalized start URL
    pub start_url: NormalizedUrl,

    /// URL → outcome for every fetched page
    pub results: ResultSnapshot,

    /// Number of URLs claimed, including robots-disallowed ones
    pub urls_claimed: usize,

    /// True if robots.txt could not be loaded and the fallback was used
    pub robots_fallback: bool,

    /// True if the run was cut short by cancellation
    pub cancelled: bool,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Returns the entries that are not HTTP 200
    pub fn broken(&self) -> impl Iterator<Item = (&NormalizedUrl, &Outcome)> {
        self.results.iter().filter(|(_, outcome)| outcome.is_broken())
    }
}

/// Main crawler coordinator structure
///
/// Holds the configuration and the two collaborators one run needs. Create
/// one per crawl; the shared state of a run lives only inside [`Coordinator::run`].
pub struct Coordinator {
    config: AuditConfig,
    start_url: NormalizedUrl,
    domain: String,
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Coordinator {
    /// Creates a coordinator using the reqwest transport and the HTML
    /// link extractor
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the client was built
    /// * `Err(AuditError)` - Invalid configuration or client build failure
    pub fn new(config: AuditConfig) -> crate::Result<Self> {
        let transport = HttpTransport::new(&config.user_agent, config.follow_redirects)?;
        Ok(Self::with_components(
            config,
            Arc::new(transport),
            Arc::new(HtmlLinkExtractor),
        )?)
    }

    /// Creates a coordinator with caller-supplied collaborators
    pub fn with_components(
        config: AuditConfig,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let start_url = normalize_url(&config.start_url);
        let domain = start_url
            .host()
            .ok_or_else(|| {
                ConfigError::InvalidUrl(format!("Start URL '{}' has no host", config.start_url))
            })?
            .to_string();

        Ok(Self {
            config,
            start_url,
            domain,
            transport,
            extractor,
        })
    }

    /// Returns the normalized start URL
    pub fn start_url(&self) -> &NormalizedUrl {
        &self.start_url
    }

    /// Returns the crawl domain (`host` or `host:port`)
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Runs the crawl to quiescence
    pub async fn run(&self) -> CrawlReport {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Runs the crawl until quiescence or until `cancel` fires
    ///
    /// Cancellation abandons in-flight fetches (no entry is recorded for
    /// them) and stops new tasks from being queued. Everything recorded so
    /// far is returned.
    pub async fn run_with_cancellation(&self, cancel: CancellationToken) -> CrawlReport {
        let started = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            self.start_url,
            self.config.max_depth,
            self.config.concurrency
        );

        let policy =
            load_robots(self.transport.as_ref(), &self.start_url, self.config.request_timeout)
                .await;
        let robots_fallback = policy.is_fallback();

        let engine = Arc::new(TraversalEngine {
            scope: ScopeFilter::new(
                self.domain.clone(),
                self.config.allowed_path_suffixes.iter().cloned(),
            ),
            robots: RobotsGate::new(policy, self.config.user_agent.clone()),
            visited: VisitedRegistry::new(),
            results: ResultStore::new(),
            transport: Arc::clone(&self.transport),
            extractor: Arc::clone(&self.extractor),
            max_depth: self.config.max_depth,
            timeout: self.config.request_timeout,
            cancel: cancel.clone(),
        });

        let worker_engine = Arc::clone(&engine);
        WorkerPool::new(self.config.concurrency)
            .run(
                vec![CrawlTask::seed(self.start_url.clone())],
                &cancel,
                move |task, queue| {
                    let engine = Arc::clone(&worker_engine);
                    async move { engine.process(task, &queue).await }
                },
            )
            .await;

        let report = CrawlReport {
            start_url: self.start_url.clone(),
            results: engine.results.snapshot(),
            urls_claimed: engine.visited.len(),
            robots_fallback,
            cancelled: cancel.is_cancelled(),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Crawl finished: {} pages recorded, {} URLs claimed in {:?}{}",
            report.results.len(),
            report.urls_claimed,
            report.elapsed,
            if report.cancelled { " (cancelled)" } else { "" }
        );

        report
    }
}

/// Shared per-run state and collaborators, used by every worker
struct TraversalEngine {
    scope: ScopeFilter,
    robots: RobotsGate,
    visited: VisitedRegistry,
    results: ResultStore,
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn LinkExtractor>,
    max_depth: u32,
    timeout: Duration,
    cancel: CancellationToken,
}

impl TraversalEngine {
    /// Processes one task
    ///
    /// 1. Depth check: discard below `max_depth`
    /// 2. Claim: discard if another path already owns the URL
    /// 3. Robots check: discard silently if disallowed (no result entry)
    /// 4. Fetch with a timeout; record the status, or `ERROR` on failure
    /// 5. Stop unless the status is 200
    /// 6. Normalize and scope-filter every link and queue it at `depth + 1`
    async fn process(&self, task: CrawlTask, queue: &TaskQueue) {
        if self.cancel.is_cancelled() {
            return;
        }

        if task.depth > self.max_depth {
            tracing::trace!("Skipping {} beyond max depth", task.url);
            return;
        }

        if !self.visited.try_claim(&task.url) {
            tracing::trace!("Already claimed: {}", task.url);
            return;
        }

        if !self.robots.allows(&task.url) {
            tracing::debug!("URL {} disallowed by robots.txt", task.url);
            return;
        }

        let response = match self.fetch(&task.url).await {
            Ok(response) => response,
            Err(TransportError::Cancelled { .. }) => {
                tracing::debug!("Abandoned fetch of {}", task.url);
                return;
            }
            Err(e) => {
                tracing::debug!(url = %task.url, depth = task.depth, error = %e, "Fetch failed");
                self.results.record(&task.url, Outcome::Error);
                return;
            }
        };

        tracing::debug!(url = %task.url, depth = task.depth, status = response.status, "Fetched page");
        self.results
            .record(&task.url, Outcome::Status(response.status));

        // Redirects and error pages are recorded but never expanded
        if response.status != 200 {
            return;
        }

        // Children would be discarded by the depth check anyway
        if task.depth >= self.max_depth {
            return;
        }

        for href in self.extractor.extract_links(&response.body) {
            if self.cancel.is_cancelled() {
                break;
            }

            let link = normalize(&href, task.url.as_str());
            if !self.scope.in_scope(&link) {
                tracing::trace!("Out of scope: {}", link);
                continue;
            }

            // `try_claim` in `process` stays authoritative; this only saves
            // queueing work for links already handled
            if self.visited.contains(&link) {
                continue;
            }

            queue.submit(task.child(link));
        }
    }

    /// Fetches `url`, bounded by the timeout and the cancellation token
    async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, TransportError> {
        let bounded =
            tokio::time::timeout(self.timeout, self.transport.fetch(url.as_str(), self.timeout));

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TransportError::Cancelled {
                url: url.to_string(),
            }),
            fetched = bounded => fetched.unwrap_or_else(|_| {
                Err(TransportError::Timeout {
                    url: url.to_string(),
                })
            }),
        }
    }
}
