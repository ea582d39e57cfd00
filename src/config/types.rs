use crate::url::DEFAULT_ALLOWED_SUFFIXES;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User agent presented to robots.txt and sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Advanced Internal Link Auditor)";

/// Default traversal depth below the start page
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default worker pool size
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default CSV report location
pub const DEFAULT_CSV_PATH: &str = "internal_links_report.csv";

/// Default JSON report location
pub const DEFAULT_JSON_PATH: &str = "internal_links_report.json";

/// Configuration surface of a single crawl
///
/// # Example
///
/// ```
/// use link_auditor::AuditConfig;
/// use std::time::Duration;
///
/// let config = AuditConfig::new("https://example.com/", 2)
///     .with_concurrency(4)
///     .with_request_timeout(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    /// Seed URL; its authority is the crawl domain
    pub start_url: String,

    /// Maximum link distance from the start page (0 audits only the seed)
    pub max_depth: u32,

    /// Identity for robots.txt matching and the User-Agent header
    pub user_agent: String,

    /// Path suffixes treated as crawlable pages
    pub allowed_path_suffixes: Vec<String>,

    /// Worker pool size
    pub concurrency: usize,

    /// Upper bound for each fetch
    pub request_timeout: Duration,

    /// Follow redirects instead of recording the 3xx status
    pub follow_redirects: bool,
}

impl AuditConfig {
    /// Creates a configuration with default settings for everything but
    /// the start URL and depth
    pub fn new(start_url: impl Into<String>, max_depth: u32) -> Self {
        Self {
            start_url: start_url.into(),
            max_depth,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_path_suffixes: DEFAULT_ALLOWED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            follow_redirects: false,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_allowed_path_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_path_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Validates the configuration
    ///
    /// See [`crate::config::validate`].
    pub fn validate(&self) -> crate::ConfigResult<()> {
        crate::config::validate(self)
    }
}

/// On-disk configuration file
///
/// Every section and field is optional; command-line flags override it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub crawler: CrawlerSection,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// `[crawler]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlerSection {
    /// Maximum depth to crawl from the start URL
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Number of concurrent workers
    pub concurrency: Option<usize>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,

    /// Whether redirects are followed
    #[serde(rename = "follow-redirects")]
    pub follow_redirects: Option<bool>,

    /// Path suffixes treated as crawlable pages
    #[serde(rename = "allowed-path-suffixes")]
    pub allowed_path_suffixes: Option<Vec<String>>,
}

/// `[user-agent]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAgentSection {
    /// Full user agent string
    pub name: Option<String>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSection {
    /// Path to the CSV report
    #[serde(rename = "csv-path")]
    pub csv_path: Option<PathBuf>,

    /// Path to the JSON report
    #[serde(rename = "json-path")]
    pub json_path: Option<PathBuf>,
}

/// Resolved report destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            json_path: PathBuf::from(DEFAULT_JSON_PATH),
        }
    }
}

impl ConfigFile {
    /// Builds a crawl configuration for `start_url`, falling back to the
    /// defaults for anything the file leaves out
    pub fn audit_config(&self, start_url: impl Into<String>) -> AuditConfig {
        let mut config = AuditConfig::new(
            start_url,
            self.crawler.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        );

        if let Some(concurrency) = self.crawler.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(secs) = self.crawler.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(follow) = self.crawler.follow_redirects {
            config.follow_redirects = follow;
        }
        if let Some(suffixes) = &self.crawler.allowed_path_suffixes {
            config.allowed_path_suffixes = suffixes.clone();
        }
        if let Some(name) = &self.user_agent.name {
            config.user_agent = name.clone();
        }

        config
    }

    /// Resolves report destinations
    pub fn output_config(&self) -> OutputConfig {
        let defaults = OutputConfig::default();
        OutputConfig {
            csv_path: self.output.csv_path.clone().unwrap_or(defaults.csv_path),
            json_path: self.output.json_path.clone().unwrap_or(defaults.json_path),
        }
    }
}
