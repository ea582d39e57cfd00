use crate::url::NormalizedUrl;

/// Path suffixes treated as human-readable pages when none are configured
///
/// The empty suffix stands for an extensionless final path segment
/// (`/about`, `/blog/post`, the site root).
pub const DEFAULT_ALLOWED_SUFFIXES: &[&str] = &["", "/", ".html", ".htm", ".php"];

/// Decides whether a normalized URL belongs to the crawl
///
/// A URL is in scope when its authority equals the crawl domain exactly (no
/// subdomain matching) and its path matches one of the allowed suffixes.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    domain: String,
    allowed_suffixes: Vec<String>,
}

impl ScopeFilter {
    /// Creates a filter for `domain` with an explicit suffix list
    ///
    /// # Arguments
    ///
    /// * `domain` - The crawl authority (`host` or `host:port`)
    /// * `allowed_suffixes` - Case-sensitive path suffixes to admit
    pub fn new<I, S>(domain: impl Into<String>, allowed_suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domain: domain.into(),
            allowed_suffixes: allowed_suffixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a filter for `domain` with [`DEFAULT_ALLOWED_SUFFIXES`]
    pub fn with_default_suffixes(domain: impl Into<String>) -> Self {
        Self::new(domain, DEFAULT_ALLOWED_SUFFIXES.iter().copied())
    }

    /// Returns the crawl domain
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns true if `url` is on the crawl domain and has a crawlable path
    pub fn in_scope(&self, url: &NormalizedUrl) -> bool {
        match url.host() {
            Some(host) if host == self.domain => self.path_allowed(url.path()),
            _ => false,
        }
    }

    fn path_allowed(&self, path: &str) -> bool {
        self.allowed_suffixes
            .iter()
            .any(|suffix| suffix_matches(path, suffix))
    }
}

/// Checks `url` against `domain` using the default suffix list
///
/// # Examples
///
/// ```
/// use link_auditor::url::{in_scope, normalize};
///
/// let base = "https://example.com/";
/// assert!(in_scope(&normalize("/about.html", base), "example.com"));
/// assert!(!in_scope(&normalize("/style.css", base), "example.com"));
/// assert!(!in_scope(&normalize("https://blog.example.com/", base), "example.com"));
/// ```
pub fn in_scope(url: &NormalizedUrl, domain: &str) -> bool {
    ScopeFilter::with_default_suffixes(domain).in_scope(url)
}

fn suffix_matches(path: &str, suffix: &str) -> bool {
    if suffix.is_empty() {
        // rsplit always yields at least one segment
        path.rsplit('/')
            .next()
            .map_or(true, |segment| !segment.contains('.'))
    } else {
        path.ends_with(suffix)
    }
}
