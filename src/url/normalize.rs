use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// A canonical URL identity: `scheme://host[:port]/path`
///
/// Fragment and query are dropped and trailing slashes are trimmed, so two
/// links that differ only in those parts name the same page. Inputs that do not
/// resolve to an http(s) URL with a host keep an opaque identity with no host;
/// they never pass the scope filter.
#[derive(Debug, Clone)]
pub struct NormalizedUrl {
    text: String,
    host: Option<String>,
    path: String,
}

impl NormalizedUrl {
    /// Returns the identity string
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the authority (`host` or `host:port`), if the URL has one
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the path with trailing slashes removed (empty for the root)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if this identity came from a fetchable http(s) URL
    pub fn is_web(&self) -> bool {
        self.host.is_some()
    }

    fn opaque(raw: &str) -> Self {
        let text = raw.split('#').next().unwrap_or_default().to_string();
        Self {
            text,
            host: None,
            path: String::new(),
        }
    }
}

impl PartialEq for NormalizedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for NormalizedUrl {}

impl Hash for NormalizedUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for NormalizedUrl {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalizedUrl {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Normalizes `raw` into a stable identity, resolving it against `base`
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` (or parse it alone if `base` is not a URL)
/// 2. Remove the fragment and the query string
/// 3. Rebuild as `scheme://host[:port]` followed by the path
/// 4. Trim trailing slashes, so `https://example.com/` becomes `https://example.com`
///
/// This never fails. Unparseable input and non-http(s) schemes (`mailto:`,
/// `javascript:`, ...) yield a hostless identity.
///
/// # Examples
///
/// ```
/// use link_auditor::url::normalize;
///
/// let url = normalize("/about.html#team", "https://example.com/");
/// assert_eq!(url.as_str(), "https://example.com/about.html");
/// assert_eq!(url.host(), Some("example.com"));
/// ```
pub fn normalize(raw: &str, base: &str) -> NormalizedUrl {
    let raw = raw.trim();

    let resolved = match Url::parse(base) {
        Ok(base_url) => base_url.join(raw),
        Err(_) => Url::parse(raw),
    };

    match resolved {
        Ok(url) => from_parsed(&url),
        Err(e) => {
            tracing::trace!("Keeping opaque identity for {:?}: {}", raw, e);
            NormalizedUrl::opaque(raw)
        }
    }
}

/// Normalizes an absolute URL string
///
/// Equivalent to [`normalize`] without a base; relative input therefore
/// yields a hostless identity.
pub fn normalize_url(raw: &str) -> NormalizedUrl {
    match Url::parse(raw.trim()) {
        Ok(url) => from_parsed(&url),
        Err(_) => NormalizedUrl::opaque(raw.trim()),
    }
}

fn from_parsed(url: &Url) -> NormalizedUrl {
    let scheme = url.scheme();

    match url.host_str() {
        Some(host) if scheme == "http" || scheme == "https" => {
            // Url::port() is None for the scheme's default port
            let authority = match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };

            // A run of slashes is trimmed as a whole; trimming only one would
            // let a second pass shorten the identity again
            let path = url.path().trim_end_matches('/').to_string();

            NormalizedUrl {
                text: format!("{}://{}{}", scheme, authority, path),
                host: Some(authority),
                path,
            }
        }
        _ => {
            let mut opaque = url.clone();
            opaque.set_fragment(None);
            NormalizedUrl::opaque(opaque.as_str())
        }
    }
}
