//! Robots.txt policy evaluation
//!
//! This module wraps the robotstxt crate's matcher behind a policy type that
//! also names the fail-open fallback explicitly.

use robotstxt::DefaultMatcher;

/// Robots policy for one crawl
///
/// Loaded once before the crawl starts and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    /// Fallback used when robots.txt is missing or could not be fetched
    AllowAll,

    /// The site answered robots.txt with 401/403
    DisallowAll,

    /// Rules parsed from a robots.txt body
    Rules(String),
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self::Rules(content.to_string())
    }

    /// Creates the permissive fallback policy
    pub fn allow_all() -> Self {
        Self::AllowAll
    }

    /// Creates a policy that refuses every URL
    pub fn disallow_all() -> Self {
        Self::DisallowAll
    }

    /// Returns true if this is the fail-open fallback
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::AllowAll)
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The full user agent string; only its product token
    ///   (`Mozilla` in `Mozilla/5.0 (...)`) is matched against `User-agent` lines
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::DisallowAll => false,
            Self::Rules(content) if content.trim().is_empty() => true,
            Self::Rules(content) => {
                // robotstxt has no reusable parsed form; the body is re-parsed per query
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, product_token(user_agent), url)
            }
        }
    }
}

/// Extracts the product token robots.txt groups are matched against
pub fn product_token(user_agent: &str) -> &str {
    user_agent
        .trim()
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or_default()
}
