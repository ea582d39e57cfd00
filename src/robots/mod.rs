//! Robots.txt handling module
//!
//! This module loads the start domain's robots.txt once per crawl and answers
//! allow/deny questions for the crawler's user agent. Loading fails open: any
//! fetch failure yields [`RobotsPolicy::AllowAll`] so an audit never stops
//! just because robots.txt is missing or unreachable.

mod parser;

pub use parser::{product_token, RobotsPolicy};

use crate::crawler::{FetchResponse, Transport, MAX_REDIRECTS};
use crate::url::NormalizedUrl;
use crate::TransportError;
use std::time::Duration;
use url::Url;

/// Fetches and parses robots.txt for the crawl's start URL
///
/// # Arguments
///
/// * `transport` - The fetch capability (the same one pages are fetched with)
/// * `start_url` - The normalized start URL; robots.txt is read from its root
/// * `timeout` - Upper bound for each robots.txt request, one per redirect hop
///
/// Redirects are followed, so rules behind an http→https hop still apply.
///
/// # Returns
///
/// * Parsed rules for a 2xx response
/// * [`RobotsPolicy::DisallowAll`] for 401/403
/// * [`RobotsPolicy::AllowAll`] for every other status and for transport failures
pub async fn load_robots(
    transport: &dyn Transport,
    start_url: &NormalizedUrl,
    timeout: Duration,
) -> RobotsPolicy {
    let robots_url = match robots_url_for(start_url) {
        Some(url) => url,
        None => {
            tracing::warn!(
                "Cannot derive robots.txt location from {}, allowing all URLs",
                start_url
            );
            return RobotsPolicy::allow_all();
        }
    };

    let (robots_url, response) =
        match fetch_following_redirects(transport, robots_url, timeout).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Failed to load robots.txt ({}), allowing all URLs", e);
                return RobotsPolicy::allow_all();
            }
        };

    match response {
        response if (200..300).contains(&response.status) => {
            tracing::info!("Loaded robots.txt from {}", robots_url);
            RobotsPolicy::from_content(&response.body)
        }
        response if response.status == 401 || response.status == 403 => {
            tracing::info!(
                "robots.txt at {} answered {}, treating all URLs as disallowed",
                robots_url,
                response.status
            );
            RobotsPolicy::disallow_all()
        }
        response => {
            tracing::debug!(
                "robots.txt at {} answered {}, allowing all URLs",
                robots_url,
                response.status
            );
            RobotsPolicy::allow_all()
        }
    }
}

/// Fetches `url`, following up to [`MAX_REDIRECTS`] `Location` hops
///
/// Robots.txt commonly sits behind an http→https or apex→www redirect, so the
/// hops are resolved here regardless of how the transport treats redirects.
/// Each hop gets its own `timeout`.
///
/// # Returns
///
/// * `Ok((final_url, response))` - The last response and the URL it came from
/// * `Err(TransportError)` - A hop failed, timed out, or the chain was too long
async fn fetch_following_redirects(
    transport: &dyn Transport,
    url: String,
    timeout: Duration,
) -> Result<(String, FetchResponse), TransportError> {
    let mut current = url;

    for _ in 0..=MAX_REDIRECTS {
        tracing::debug!("Fetching robots.txt from {}", current);

        let response = tokio::time::timeout(timeout, transport.fetch(&current, timeout))
            .await
            .map_err(|_| TransportError::Timeout {
                url: current.clone(),
            })??;

        let Some(location) = response.redirect_target().map(str::to_string) else {
            return Ok((current, response));
        };
        let next = Url::parse(&current)
            .and_then(|base| base.join(&location))
            .map_err(|e| TransportError::Request {
                url: current.clone(),
                message: format!("invalid redirect location '{}': {}", location, e),
            })?;

        tracing::debug!("robots.txt at {} redirects to {}", current, next);
        current = next.into();
    }

    Err(TransportError::Request {
        url: current,
        message: format!("more than {} redirects", MAX_REDIRECTS),
    })
}

/// Checks if a URL is allowed by robots.txt
///
/// # Arguments
///
/// * `robots` - The loaded policy
/// * `url` - The URL to check
/// * `user_agent` - The user agent string
pub fn is_allowed(robots: &RobotsPolicy, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}

/// A loaded policy bound to the crawler's identity
///
/// Immutable after construction, so workers share it without locking.
#[derive(Debug, Clone)]
pub struct RobotsGate {
    policy: RobotsPolicy,
    user_agent: String,
}

impl RobotsGate {
    pub fn new(policy: RobotsPolicy, user_agent: impl Into<String>) -> Self {
        Self {
            policy,
            user_agent: user_agent.into(),
        }
    }

    /// Returns true if the crawler may fetch `url`
    pub fn allows(&self, url: &NormalizedUrl) -> bool {
        self.policy.is_allowed(url.as_str(), &self.user_agent)
    }
}

fn robots_url_for(start_url: &NormalizedUrl) -> Option<String> {
    if !start_url.is_web() {
        return None;
    }
    let root = Url::parse(start_url.as_str()).ok()?;
    root.join("/robots.txt").ok().map(String::from)
}
