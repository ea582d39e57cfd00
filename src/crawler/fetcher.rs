//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `Transport` capability the traversal engine fetches through
//! - Building HTTP clients with the configured user agent
//! - Error classification into `TransportError`

use crate::TransportError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed when redirects are enabled
pub(crate) const MAX_REDIRECTS: usize = 10;

/// A completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body; only read for 2xx responses, empty otherwise
    pub body: String,

    /// `Location` header of a 3xx response
    pub location: Option<String>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            location: None,
        }
    }

    /// Sets the redirect target
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns the redirect target if this is a 3xx with a `Location` header
    pub fn redirect_target(&self) -> Option<&str> {
        if (300..400).contains(&self.status) {
            self.location.as_deref()
        } else {
            None
        }
    }
}

/// Fetch capability consumed by the crawler
///
/// Implementations must give up once `timeout` has elapsed. The traversal
/// engine additionally bounds every call with the same timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`, returning its status code and body
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header sent with every request
/// * `follow_redirects` - Follow up to 10 redirect hops instead of reporting 3xx
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_auditor::crawler::build_http_client;
///
/// let client = build_http_client("LinkAuditor/1.0", false).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, follow_redirects: bool) -> Result<Client, reqwest::Error> {
    let redirect = if follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Transport` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a freshly built client
    pub fn new(user_agent: &str, follow_redirects: bool) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, follow_redirects)?,
        })
    }

}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok());
            let redirect = FetchResponse::new(status.as_u16(), String::new());
            return Ok(match location {
                Some(location) => redirect.with_location(location),
                None => redirect,
            });
        }

        // Error pages are never parsed, so their bodies are not downloaded
        if !status.is_success() {
            return Ok(FetchResponse::new(status.as_u16(), String::new()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                }
            } else {
                TransportError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(FetchResponse::new(status.as_u16(), body))
    }
}

/// Maps a reqwest failure onto the transport error taxonomy
fn classify_error(url: &str, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
