use crate::config::types::AuditConfig;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Largest accepted worker pool
const MAX_CONCURRENCY: usize = 100;

/// Validates the entire configuration
///
/// Runs before any network work; a failure here is the only way a crawl
/// does not produce a report.
pub fn validate(config: &AuditConfig) -> Result<(), ConfigError> {
    validate_start_url(&config.start_url)?;
    validate_concurrency(config.concurrency)?;
    validate_timeout(config.request_timeout)?;
    validate_user_agent(&config.user_agent)?;
    Ok(())
}

/// Validates the start URL: non-empty, parseable, http(s), with a host
fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    let trimmed = start_url.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Validation(
            "start_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", trimmed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https, got: {}",
            trimmed,
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            trimmed
        )));
    }

    Ok(())
}

fn validate_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if concurrency < 1 || concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, concurrency
        )));
    }
    Ok(())
}

fn validate_timeout(timeout: Duration) -> Result<(), ConfigError> {
    if timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request timeout must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}
