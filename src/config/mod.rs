//! Configuration module for Link Auditor
//!
//! This module holds the crawl configuration surface, loads optional TOML
//! configuration files, and validates settings before a crawl starts.
//!
//! # Example
//!
//! ```no_run
//! use link_auditor::config::load_config;
//! use std::path::Path;
//!
//! let file = load_config(Path::new("auditor.toml")).unwrap();
//! let config = file.audit_config("https://example.com/");
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuditConfig, ConfigFile, CrawlerSection, OutputConfig, OutputSection, UserAgentSection,
    DEFAULT_CONCURRENCY, DEFAULT_CSV_PATH, DEFAULT_JSON_PATH, DEFAULT_MAX_DEPTH,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
