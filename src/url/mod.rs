//! URL handling module for Link Auditor
//!
//! This module provides URL normalization into stable identities and the
//! scope filter that keeps a crawl on its own domain and off asset files.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{normalize, normalize_url, NormalizedUrl};
pub use scope::{in_scope, ScopeFilter, DEFAULT_ALLOWED_SUFFIXES};
