//! State module for the shared, per-crawl mutable state
//!
//! # Components
//!
//! - `VisitedRegistry`: URLs already claimed for fetching (deduplication)
//! - `ResultStore`: the URL → outcome map handed to reporting
//! - `Outcome`: an HTTP status code or the `ERROR` marker
//!
//! Both stores are owned by a single crawl run and shared by its workers.

mod results;
mod visited;

// Re-export main types
pub use results::{Outcome, ResultSnapshot, ResultStore};
pub use visited::VisitedRegistry;
