//! Visited registry: exactly-once admission of URLs into fetch work

use crate::url::NormalizedUrl;
use std::collections::HashSet;
use std::sync::Mutex;

/// Concurrency-safe set of URLs already claimed for fetching
///
/// The set only grows during a crawl. Each claim is a single check-and-insert
/// under one lock, so for any URL exactly one caller ever wins.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: Mutex<HashSet<NormalizedUrl>>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the calling worker
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not yet claimed and now belongs to the caller
    /// * `false` - Another path already claimed it
    pub fn try_claim(&self, url: &NormalizedUrl) -> bool {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        claimed.insert(url.clone())
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(url)
    }

    /// Returns the number of claimed URLs
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
