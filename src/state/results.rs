//! Result store: the URL → outcome map produced by a crawl

use crate::url::NormalizedUrl;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Retrieval outcome recorded for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The server answered with this HTTP status code
    Status(u16),

    /// The fetch failed (timeout, connection refused, DNS, malformed response)
    Error,
}

impl Outcome {
    /// Returns true for an HTTP 200 response
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Status(200))
    }

    /// Returns true for anything a link audit should flag
    pub fn is_broken(&self) -> bool {
        !self.is_ok()
    }

    /// Returns the status code, if the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Error => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{}", code),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Serializes as the bare status number, or the string `"ERROR"`
impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Status(code) => serializer.serialize_u16(*code),
            Self::Error => serializer.serialize_str("ERROR"),
        }
    }
}

/// Point-in-time copy of the result map handed to reporting
pub type ResultSnapshot = HashMap<NormalizedUrl, Outcome>;

/// Concurrency-safe URL → outcome mapping
///
/// Writers are serialized by the visited registry's claim, so each key has a
/// single writer. A second write for a key is ignored.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Mutex<ResultSnapshot>,
}

impl ResultStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for `url`
    ///
    /// # Returns
    ///
    /// * `true` - The entry was written
    /// * `false` - `url` already had an outcome; the existing one is kept
    pub fn record(&self, url: &NormalizedUrl, outcome: Outcome) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if entries.contains_key(url) {
            tracing::warn!("Ignoring second outcome {} for {}", outcome, url);
            return false;
        }

        entries.insert(url.clone(), outcome);
        true
    }

    /// Returns the outcome recorded for `url`
    pub fn get(&self, url: &NormalizedUrl) -> Option<Outcome> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(url)
            .copied()
    }

    /// Returns a copy of the current contents
    pub fn snapshot(&self) -> ResultSnapshot {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Consumes the store and returns its contents
    pub fn into_snapshot(self) -> ResultSnapshot {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
