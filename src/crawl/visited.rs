// src/crawl/visited.rs
// =============================================================================
// The set of URLs already claimed during one crawl.
//
// try_claim() is the only way in: it checks and inserts under one lock, so
// two callers racing on the same URL can never both win.
// =============================================================================

use std::collections::HashSet;
use std::sync::Mutex;

/// URLs claimed so far. One per crawl, never shared between crawls.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once per URL: the first time it is claimed.
    pub fn try_claim(&self, url: &str) -> bool {
        // A poisoned lock only means another thread panicked mid-insert;
        // HashSet::insert leaves the set consistent either way.
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Check before insert so a duplicate costs no allocation
        if seen.contains(url) {
            return false;
        }
        seen.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        match self.seen.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

// NOTES:
// A std Mutex is enough here: the lock is held for one hash lookup and never
// across an .await, so an async mutex would only add overhead.
