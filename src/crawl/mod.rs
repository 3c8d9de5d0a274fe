// src/crawl/mod.rs
// =============================================================================
// This module handles the depth-bounded article crawl.
//
// Features:
// - Breadth-first expansion from one start article, layer by layer
// - A fixed depth ceiling: pages at the ceiling are recorded, never fetched
// - A bounded number of page fetches in flight at once
// - Every article recorded exactly once, at the depth it was first reached
// - External cancellation with a valid partial result
//
// Submodules:
// - scope: which URLs count as articles on the target site
// - visited: the per-crawl "already claimed" set
// - scheduler: the frontier driver tying fetcher, scope and sink together
// =============================================================================

mod scheduler;
mod scope;
mod visited;

pub use scheduler::Crawler;
pub use scope::{Scope, DEFAULT_DOMAIN};
pub use visited::VisitedSet;

use serde::Serialize;
use url::Url;

use crate::error::ValidationError;

/// Depth used when the caller does not choose one
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Fetches allowed in flight when the caller does not choose a limit
pub const DEFAULT_CONCURRENCY: usize = 10;

/// A page waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub url: String,
    /// Hops from the start URL; the start URL itself is depth 1
    pub depth: u32,
}

/// Settings for one crawl. Built through `new`, so every instance is valid.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    start_url: String,
    max_depth: u32,
    concurrency_limit: usize,
    scope: Scope,
}

impl CrawlConfig {
    /// Validates the start URL and limits.
    ///
    /// The start URL must parse with a scheme and host, and must be an
    /// article inside `scope`. A trailing fragment is dropped first, so
    /// ".../wiki/Rust#History" starts the crawl at ".../wiki/Rust".
    pub fn new(
        start_url: &str,
        max_depth: u32,
        concurrency_limit: usize,
        scope: Scope,
    ) -> Result<Self, ValidationError> {
        let start_url = normalize_start_url(start_url)?;

        if !scope.is_in_scope(&start_url) {
            return Err(ValidationError::OutOfScope {
                url: start_url,
                domain: scope.domain().to_string(),
            });
        }
        if max_depth == 0 {
            return Err(ValidationError::InvalidDepth);
        }
        if concurrency_limit == 0 {
            return Err(ValidationError::InvalidConcurrency);
        }

        Ok(Self {
            start_url,
            max_depth,
            concurrency_limit,
            scope,
        })
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

fn normalize_start_url(raw: &str) -> Result<String, ValidationError> {
    let malformed = |reason: &str| ValidationError::Malformed {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| malformed(&e.to_string()))?;
    // "mailto:x" and "data:..." parse fine but name no host
    if url.host_str().map_or(true, str::is_empty) {
        return Err(malformed("URL has no host"));
    }
    url.set_fragment(None);
    // Serialized through Url so the start URL has the same form as extracted links
    Ok(url.to_string())
}

/// What happened during a crawl. Printed as the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    pub max_depth: u32,
    /// Unique URLs accepted and handed to the sink
    pub recorded: usize,
    /// Links dropped because they were already claimed
    pub duplicates: usize,
    /// Discovered links that are not articles on the target site
    pub out_of_scope: usize,
    /// Items rejected for lying past the depth ceiling
    pub beyond_depth: usize,
    /// Page fetches that completed (successfully or not)
    pub fetches: usize,
    pub fetch_failures: usize,
    pub persistence_errors: usize,
    /// False when the crawl was cancelled before the frontier drained
    pub complete: bool,
    pub elapsed_ms: u64,
}

impl CrawlReport {
    /// A degraded run finished, but its output may be incomplete
    pub fn is_degraded(&self) -> bool {
        self.persistence_errors > 0 || !self.complete
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why are CrawlConfig's fields private?
//    - new() is the only constructor, so a config with depth 0 or an
//      out-of-scope start URL cannot exist. Read access goes through getters.
//
// 2. Why is depth 1 the start URL rather than 0?
//    - It keeps --max-depth readable: --max-depth 1 records only the start
//      article, --max-depth 2 adds the pages it links to.
// -----------------------------------------------------------------------------
