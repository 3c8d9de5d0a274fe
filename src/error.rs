// src/error.rs
// =============================================================================
// Errors raised before a crawl starts.
//
// Fetch and persistence failures live next to the code that produces them
// (src/fetch/mod.rs and src/sink/mod.rs). Only validation errors are fatal,
// so they get their own home here.
// =============================================================================

use thiserror::Error;

/// The start URL or crawl settings were rejected before any work began.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The URL could not be parsed or has no scheme/host
    #[error("invalid URL '{url}': {reason}")]
    Malformed { url: String, reason: String },

    /// The URL parsed fine but is not an article on the target site
    #[error("'{url}' is not an article URL on {domain}")]
    OutOfScope { url: String, domain: String },

    #[error("max depth must be at least 1")]
    InvalidDepth,

    #[error("concurrency limit must be at least 1")]
    InvalidConcurrency,
}
