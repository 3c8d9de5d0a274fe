// src/fetch/mod.rs
// =============================================================================
// Turning a URL into the set of links found on that page.
//
// Submodules:
// - http: downloads pages with reqwest (the production fetcher)
// - html: extracts link targets from downloaded HTML
//
// The crawler only sees the PageFetcher trait, so tests can swap in a fake
// link graph and never touch the network.
// =============================================================================

mod html;
mod http;

pub use html::extract_links;
pub use http::{HttpFetcher, DEFAULT_REQUEST_TIMEOUT_SECS};

use futures::future::BoxFuture;
use std::collections::HashSet;
use thiserror::Error;

/// Source of outgoing links for a page.
///
/// Implementations return `Err` for network or parse failures instead of
/// panicking; the crawler treats any error as "this page has no links".
///
/// The method returns a boxed future so fetchers can be shared as
/// `Arc<dyn PageFetcher>` across spawned tasks.
pub trait PageFetcher: Send + Sync {
    fn fetch_links<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HashSet<String>, FetchError>>;
}

/// Why a single page could not be expanded
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("fetcher panicked")]
    Panicked,

    #[error("concurrency gate closed")]
    GateClosed,
}

impl FetchError {
    /// Short label for logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Request(e) => http::categorize_error(e),
            FetchError::Status(code) if *code == 404 || *code == 410 => "not_found",
            FetchError::Status(_) => "status",
            FetchError::Panicked => "panic",
            FetchError::GateClosed => "cancelled",
        }
    }
}
