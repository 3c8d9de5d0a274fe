// src/fetch/http.rs
// =============================================================================
// Downloads article pages over HTTP and hands the HTML to the link extractor.
//
// Key behaviour:
// - One shared reqwest Client (connection pooling across all tasks)
// - A per-request timeout so a dead server cannot stall an expansion forever
// - Redirects are NOT followed: a 3xx counts as a failed fetch
// - Non-2xx responses are failures; the body is never parsed for them
//
// No retries happen here. A failed page simply contributes zero links.
// =============================================================================

use futures::future::BoxFuture;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

use super::{extract_links, FetchError, PageFetcher};

/// Per-request timeout in seconds used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// PageFetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            // Redirect targets would bypass scope classification
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // text() decodes using the charset from Content-Type, UTF-8 otherwise
        Ok(response.text().await?)
    }

    async fn links_of(&self, url: &str) -> Result<HashSet<String>, FetchError> {
        let html = self.fetch_page(url).await?;
        let links = extract_links(&html, url);
        debug!(url, links = links.len(), "fetched page");
        Ok(links)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch_links<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HashSet<String>, FetchError>> {
        Box::pin(self.links_of(url))
    }
}

// Maps a reqwest error onto a coarse label.
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Connection refused
pub(super) fn categorize_error(error: &reqwest::Error) -> &'static str {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        "timeout"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "dns"
        } else {
            "connect"
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "ssl"
    } else if error.is_body() || error.is_decode() {
        "body"
    } else {
        "request"
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the reqwest Client built once and cloned around?
//    - Client holds the connection pool. Cloning it is an Arc bump, and all
//      clones reuse the same keep-alive connections to the site.
//
// 2. Why does fetch_links delegate to an async fn?
//    - Inside a bare `async move` block the compiler cannot infer the error
//      type that `?` converts into. A named async fn fixes the return type.
// -----------------------------------------------------------------------------
