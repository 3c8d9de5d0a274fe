// src/crawl/scope.rs
// =============================================================================
// Decides whether a URL is an article on the site being crawled.
//
// A URL is in scope when:
// 1. It parses, and uses http or https
// 2. Its host is the target domain or a subdomain of it
//    (en.wikipedia.org is in scope for wikipedia.org)
// 3. Its path starts with the article prefix ("/wiki/") followed by a title
// 4. The title has no namespace separator (File:, Talk:, Category:, ...)
// 5. It carries no fragment (anchors point into a page, they are not pages)
//
// Everything is decided from the URL text alone: no I/O, no state.
// =============================================================================

use url::Url;

/// Domain crawled when none is given on the command line
pub const DEFAULT_DOMAIN: &str = "wikipedia.org";

/// Path prefix shared by every article URL
pub const ARTICLE_PREFIX: &str = "/wiki/";

/// The URL classifier: which links belong to the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    domain: String,
    article_prefix: String,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN)
    }
}

impl Scope {
    /// Scope covering `domain` and its subdomains, with the standard article prefix
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.trim_matches('.').to_ascii_lowercase(),
            article_prefix: ARTICLE_PREFIX.to_string(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns true if `url` is an article on this site.
    ///
    /// Total over all strings: anything that fails to parse is out of scope.
    pub fn is_in_scope(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.classify(&parsed),
            Err(_) => false,
        }
    }

    fn classify(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        // Extracted links arrive without fragments; a URL that still has one
        // was built by hand and points into a page
        if url.fragment().is_some() {
            return false;
        }

        let host_ok = match url.host_str() {
            Some(host) => self.host_matches(host),
            None => false,
        };
        if !host_ok {
            return false;
        }

        match url.path().strip_prefix(self.article_prefix.as_str()) {
            Some(title) => is_article_title(title),
            None => false,
        }
    }

    fn host_matches(&self, host: &str) -> bool {
        // Url::parse already lowercases hosts, but callers may pass raw text
        let host = host.to_ascii_lowercase();
        match host.strip_suffix(self.domain.as_str()) {
            // Exact match, or the character before the domain is a label dot.
            // "notwikipedia.org" must not match "wikipedia.org".
            Some("") => true,
            Some(rest) => rest.ends_with('.'),
            None => false,
        }
    }
}

/// Article titles are non-empty and carry no namespace.
fn is_article_title(title: &str) -> bool {
    if title.is_empty() {
        return false;
    }
    // The url crate keeps ':' literal in paths, but a percent-encoded colon
    // still names a namespace
    !(title.contains(':') || title.to_ascii_lowercase().contains("%3a"))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why strip_suffix instead of ends_with for the host check?
//    - ends_with("wikipedia.org") also accepts "notwikipedia.org".
//    - Stripping the suffix leaves whatever came before it, and that rest
//      must be empty or end in a dot.
//
// 2. Why are titles with '/' accepted?
//    - Some real article titles contain one (AC/DC, OS/2).
// -----------------------------------------------------------------------------
