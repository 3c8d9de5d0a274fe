// src/fetch/html.rs
// =============================================================================
// Pulls outgoing link targets out of an article's HTML.
//
// Every <a href> is resolved against the page URL and returned as an absolute
// http(s) URL with its fragment removed. Whether a link is an in-scope article
// is NOT decided here: the crawler classifies each link exactly once.
//
// Uses `scraper` for the DOM and CSS selectors, `url` for resolving
// relative hrefs the same way a browser does.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the distinct absolute link targets of `html`, resolved against `page_url`.
///
/// Example:
///   html = "<a href='/wiki/Graph#Intro'>Graph</a>"
///   page_url = "https://en.wikipedia.org/wiki/Tree"
///   result = {"https://en.wikipedia.org/wiki/Graph"}
pub fn extract_links(html: &str, page_url: &str) -> HashSet<String> {
    let mut links = HashSet::new();

    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return links,
    };

    let document = Html::parse_document(html);
    // The selector is a constant, so parsing it cannot fail
    let selector = Selector::parse("a[href]").expect("'a[href]' is a valid selector");

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(url) = resolve_link(&base, href) {
                links.insert(url);
            }
        }
    }

    links
}

// Resolves a (possibly relative) href to an absolute http(s) URL without fragment
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    // Same-page anchors and pseudo-links never name another page
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles "../x", "//host/x" and absolute hrefs alike
    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);

    Some(url.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does Html::parse_document do with broken markup?
//    - It never fails. html5ever repairs the tree the way a browser would,
//      so unclosed tags or stray text still yield every <a> it can find.
//
// 2. Why return a HashSet?
//    - A page often links the same article many times (infobox, body,
//      navbox). The set collapses them before the crawler sees them.
//
// 3. Why does resolve_link return Option?
//    - `?` on an Option returns None early, which keeps the "skip this href"
//      paths short.
// -----------------------------------------------------------------------------
