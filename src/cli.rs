// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
//   wiki-crawl https://en.wikipedia.org/wiki/Rust links.txt
//   wiki-crawl https://en.wikipedia.org/wiki/Rust crawl.db --max-depth 3
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::crawl::{DEFAULT_CONCURRENCY, DEFAULT_DOMAIN, DEFAULT_MAX_DEPTH};
use crate::fetch::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::sink::SinkKind;

#[derive(Parser, Debug)]
#[command(
    name = "wiki-crawl",
    version,
    about = "Crawl encyclopedia articles to a fixed link depth",
    long_about = "wiki-crawl starts at one article, follows links to other articles on the same site \
                  up to --max-depth hops, and records every unique article URL with the depth it was \
                  first reached at. Output is a sorted text file or a SQLite database."
)]
pub struct Cli {
    /// Article to start from (e.g. https://en.wikipedia.org/wiki/Rust)
    pub start_url: String,

    /// Where to write results; .db / .sqlite / .sqlite3 produce a SQLite store
    pub output: PathBuf,

    /// Maximum crawl depth (the start article is depth 1)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: u32,

    /// Maximum number of pages fetched at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Output format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<SinkKind>,

    /// Site domain; its subdomains are in scope too
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Stop the crawl after this many seconds and keep what was found
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Per-page request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Print the crawl report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn sink_kind(&self) -> SinkKind {
        self.format
            .unwrap_or_else(|| SinkKind::from_path(&self.output))
    }
}
