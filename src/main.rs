// src/main.rs
// =============================================================================
// Entry point of the wiki-crawl CLI.
//
// What happens here:
// 1. Set up logging (RUST_LOG, default "info", written to stderr)
// 2. Parse command-line arguments using clap
// 3. Validate the start URL and limits before any network traffic
// 4. Open the output sink, run the crawl, print the summary
// 5. Exit with a code: 0 = complete, 1 = degraded/partial, 2 = error
// =============================================================================

mod cli;
mod crawl;
mod error;
mod fetch;
mod sink;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use cli::Cli;
use crawl::{CrawlConfig, CrawlReport, Crawler, Scope};
use fetch::HttpFetcher;
use sink::Sink;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let config = CrawlConfig::new(
        &cli.start_url,
        cli.max_depth,
        cli.concurrency,
        Scope::new(&cli.domain),
    )?;

    let kind = cli.sink_kind();
    let sink = sink::open_sink(kind, &cli.output)
        .with_context(|| format!("could not open output {}", cli.output.display()))?;
    let fetcher = HttpFetcher::new(Duration::from_secs(cli.request_timeout))
        .context("could not build HTTP client")?;

    info!(output = %cli.output.display(), format = ?kind, "writing results");

    let sink: Arc<dyn Sink> = Arc::from(sink);
    let crawler = Crawler::new(config, Arc::new(fetcher), Arc::clone(&sink));
    let timeout = cli.timeout.map(Duration::from_secs);
    let report = crawler.run_until(cancel_signal(timeout)).await;

    // Read back what the output actually holds. A reused SQLite file may
    // hold more than this crawl accepted, never less.
    let stored = match sink.list_recorded() {
        Ok(urls) => Some(urls.len()),
        Err(e) => {
            warn!(error = %e, "could not read back recorded URLs");
            None
        }
    };
    if let Some(stored) = stored.filter(|&n| n < report.recorded) {
        warn!(stored, recorded = report.recorded, "output holds fewer URLs than were recorded");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, stored);
    }

    if report.is_degraded() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Resolves on Ctrl-C, or once `timeout` has elapsed if one is set
async fn cancel_signal(timeout: Option<Duration>) {
    let deadline = async {
        match timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => futures::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = deadline => info!("crawl timeout reached"),
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("interrupted"),
            // No signal handler available: never cancel from here
            Err(_) => futures::future::pending::<()>().await,
        },
    }
}

fn print_summary(report: &CrawlReport, stored: Option<usize>) {
    if report.complete {
        println!(
            "Crawling complete. Found {} unique links.",
            report.recorded
        );
    } else {
        println!(
            "Crawling stopped early (partial result). Found {} unique links.",
            report.recorded
        );
    }

    println!("   Start: {}", report.start_url);
    println!("   Max depth: {}", report.max_depth);
    println!("   Pages fetched: {}", report.fetches);
    if let Some(stored) = stored {
        println!("   URLs in output: {}", stored);
    }
    if report.fetch_failures > 0 {
        println!("   Pages that could not be fetched: {}", report.fetch_failures);
    }
    if report.persistence_errors > 0 {
        println!("   Records that could not be saved: {}", report.persistence_errors);
    }
    println!("   Took: {:.1}s", report.elapsed_ms as f64 / 1000.0);
}
