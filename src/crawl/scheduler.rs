// src/crawl/scheduler.rs
// =============================================================================
// The frontier driver: turns one start URL into the set of every article
// reachable within max_depth hops.
//
// How it works:
// 1. Offer the start URL at depth 1
// 2. Offering an item = claim it in VisitedSet, hand it to the sink, and
//    (below the ceiling) spawn an expansion task that fetches its links
// 3. Expansion tasks wait for a semaphore permit before fetching, so at most
//    `concurrency_limit` fetches run at once. Claiming and recording happen
//    on the coordinating task and are never gated.
// 4. Finished expansions are parked by depth. Links found at depth d are only
//    claimed (at d + 1) once no expansion shallower than d is still running,
//    so every URL is recorded at its shortest hop distance.
// 5. The crawl ends when no expansion is running and none is parked.
//
// Item lifecycle:
//   offered -> claimed -> recorded -> (expanding ->) done
//                      \-> rejected (duplicate, or beyond the ceiling)
// =============================================================================

use futures::FutureExt;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use super::{CrawlConfig, CrawlReport, VisitedSet, WorkItem};
use crate::fetch::{FetchError, PageFetcher};
use crate::sink::Sink;

/// Runs crawls for one configuration
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn Sink>,
}

// A fetched page and what came back
struct Expansion {
    item: WorkItem,
    links: Result<HashSet<String>, FetchError>,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>, sink: Arc<dyn Sink>) -> Self {
        Self {
            config,
            fetcher,
            sink,
        }
    }

    /// Crawls until the frontier is exhausted
    #[cfg(test)]
    pub async fn run(&self) -> CrawlReport {
        self.run_until(futures::future::pending()).await
    }

    /// Crawls until the frontier is exhausted or `cancel` resolves.
    ///
    /// On cancellation every in-flight fetch is abandoned, nothing more is
    /// claimed, and the report comes back with `complete == false`. What was
    /// recorded so far stays valid.
    pub async fn run_until<C>(&self, cancel: C) -> CrawlReport
    where
        C: Future<Output = ()>,
    {
        let started = Instant::now();
        let mut frontier = Frontier::new(self);

        info!(
            start_url = self.config.start_url(),
            max_depth = self.config.max_depth(),
            concurrency = self.config.concurrency_limit(),
            "crawl started"
        );

        frontier.offer(WorkItem {
            url: self.config.start_url().to_string(),
            depth: 1,
        });

        tokio::pin!(cancel);
        let mut complete = true;

        loop {
            tokio::select! {
                biased;

                _ = &mut cancel => {
                    warn!(in_flight = frontier.in_flight.len(), "crawl cancelled");
                    complete = false;
                    break;
                }

                joined = frontier.in_flight.join_next() => match joined {
                    None => break,
                    Some(Ok(expansion)) => frontier.complete(expansion),
                    Some(Err(e)) => {
                        // Fetcher panics are caught inside the task, so this is rare
                        error!("expansion task failed: {}", e);
                        frontier.report.fetch_failures += 1;
                        frontier.release();
                    }
                },
            }
        }

        frontier.in_flight.shutdown().await;
        debug_assert_eq!(frontier.visited.len(), frontier.report.recorded);

        let mut report = frontier.report;
        if let Err(e) = self.sink.finish() {
            warn!("failed to flush sink: {}", e);
            report.persistence_errors += 1;
        }
        report.complete = complete;
        report.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            recorded = report.recorded,
            fetch_failures = report.fetch_failures,
            persistence_errors = report.persistence_errors,
            complete = report.complete,
            "crawl finished"
        );
        report
    }
}

// Per-run state. Lives on the coordinating task only.
struct Frontier<'a> {
    crawler: &'a Crawler,
    visited: VisitedSet,
    gate: Arc<Semaphore>,
    in_flight: JoinSet<Expansion>,
    // depth -> expansions at that depth still running
    outstanding: BTreeMap<u32, usize>,
    // depth -> finished expansions whose links are not claimed yet
    parked: BTreeMap<u32, Vec<Expansion>>,
    deepest: u32,
    report: CrawlReport,
}

impl<'a> Frontier<'a> {
    fn new(crawler: &'a Crawler) -> Self {
        let config = &crawler.config;
        Self {
            crawler,
            visited: VisitedSet::new(),
            gate: Arc::new(Semaphore::new(config.concurrency_limit())),
            in_flight: JoinSet::new(),
            outstanding: BTreeMap::new(),
            parked: BTreeMap::new(),
            deepest: 0,
            report: CrawlReport {
                start_url: config.start_url().to_string(),
                max_depth: config.max_depth(),
                ..Default::default()
            },
        }
    }

    fn offer(&mut self, item: WorkItem) {
        let max_depth = self.crawler.config.max_depth();

        if item.depth > max_depth {
            self.report.beyond_depth += 1;
            return;
        }
        if !self.visited.try_claim(&item.url) {
            trace!(url = %item.url, "already claimed");
            self.report.duplicates += 1;
            return;
        }

        if item.depth > self.deepest {
            self.deepest = item.depth;
            info!(depth = item.depth, "reached new depth");
        }

        self.report.recorded += 1;
        debug!(url = %item.url, depth = item.depth, "recorded");
        if let Err(e) = self.crawler.sink.record(&item.url, item.depth) {
            warn!(url = %item.url, "failed to persist record: {}", e);
            self.report.persistence_errors += 1;
        }

        if item.depth < max_depth {
            self.expand(item);
        }
    }

    fn expand(&mut self, item: WorkItem) {
        *self.outstanding.entry(item.depth).or_insert(0) += 1;

        let fetcher = Arc::clone(&self.crawler.fetcher);
        let gate = Arc::clone(&self.gate);

        self.in_flight.spawn(async move {
            let links = match gate.acquire_owned().await {
                // The async wrapper also catches panics raised while the
                // fetcher builds its future, not only while it is polled
                Ok(_permit) => AssertUnwindSafe(async { fetcher.fetch_links(&item.url).await })
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(FetchError::Panicked)),
                Err(_) => Err(FetchError::GateClosed),
            };
            Expansion { item, links }
        });
    }

    fn complete(&mut self, expansion: Expansion) {
        let depth = expansion.item.depth;
        if let Some(count) = self.outstanding.get_mut(&depth) {
            *count -= 1;
            if *count == 0 {
                self.outstanding.remove(&depth);
            }
        }

        self.report.fetches += 1;
        if let Err(e) = &expansion.links {
            warn!(url = %expansion.item.url, kind = e.kind(), "fetch failed: {}", e);
            self.report.fetch_failures += 1;
        }

        self.parked.entry(depth).or_default().push(expansion);
        self.release();
    }

    // Claims parked links, shallowest first, while nothing shallower is running
    fn release(&mut self) {
        loop {
            let depth = match self.parked.first_key_value() {
                Some((&depth, _)) => depth,
                None => return,
            };

            let blocked = !self.in_flight.is_empty()
                && matches!(self.outstanding.first_key_value(), Some((&running, _)) if running < depth);
            if blocked {
                return;
            }

            let batch = self.parked.remove(&depth).unwrap_or_default();
            for expansion in batch {
                // A failed fetch contributes no links
                let links = expansion.links.unwrap_or_default();
                for link in links {
                    // Claim the canonical form so "https://X.org/wiki/B" and
                    // "https://x.org/wiki/B" are one URL
                    let url = match Url::parse(&link) {
                        Ok(parsed) => parsed.to_string(),
                        Err(_) => {
                            self.report.out_of_scope += 1;
                            continue;
                        }
                    };
                    if !self.crawler.config.scope().is_in_scope(&url) {
                        self.report.out_of_scope += 1;
                        continue;
                    }
                    self.offer(WorkItem {
                        url,
                        depth: depth + 1,
                    });
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why park finished expansions instead of claiming links right away?
//    - Fetches finish in any order. If a depth-3 page answered before a slow
//      depth-2 page, a link both pages share would be claimed at depth 4.
//    - Parking keeps claims in depth order while fetches still overlap.
//
// 2. Why acquire the permit inside the task?
//    - Spawning is cheap and never blocks the coordinator, so claiming and
//      recording keep going while fetches wait for a free slot.
//
// 3. What does biased; do in select!?
//    - Branches are polled top to bottom, so a pending cancellation always
//      wins over another finished expansion.
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::Scope;
    use crate::sink::{PersistenceError, SqliteSink, TextSink};
    use futures::future::BoxFuture;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn wiki(title: &str) -> String {
        format!("https://x.org/wiki/{}", title)
    }

    // A fake link graph. Pages not in the graph have no links.
    #[derive(Default)]
    struct MapFetcher {
        graph: HashMap<String, Vec<String>>,
        delays: HashMap<String, Duration>,
        default_delay: Duration,
        failing: HashSet<String>,
        hanging: HashSet<String>,
        panicking: HashSet<String>,
        // Panics before a future even exists
        panicking_eagerly: HashSet<String>,
        calls: Mutex<Vec<String>>,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl MapFetcher {
        fn new(edges: &[(&str, &[&str])]) -> Self {
            let graph = edges
                .iter()
                .map(|(from, to)| (wiki(from), to.iter().map(|t| wiki(t)).collect()))
                .collect();
            Self {
                graph,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PageFetcher for MapFetcher {
        fn fetch_links<'a>(
            &'a self,
            url: &'a str,
        ) -> BoxFuture<'a, Result<HashSet<String>, FetchError>> {
            if self.panicking_eagerly.contains(url) {
                panic!("fetcher refused {}", url);
            }
            Box::pin(async move {
                self.calls.lock().unwrap().push(url.to_string());

                let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                let delay = self.delays.get(url).copied().unwrap_or(self.default_delay);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.active.fetch_sub(1, Ordering::SeqCst);

                if self.hanging.contains(url) {
                    futures::future::pending::<()>().await;
                }
                if self.panicking.contains(url) {
                    panic!("fetcher blew up on {}", url);
                }
                if self.failing.contains(url) {
                    return Err(FetchError::Status(500));
                }
                Ok(self
                    .graph
                    .get(url)
                    .map(|links| links.iter().cloned().collect::<HashSet<String>>())
                    .unwrap_or_default())
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<(String, u32)>>,
        broken: bool,
        flush_fails: bool,
    }

    impl RecordingSink {
        fn depths(&self) -> HashMap<String, u32> {
            self.records.lock().unwrap().iter().cloned().collect()
        }
    }

    impl Sink for RecordingSink {
        fn init(&self) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn record(&self, url: &str, depth: u32) -> Result<(), PersistenceError> {
            if self.broken {
                return Err(PersistenceError::Poisoned);
            }
            self.records.lock().unwrap().push((url.to_string(), depth));
            Ok(())
        }

        fn list_recorded(&self) -> Result<BTreeSet<String>, PersistenceError> {
            Ok(self.records.lock().unwrap().iter().map(|(u, _)| u.clone()).collect())
        }

        fn finish(&self) -> Result<(), PersistenceError> {
            if self.flush_fails {
                return Err(PersistenceError::Poisoned);
            }
            Ok(())
        }
    }

    fn crawler(
        max_depth: u32,
        concurrency: usize,
        fetcher: &Arc<MapFetcher>,
        sink: &Arc<RecordingSink>,
    ) -> Crawler {
        let config = CrawlConfig::new(&wiki("A"), max_depth, concurrency, Scope::new("x.org")).unwrap();
        Crawler::new(config, fetcher.clone(), sink.clone())
    }

    fn crawler_into(max_depth: u32, fetcher: &Arc<MapFetcher>, sink: Arc<dyn Sink>) -> Crawler {
        let config = CrawlConfig::new(&wiki("A"), max_depth, 10, Scope::new("x.org")).unwrap();
        Crawler::new(config, fetcher.clone(), sink)
    }

    fn expected(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(t, d)| (wiki(t), *d)).collect()
    }

    #[tokio::test]
    async fn test_records_up_to_ceiling_without_expanding_it() {
        let fetcher = Arc::new(MapFetcher::new(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["E"]),
        ]));
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(2, 10, &fetcher, &sink).run().await;

        assert_eq!(sink.depths(), expected(&[("A", 1), ("B", 2), ("C", 2)]));
        assert_eq!(fetcher.calls(), vec![wiki("A")]);
        assert_eq!(report.recorded, 3);
        assert_eq!(report.fetches, 1);
        assert!(report.complete);
    }

    #[tokio::test]
    async fn test_shared_child_recorded_once_at_first_depth() {
        let fetcher = Arc::new(MapFetcher::new(&[("A", &["B", "C"]), ("C", &["B"])]));
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 10, &fetcher, &sink).run().await;

        assert_eq!(sink.depths(), expected(&[("A", 1), ("B", 2), ("C", 2)]));
        assert_eq!(sink.records.lock().unwrap().len(), 3);
        assert_eq!(report.duplicates, 1);
    }

    #[tokio::test]
    async fn test_empty_fetcher_records_only_start() {
        let fetcher = Arc::new(MapFetcher::default());
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 10, &fetcher, &sink).run().await;

        assert_eq!(sink.depths(), expected(&[("A", 1)]));
        assert_eq!(report.recorded, 1);
        assert!(report.complete);
    }

    #[tokio::test]
    async fn test_depth_one_never_fetches() {
        let fetcher = Arc::new(MapFetcher::new(&[("A", &["B"])]));
        let sink = Arc::new(RecordingSink::default());

        crawler(1, 10, &fetcher, &sink).run().await;

        assert_eq!(sink.depths(), expected(&[("A", 1)]));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cycles_terminate() {
        let fetcher = Arc::new(MapFetcher::new(&[("A", &["B"]), ("B", &["A", "C"]), ("C", &["A", "B"])]));
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(10, 2, &fetcher, &sink).run().await;

        assert_eq!(sink.depths(), expected(&[("A", 1), ("B", 2), ("C", 3)]));
        assert!(report.complete);
        // Every page is fetched at most once
        let calls = fetcher.calls();
        let unique: HashSet<_> = calls.iter().collect();
        assert_eq!(calls.len(), unique.len());
    }

    #[tokio::test]
    async fn test_out_of_scope_links_are_dropped() {
        let mut fetcher = MapFetcher::new(&[("A", &["B", "File:Logo.png"])]);
        if let Some(links) = fetcher.graph.get_mut(&wiki("A")) {
            links.push("https://example.com/wiki/Elsewhere".to_string());
            links.push("not a url".to_string());
        }
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 10, &fetcher, &sink).run().await;

        assert_eq!(sink.depths(), expected(&[("A", 1), ("B", 2)]));
        assert_eq!(report.out_of_scope, 3);
    }

    #[tokio::test]
    async fn test_slow_shallow_page_wins_over_fast_deep_path() {
        // Z is 3 hops away through P, 4 hops away through Q -> R.
        // P is slow, so R's fetch finishes first; Z must still land at depth 3.
        let mut fetcher = MapFetcher::new(&[
            ("A", &["P", "Q"]),
            ("P", &["Z"]),
            ("Q", &["R"]),
            ("R", &["Z"]),
            ("Z", &["W"]),
        ]);
        fetcher.delays.insert(wiki("P"), Duration::from_millis(100));
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        crawler(4, 10, &fetcher, &sink).run().await;

        assert_eq!(
            sink.depths(),
            expected(&[("A", 1), ("P", 2), ("Q", 2), ("R", 3), ("Z", 3), ("W", 4)])
        );
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        let children: Vec<String> = (0..40).map(|i| format!("C{}", i)).collect();
        let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
        let mut fetcher = MapFetcher::new(&[("A", child_refs.as_slice())]);
        fetcher.default_delay = Duration::from_millis(5);
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 4, &fetcher, &sink).run().await;

        assert_eq!(report.recorded, 41);
        assert_eq!(report.fetches, 41);
        let peak = fetcher.peak.load(Ordering::SeqCst);
        assert!(peak >= 1 && peak <= 4, "peak concurrency was {}", peak);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_no_links() {
        let mut fetcher = MapFetcher::new(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["E"])]);
        fetcher.failing.insert(wiki("B"));
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 10, &fetcher, &sink).run().await;

        assert_eq!(
            sink.depths(),
            expected(&[("A", 1), ("B", 2), ("C", 2), ("E", 3)])
        );
        assert_eq!(report.fetch_failures, 1);
        assert!(report.complete);
    }

    #[tokio::test]
    async fn test_panicking_fetcher_counts_as_failure() {
        let mut fetcher = MapFetcher::new(&[("A", &["B", "C"]), ("C", &["D"])]);
        fetcher.panicking.insert(wiki("B"));
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 10, &fetcher, &sink).run().await;

        assert_eq!(
            sink.depths(),
            expected(&[("A", 1), ("B", 2), ("C", 2), ("D", 3)])
        );
        assert_eq!(report.fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_persistence_errors_do_not_stop_traversal() {
        let fetcher = Arc::new(MapFetcher::new(&[("A", &["B", "C"]), ("B", &["D"])]));
        let sink = Arc::new(RecordingSink {
            broken: true,
            ..Default::default()
        });

        let report = crawler(3, 10, &fetcher, &sink).run().await;

        assert_eq!(report.recorded, 4);
        assert_eq!(report.persistence_errors, 4);
        assert!(report.is_degraded());
    }

    #[tokio::test]
    async fn test_cancellation_returns_partial_result() {
        let mut fetcher = MapFetcher::new(&[("A", &["B", "C"]), ("C", &["D"])]);
        fetcher.hanging.insert(wiki("B"));
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 10, &fetcher, &sink)
            .run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await;

        assert!(!report.complete);
        assert!(report.is_degraded());
        let depths = sink.depths();
        assert_eq!(depths.get(&wiki("A")), Some(&1));
        assert_eq!(depths.get(&wiki("B")), Some(&2));
        assert_eq!(depths.get(&wiki("C")), Some(&2));
    }

    #[tokio::test]
    async fn test_repeated_runs_record_the_same_set() {
        let mut fetcher = MapFetcher::new(&[
            ("A", &["B", "C", "D"]),
            ("B", &["E", "F"]),
            ("C", &["F", "G"]),
            ("D", &["A", "H"]),
        ]);
        fetcher.default_delay = Duration::from_millis(1);
        let fetcher = Arc::new(fetcher);

        let first = Arc::new(RecordingSink::default());
        crawler(3, 3, &fetcher, &first).run().await;
        let second = Arc::new(RecordingSink::default());
        crawler(3, 1, &fetcher, &second).run().await;

        assert_eq!(first.depths(), second.depths());
        assert_eq!(first.depths().len(), 8);
    }

    #[tokio::test]
    async fn test_text_output_written_sorted_at_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.txt");
        let fetcher = Arc::new(MapFetcher::new(&[("A", &["C", "B"]), ("B", &["D"])]));
        let sink = Arc::new(TextSink::new(&path));
        sink.init().unwrap();

        let report = crawler_into(2, &fetcher, sink).run().await;

        assert!(report.complete);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            format!("{}\n{}\n{}\n", wiki("A"), wiki("B"), wiki("C"))
        );
    }

    #[tokio::test]
    async fn test_cancelled_crawl_still_flushes_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.txt");
        let mut fetcher = MapFetcher::new(&[("A", &["B", "C"]), ("C", &["D"])]);
        fetcher.hanging.insert(wiki("B"));
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(TextSink::new(&path));
        sink.init().unwrap();

        let report = crawler_into(3, &fetcher, sink)
            .run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await;

        assert!(!report.complete);
        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert!(lines.contains(&wiki("A").as_str()));
        assert!(lines.contains(&wiki("B").as_str()));
        assert!(lines.contains(&wiki("C").as_str()));
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }

    #[tokio::test]
    async fn test_cancelled_crawl_leaves_records_in_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.db");
        let mut fetcher = MapFetcher::new(&[("A", &["B", "C"])]);
        fetcher.hanging.insert(wiki("B"));
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(SqliteSink::open(&path).unwrap());
        sink.init().unwrap();

        let report = crawler_into(3, &fetcher, sink.clone())
            .run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await;

        assert!(!report.complete);
        let stored = sink.list_recorded().unwrap();
        assert!(stored.contains(&wiki("A")));
        assert!(stored.contains(&wiki("B")));
        assert!(stored.contains(&wiki("C")));
    }

    #[tokio::test]
    async fn test_flush_failure_counts_as_persistence_error() {
        let fetcher = Arc::new(MapFetcher::new(&[("A", &["B"])]));
        let sink = Arc::new(RecordingSink {
            flush_fails: true,
            ..Default::default()
        });

        let report = crawler(2, 10, &fetcher, &sink).run().await;

        assert!(report.complete);
        assert_eq!(report.recorded, 2);
        assert_eq!(report.persistence_errors, 1);
        assert!(report.is_degraded());
    }

    #[tokio::test]
    async fn test_eager_fetcher_panic_counts_as_fetch() {
        let mut fetcher = MapFetcher::new(&[("A", &["B", "C"]), ("C", &["D"])]);
        fetcher.panicking_eagerly.insert(wiki("B"));
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(3, 10, &fetcher, &sink).run().await;

        assert_eq!(
            sink.depths(),
            expected(&[("A", 1), ("B", 2), ("C", 2), ("D", 3)])
        );
        assert_eq!(report.fetches, 3);
        assert_eq!(report.fetch_failures, 1);
        assert!(report.complete);
    }

    #[tokio::test]
    async fn test_links_differing_only_in_host_case_are_one_url() {
        let mut fetcher = MapFetcher::new(&[("A", &["B"])]);
        if let Some(links) = fetcher.graph.get_mut(&wiki("A")) {
            links.push("https://X.org/wiki/B".to_string());
            links.push("HTTPS://x.ORG/wiki/B".to_string());
        }
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());

        let report = crawler(2, 10, &fetcher, &sink).run().await;

        assert_eq!(sink.depths(), expected(&[("A", 1), ("B", 2)]));
        assert_eq!(report.recorded, 2);
        assert_eq!(report.duplicates, 2);
    }
}
