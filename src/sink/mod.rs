// src/sink/mod.rs
// =============================================================================
// Where accepted (url, depth) records end up.
//
// Submodules:
// - text: one URL per line, sorted, written once when the crawl finishes
// - sqlite: a `links` table, one INSERT OR IGNORE per record
//
// Both treat a repeated URL as a no-op that keeps the first depth. The crawl
// already deduplicates through VisitedSet; this is a second guard at the
// storage layer.
// =============================================================================

mod sqlite;
mod text;

pub use sqlite::SqliteSink;
pub use text::TextSink;

use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Durable destination for crawl records.
///
/// Implementations must be safe to call from several tasks at once.
pub trait Sink: Send + Sync {
    /// Creates the backing structure if missing. Safe to call repeatedly.
    fn init(&self) -> Result<(), PersistenceError>;

    fn record(&self, url: &str, depth: u32) -> Result<(), PersistenceError>;

    fn list_recorded(&self) -> Result<BTreeSet<String>, PersistenceError>;

    /// Flushes anything buffered. Called once after the crawl ends.
    fn finish(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("sink lock poisoned")]
    Poisoned,
}

/// The output shapes the CLI can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SinkKind {
    /// Sorted plain-text list of URLs
    Text,
    /// SQLite database with a `links(url, depth)` table
    Sqlite,
}

impl SinkKind {
    /// Picks the format from the file extension: .db, .sqlite and .sqlite3 mean SQLite
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("db") | Some("sqlite") | Some("sqlite3") => SinkKind::Sqlite,
            _ => SinkKind::Text,
        }
    }
}

/// Opens and initializes a sink of the given kind at `path`
pub fn open_sink(kind: SinkKind, path: &Path) -> Result<Box<dyn Sink>, PersistenceError> {
    let sink: Box<dyn Sink> = match kind {
        SinkKind::Text => Box::new(TextSink::new(path)),
        SinkKind::Sqlite => Box::new(SqliteSink::open(path)?),
    };
    sink.init()?;
    Ok(sink)
}
