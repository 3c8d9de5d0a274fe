// src/sink/text.rs
// =============================================================================
// Flat text output: every recorded URL on its own line, sorted.
//
// Records are kept in memory during the crawl and written in one go by
// finish(), so a crawl that dies half-way leaves no half-written file.
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{PersistenceError, Sink};

#[derive(Debug)]
pub struct TextSink {
    path: PathBuf,
    // url -> first depth; BTreeMap keeps the lexicographic order for free
    records: Mutex<BTreeMap<String, u32>>,
}

impl TextSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            records: Mutex::new(BTreeMap::new()),
        }
    }

    fn records(&self) -> Result<MutexGuard<'_, BTreeMap<String, u32>>, PersistenceError> {
        self.records.lock().map_err(|_| PersistenceError::Poisoned)
    }
}

impl Sink for TextSink {
    fn init(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn record(&self, url: &str, depth: u32) -> Result<(), PersistenceError> {
        self.records()?.entry(url.to_string()).or_insert(depth);
        Ok(())
    }

    fn list_recorded(&self) -> Result<BTreeSet<String>, PersistenceError> {
        Ok(self.records()?.keys().cloned().collect())
    }

    fn finish(&self) -> Result<(), PersistenceError> {
        let records = self.records()?;
        let mut out = BufWriter::new(fs::File::create(&self.path)?);
        for url in records.keys() {
            writeln!(out, "{}", url)?;
        }
        out.flush()?;
        Ok(())
    }
}
