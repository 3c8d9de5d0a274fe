// src/sink/sqlite.rs
// =============================================================================
// Structured output: a SQLite `links` table written incrementally.
//
// Each record is its own INSERT OR IGNORE, so whatever was crawled before a
// crash or cancellation is already on disk. The url column is the primary
// key; the first depth written for a URL is the one that stays.
// =============================================================================

use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{PersistenceError, Sink};

pub struct SqliteSink {
    // rusqlite connections are Send but not Sync; the mutex serializes writers
    conn: Mutex<Connection>,
}

impl SqliteSink {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, PersistenceError> {
        self.conn.lock().map_err(|_| PersistenceError::Poisoned)
    }
}

impl Sink for SqliteSink {
    fn init(&self) -> Result<(), PersistenceError> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS links (
                url   TEXT PRIMARY KEY NOT NULL,
                depth INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn record(&self, url: &str, depth: u32) -> Result<(), PersistenceError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached("INSERT OR IGNORE INTO links (url, depth) VALUES (?1, ?2)")?;
        stmt.execute(params![url, depth])?;
        Ok(())
    }

    fn list_recorded(&self) -> Result<BTreeSet<String>, PersistenceError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT url FROM links")?;
        let urls = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(urls)
    }
}
