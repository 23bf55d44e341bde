//! Process-wide store handle.
//!
//! # Responsibility
//! - Hold the single SQLite connection used by the note store.
//! - Open it lazily, reuse it across calls and release it at shutdown.
//!
//! # Invariants
//! - A failed open leaves the slot empty, so the next call retries.
//! - Access to the connection is serialized by one mutex.
//! - An in-memory target keeps its data only while the connection is open.

use super::open::{open_db, open_db_in_memory};
use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

const MEMORY_URL: &str = ":memory:";

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

impl DbTarget {
    /// Resolves a storage connection string.
    ///
    /// Accepts `:memory:`, a plain path, or a path prefixed with `sqlite://`
    /// or `sqlite:`.
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim();
        let path = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);
        if path == MEMORY_URL {
            Self::Memory
        } else {
            Self::File(PathBuf::from(path))
        }
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Explicitly constructed handle over the note database.
#[derive(Debug)]
pub struct Database {
    target: DbTarget,
    conn: Mutex<Option<Connection>>,
}

impl Database {
    /// Creates a handle that connects on first use.
    pub fn new(target: DbTarget) -> Self {
        Self {
            target,
            conn: Mutex::new(None),
        }
    }

    /// Creates a handle and connects immediately.
    ///
    /// # Errors
    /// Returns the open/migration failure so startup can abort.
    pub fn open(target: DbTarget) -> DbResult<Self> {
        let database = Self::new(target);
        database.with_connection(|_| Ok::<(), DbError>(()))?;
        Ok(database)
    }

    /// Creates a connected in-memory handle.
    pub fn in_memory() -> DbResult<Self> {
        Self::open(DbTarget::Memory)
    }

    pub fn target(&self) -> &DbTarget {
        &self.target
    }

    /// Returns whether a live connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.lock_slot().is_some()
    }

    /// Runs `f` against the shared connection, connecting first if needed.
    ///
    /// # Errors
    /// - Returns the open/migration error when no connection can be made.
    /// - Returns whatever `f` returns.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let mut slot = self.lock_slot();
        let conn = match slot.take() {
            Some(conn) => slot.insert(conn),
            None => {
                let opened = match &self.target {
                    DbTarget::File(path) => open_db(path),
                    DbTarget::Memory => open_db_in_memory(),
                };
                match opened {
                    Ok(conn) => slot.insert(conn),
                    Err(err) => {
                        warn!(
                            "event=db_connect module=db status=error mode={} error={}",
                            self.target.mode(),
                            err
                        );
                        return Err(err.into());
                    }
                }
            }
        };
        f(conn)
    }

    /// Releases the held connection, if any.
    ///
    /// A later call to `with_connection` reconnects.
    pub fn close(&self) {
        let mut slot = self.lock_slot();
        if slot.take().is_some() {
            info!(
                "event=db_close module=db status=ok mode={}",
                self.target.mode()
            );
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Connection>> {
        // A panic inside `f` cannot leave the connection half-written; keep using it.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
