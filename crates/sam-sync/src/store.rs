//! SQLite store: connection handling, schema management and the
//! staging swap.
//!
//! The live tables are only ever replaced wholesale: imports write
//! `stg_` shadow tables and [`SamStore::swap_staging`] renames them
//! over the live set in a single transaction, so readers observe
//! either the previous complete version or the new one.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use rusqlite::{Connection, ErrorCode, OptionalExtension};
use tracing::{info, warn};

use crate::error::{SyncError, SyncResult};
use crate::schema::{staging_name, ALL_SPECS};

/// Write attempts before a batch is given up on.
const MAX_ATTEMPTS: u32 = 3;
/// Base backoff, doubled per attempt.
const BACKOFF_BASE: Duration = Duration::from_millis(100);

/// Handle on the target database.
pub struct SamStore {
    conn: Connection,
    path: PathBuf,
}

impl SamStore {
    /// Opens (creating if necessary) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(SamStore { conn, path })
    }

    /// Creates all live tables that do not exist yet.
    pub fn ensure_schema(&self) -> SyncResult<()> {
        for spec in &ALL_SPECS {
            self.conn.execute_batch(&spec.create_sql(spec.name))?;
        }
        Ok(())
    }

    /// Drops and recreates every staging table, leaving them empty.
    pub fn reset_staging(&self) -> SyncResult<()> {
        for spec in &ALL_SPECS {
            let staging = spec.staging_name();
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS \"{staging}\""))?;
            self.conn.execute_batch(&spec.create_sql(&staging))?;
        }
        Ok(())
    }

    /// Creates any missing staging tables without touching existing
    /// ones. Used when resuming a partially imported run.
    pub fn ensure_staging(&self) -> SyncResult<()> {
        for spec in &ALL_SPECS {
            self.conn
                .execute_batch(&spec.create_sql(&spec.staging_name()))?;
        }
        Ok(())
    }

    /// Runs a write closure with bounded retries.
    ///
    /// Busy/locked failures get exponential backoff and a fresh
    /// connection before the next attempt; any other error aborts
    /// immediately.
    pub fn with_retry<T>(
        &mut self,
        op: impl Fn(&Connection) -> rusqlite::Result<T>,
    ) -> SyncResult<T> {
        let mut attempt = 0;
        loop {
            match op(&self.conn) {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < MAX_ATTEMPTS && is_transient(&e) => {
                    attempt += 1;
                    let pause = BACKOFF_BASE * 2u32.pow(attempt);
                    warn!(attempt, error = %e, "database busy, backing off");
                    thread::sleep(pause);
                    self.reconnect()?;
                }
                Err(e) if is_transient(&e) => {
                    return Err(SyncError::RetriesExhausted {
                        attempts: MAX_ATTEMPTS,
                        source: e,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn reconnect(&mut self) -> SyncResult<()> {
        self.conn = Connection::open(&self.path)?;
        Ok(())
    }

    /// Renames every staging table over its live counterpart in one
    /// transaction.
    ///
    /// Any failure rolls the whole swap back, leaving the previous
    /// live tables untouched.
    pub fn swap_staging(&mut self) -> SyncResult<()> {
        let tx = self.conn.transaction()?;
        for spec in &ALL_SPECS {
            let table = spec.name;
            let staging = staging_name(table);
            if table_exists(&tx, table)? {
                tx.execute_batch(&format!(
                    "ALTER TABLE \"{table}\" RENAME TO \"old_{table}\""
                ))?;
            }
            tx.execute_batch(&format!("ALTER TABLE \"{staging}\" RENAME TO \"{table}\""))?;
        }
        for spec in &ALL_SPECS {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS \"old_{}\"", spec.name))?;
        }
        tx.commit()?;
        info!("staging tables swapped live");
        Ok(())
    }

    /// Row count of a table, or zero if the table does not exist.
    pub fn table_count(&self, table: &str) -> SyncResult<usize> {
        if !table_exists(&self.conn, table)? {
            return Ok(0);
        }
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    /// DMPP keys already present in the staging tables.
    ///
    /// Resuming a run that skips the AMP file must still validate the
    /// reimbursement file, so the validator set is reseeded from what
    /// the interrupted run staged.
    pub fn staged_dmpp_keys(&self) -> SyncResult<Vec<(String, String)>> {
        let staging = staging_name(sam_types::tables::DMPP);
        if !table_exists(&self.conn, &staging)? {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT \"code\", \"delivery_environment\" FROM \"{staging}\""
            ))?;
        let keys = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    /// Direct connection access, for statements the store does not
    /// wrap.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn is_transient(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked
    )
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}
