// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread, which
//! serializes writers. Open one [`Database`] per file.

use std::path::Path;
use std::time::Duration;

use ecosort_core::EcosortError;
use tracing::{debug, info};

use crate::migrations::run_migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a tokio-rusqlite error into `EcosortError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> EcosortError {
    EcosortError::Storage {
        source: Box::new(e),
    }
}

fn map_setup_err(e: tokio_rusqlite::Error<EcosortError>) -> EcosortError {
    EcosortError::Storage {
        source: Box::new(e),
    }
}

/// A migrated SQLite database behind a single writer thread.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` and bring the schema up to date.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, EcosortError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| EcosortError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| EcosortError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        info!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// A private in-memory database with the full schema.
    pub async fn open_in_memory() -> Result<Self, EcosortError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| EcosortError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), EcosortError> {
        self.conn
            .call(move |conn| -> Result<(), EcosortError> {
                let storage = |e: rusqlite::Error| EcosortError::Storage {
                    source: Box::new(e),
                };
                if wal_mode {
                    let mode: String = conn
                        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                        .map_err(storage)?;
                    debug!(journal_mode = %mode, "journal mode set");
                }
                conn.pragma_update(None, "foreign_keys", "ON").map_err(storage)?;
                conn.busy_timeout(BUSY_TIMEOUT).map_err(storage)?;
                conn.pragma_update(None, "synchronous", "NORMAL").map_err(storage)?;
                run_migrations(conn)
            })
            .await
            .map_err(map_setup_err)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Fold the WAL back into the main database file.
    pub async fn checkpoint(&self) -> Result<(), EcosortError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
