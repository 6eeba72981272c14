// Database module

pub mod migrations;
pub mod schema;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::constants::{BUSY_TIMEOUT_MS, DB_FILENAME};

/// Open or create the dashboard database at the given path
pub fn open_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Cannot create database directory {}: {}. Check directory permissions.",
                parent.display(),
                e
            )
        })?;
    }

    let conn = Connection::open(db_path)?;

    // WAL lets a second process read while a sync is writing
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    configure(&conn)?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Open a private in-memory database with all migrations applied.
/// Used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Get the database path inside a data directory
pub fn get_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILENAME)
}
