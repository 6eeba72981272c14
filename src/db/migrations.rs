// Database migrations
// Migrations are forward-only. Never edit or delete a migration after it ships.

use rusqlite::Connection;
use anyhow::Result;

/// All migrations in order. Each migration is a SQL string.
const MIGRATIONS: &[&str] = &[
    // Migration 1: apps + meta collections
    r#"
    CREATE TABLE apps (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        filename TEXT NOT NULL UNIQUE,
        icon TEXT NOT NULL,
        source TEXT NOT NULL CHECK (source IN ('bundled', 'file', 'folder')),
        sort_order INTEGER,
        updated_at TEXT NOT NULL,
        content TEXT NOT NULL,
        capability TEXT
    );

    CREATE TABLE meta (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    );

    CREATE INDEX idx_apps_order ON apps(sort_order);
    CREATE INDEX idx_apps_name ON apps(name);
    "#,
];

/// Get current schema version from database
fn get_schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row(
        "PRAGMA user_version",
        [],
        |row| row.get(0)
    )?;
    Ok(version)
}

/// Run all pending migrations (crash-safe)
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    let target_version = MIGRATIONS.len() as u32;

    // Refuse to open a DB created by a newer build
    if current_version > target_version {
        anyhow::bail!(
            "Database schema version {} is newer than this build supports (max {}). Please upgrade AppDeck.",
            current_version,
            target_version
        );
    }

    if current_version == target_version {
        return Ok(());
    }

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as u32;
        if migration_version <= current_version {
            continue;
        }

        // Schema change and version bump land together or not at all
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration)?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", migration_version))?;
        tx.commit()?;

        log::info!("Applied migration {}", migration_version);
    }

    Ok(())
}
