// Database schema types and query helpers

use rusqlite::{Connection, params, OptionalExtension};
use rusqlite::types::Type;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sources::capability::HandleRef;

// ----- AppSource -----

/// Where an app record first came from. Informational only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppSource {
    Bundled,
    File,
    Folder,
}

impl AppSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppSource::Bundled => "bundled",
            AppSource::File => "file",
            AppSource::Folder => "folder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bundled" => Some(AppSource::Bundled),
            "file" => Some(AppSource::File),
            "folder" => Some(AppSource::Folder),
            _ => None,
        }
    }
}

// ----- AppRecord -----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: String,
    pub name: String,
    pub filename: String,
    pub icon: String,
    pub source: AppSource,
    pub order: Option<i64>,
    pub updated_at: String,
    #[serde(skip_serializing)]
    pub content: String,
    pub capability: Option<HandleRef>,
}

const APP_COLUMNS: &str =
    "id, name, filename, icon, source, sort_order, updated_at, content, capability";

fn map_app(row: &rusqlite::Row) -> rusqlite::Result<AppRecord> {
    let source_raw: String = row.get(4)?;
    let source = AppSource::parse(&source_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("unknown app source '{}'", source_raw).into(),
        )
    })?;

    let capability_raw: Option<String> = row.get(8)?;
    let capability = match capability_raw {
        Some(raw) => Some(
            serde_json::from_str::<HandleRef>(&raw)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?,
        ),
        None => None,
    };

    Ok(AppRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        filename: row.get(2)?,
        icon: row.get(3)?,
        source,
        order: row.get(5)?,
        updated_at: row.get(6)?,
        content: row.get(7)?,
        capability,
    })
}

/// Insert or replace a record by primary key
pub fn put_app(conn: &Connection, app: &AppRecord) -> Result<()> {
    let capability = match &app.capability {
        Some(handle) => Some(serde_json::to_string(handle)?),
        None => None,
    };

    conn.execute(
        "INSERT INTO apps (id, name, filename, icon, source, sort_order, updated_at, content, capability)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            filename = excluded.filename,
            icon = excluded.icon,
            source = excluded.source,
            sort_order = excluded.sort_order,
            updated_at = excluded.updated_at,
            content = excluded.content,
            capability = excluded.capability",
        params![
            app.id,
            app.name,
            app.filename,
            app.icon,
            app.source.as_str(),
            app.order,
            app.updated_at,
            app.content,
            capability,
        ],
    )?;
    Ok(())
}

pub fn get_app(conn: &Connection, id: &str) -> Result<Option<AppRecord>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM apps WHERE id = ?1", APP_COLUMNS),
        params![id],
        map_app,
    ).optional()?;
    Ok(result)
}

pub fn get_app_by_filename(conn: &Connection, filename: &str) -> Result<Option<AppRecord>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM apps WHERE filename = ?1", APP_COLUMNS),
        params![filename],
        map_app,
    ).optional()?;
    Ok(result)
}

/// All records, ascending by order. Records without an order come last.
pub fn list_apps(conn: &Connection) -> Result<Vec<AppRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM apps ORDER BY sort_order IS NULL, sort_order ASC, name COLLATE NOCASE ASC",
        APP_COLUMNS
    ))?;
    let apps = stmt
        .query_map([], map_app)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(apps)
}

pub fn count_apps(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM apps", [], |row| row.get(0))?;
    Ok(count)
}

/// Delete a record. Returns false when the id was unknown.
pub fn delete_app(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM apps WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

/// Rewrite only the order of a record; content and updated_at stay as they are.
pub fn update_app_order(conn: &Connection, id: &str, order: i64) -> Result<()> {
    conn.execute(
        "UPDATE apps SET sort_order = ?1 WHERE id = ?2",
        params![order, id],
    )?;
    Ok(())
}

// ----- Meta -----

pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn.query_row(
        "SELECT value FROM meta WHERE key = ?1",
        params![key],
        |row| row.get(0),
    ).optional()?;

    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn put_meta(conn: &Connection, key: &str, value: &serde_json::Value) -> Result<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, serde_json::to_string(value)?],
    )?;
    Ok(())
}

pub fn delete_meta(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM meta WHERE key = ?1", params![key])?;
    Ok(())
}

/// Wipe both collections in one transaction
pub fn clear_all(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM apps", [])?;
    tx.execute("DELETE FROM meta", [])?;
    tx.commit()?;
    Ok(())
}
