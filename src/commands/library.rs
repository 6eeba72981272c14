// AppDeck - Library Commands
// Delete, reorder and reset against the store

use rusqlite::Connection;

use crate::db::schema;
use crate::error::Result;
use crate::query;

/// Remove one app. Returns false when the id is unknown.
pub fn delete_app(conn: &Connection, id: &str) -> Result<bool> {
    let removed = schema::delete_app(conn, id)?;
    if removed {
        log::info!("Deleted app {}", id);
    } else {
        log::debug!("Delete ignored, no app {}", id);
    }
    Ok(removed)
}

/// Move `from_id` into the position `to_id` holds and renumber every app
/// 1..n. Returns false (and writes nothing) when either id is unknown or
/// both are the same.
pub fn reorder(conn: &Connection, from_id: &str, to_id: &str) -> Result<bool> {
    if from_id == to_id {
        return Ok(false);
    }

    let apps = schema::list_apps(conn)?;
    let mut ids: Vec<&str> = query::sorted(&apps).into_iter().map(|a| a.id.as_str()).collect();

    let from_idx = ids.iter().position(|id| *id == from_id);
    let to_idx = ids.iter().position(|id| *id == to_id);
    let (from_idx, to_idx) = match (from_idx, to_idx) {
        (Some(f), Some(t)) => (f, t),
        _ => {
            log::debug!("Reorder ignored, unknown app {} or {}", from_id, to_id);
            return Ok(false);
        }
    };

    let moved = ids.remove(from_idx);
    ids.insert(to_idx.min(ids.len()), moved);

    let tx = conn.unchecked_transaction()?;
    for (idx, id) in ids.iter().enumerate() {
        schema::update_app_order(&tx, id, idx as i64 + 1)?;
    }
    tx.commit()?;

    log::info!("Moved app {} to position {}", from_id, to_idx + 1);
    Ok(true)
}

/// Clear apps and meta in one transaction.
pub fn reset_all(conn: &Connection) -> Result<()> {
    schema::clear_all(conn)?;
    log::info!("Cleared all apps and settings");
    Ok(())
}
