// Reconciler
// Merges a candidate batch into the apps collection. One snapshot read and
// one batch write, both inside a single IMMEDIATE transaction, so a second
// writer cannot interleave between the lookup and the write.

use std::collections::{BTreeSet, HashMap};

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{APP_ID_PREFIX, FALLBACK_GLYPH_IMPORT};
use crate::db::schema::{self, AppRecord, AppSource};
use crate::error::{DeckError, Result};
use crate::icon::{extract_icon, fallback_icon};
use crate::sources::capability::FileSystemAccess;
use crate::sources::{app_name_from_filename, Candidate, CandidateBatch};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    pub total: usize,
}

impl SyncReport {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

pub fn new_app_id() -> String {
    format!("{}{}", APP_ID_PREFIX, Uuid::new_v4().simple())
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Merge candidates into the store.
///
/// New filenames get a fresh id, `order = size + 1` and `default_source`.
/// Known filenames keep id and order; source and capability are replaced
/// only when the candidate carries one. Failed candidates count as skipped.
pub fn reconcile(conn: &Connection, candidates: CandidateBatch, default_source: AppSource) -> Result<SyncReport> {
    let mut report = SyncReport { total: candidates.len(), ..SyncReport::default() };

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let mut working = schema::list_apps(&tx)?;
    let mut by_filename: HashMap<String, usize> = working
        .iter()
        .enumerate()
        .map(|(idx, app)| (app.filename.clone(), idx))
        .collect();
    let mut touched = BTreeSet::new();

    for candidate in candidates {
        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(e) => {
                log::warn!("Skipping candidate: {}", e);
                report.skipped += 1;
                continue;
            }
        };

        let icon = extract_icon(&candidate.content)
            .unwrap_or_else(|| fallback_icon(FALLBACK_GLYPH_IMPORT));
        let name = app_name_from_filename(&candidate.filename);

        match by_filename.get(&candidate.filename).copied() {
            Some(idx) => {
                apply_update(&mut working[idx], candidate, name, icon);
                touched.insert(idx);
                report.updated += 1;
            }
            None => {
                let record = new_record(candidate, name, icon, working.len() as i64 + 1, default_source);
                log::debug!("New app {} ({}) at order {:?}", record.filename, record.id, record.order);
                by_filename.insert(record.filename.clone(), working.len());
                touched.insert(working.len());
                working.push(record);
                report.added += 1;
            }
        }
    }

    for idx in touched {
        schema::put_app(&tx, &working[idx])?;
    }
    tx.commit()?;

    log::info!(
        "Reconciled {} candidates: +{} added, {} updated, {} skipped",
        report.total, report.added, report.updated, report.skipped
    );
    Ok(report)
}

fn new_record(candidate: Candidate, name: String, icon: String, order: i64, default_source: AppSource) -> AppRecord {
    AppRecord {
        id: new_app_id(),
        name,
        filename: candidate.filename,
        icon,
        source: candidate.source.unwrap_or(default_source),
        order: Some(order),
        updated_at: timestamp_now(),
        content: candidate.content,
        capability: candidate.capability,
    }
}

fn apply_update(app: &mut AppRecord, candidate: Candidate, name: String, icon: String) {
    log::debug!("Refreshing app {} ({})", app.filename, app.id);
    app.name = name;
    app.icon = icon;
    app.content = candidate.content;
    app.updated_at = timestamp_now();
    if let Some(source) = candidate.source {
        app.source = source;
    }
    if let Some(capability) = candidate.capability {
        app.capability = Some(capability);
    }
}

/// Re-read a record's live file through its stored capability.
pub fn reload_app(conn: &Connection, fs: &dyn FileSystemAccess, id: &str) -> Result<SyncReport> {
    let app = schema::get_app(conn, id)?
        .ok_or_else(|| DeckError::AppNotFound(id.to_string()))?;
    let capability = app.capability.clone()
        .ok_or_else(|| DeckError::Read(format!("{} has no live file to re-read", app.filename)))?;

    let file = fs.open_file(&capability)?;
    let content = file.read_text()?;

    let candidate = Candidate::new(app.filename, content).with_capability(capability);
    reconcile(conn, vec![Ok(candidate)], app.source)
}
