// AppDeck - Intent Dispatcher
// User input becomes an Intent; dispatch gates it on edit mode and reports
// the outcome as a Notice for the renderer.

use std::fmt;

use crate::error::DeckError;
use crate::reconcile::SyncReport;
use crate::sources::capability::{FileHandle, HandleRef};
use super::dashboard::{Dashboard, EditMode};

pub enum Intent {
    SetQuery(String),
    SetEditMode(bool),
    ToggleEditMode,
    Open(String),
    Delete(String),
    Reorder { from: String, to: String },
    Import(Box<dyn FileHandle>),
    /// None rescans the remembered folder without prompting.
    Scan(Option<HandleRef>),
    Reload(String),
    Sync,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    QueryChanged { visible: usize },
    ModeChanged(EditMode),
    Opened(String),
    Deleted(String),
    Moved { from: String, to: String },
    Synced(SyncReport),
    /// Rescan had nothing to do (no remembered folder or no access).
    NothingToScan,
    Reset(SyncReport),
    /// Not allowed in the current mode, or refers to nothing.
    Ignored(String),
    Failed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::QueryChanged { visible } => write!(f, "{} app(s) match", visible),
            Notice::ModeChanged(EditMode::Editing) => write!(f, "Editing: drag to reorder, delete to remove"),
            Notice::ModeChanged(EditMode::Browsing) => write!(f, "Browsing"),
            Notice::Opened(target) => write!(f, "Opened {}", target),
            Notice::Deleted(id) => write!(f, "Deleted {}", id),
            Notice::Moved { from, to } => write!(f, "Moved {} to {}", from, to),
            Notice::Synced(r) => write!(
                f,
                "Synced {} item(s): {} added, {} updated, {} skipped",
                r.total, r.added, r.updated, r.skipped
            ),
            Notice::NothingToScan => write!(f, "No folder to rescan"),
            Notice::Reset(r) => write!(f, "Reset done, {} app(s) restored from the manifest", r.added),
            Notice::Ignored(why) => write!(f, "Ignored: {}", why),
            Notice::Failed(msg) => write!(f, "Failed: {}", msg),
        }
    }
}

impl Dashboard {
    /// Apply one intent. Errors become `Notice::Failed`.
    pub fn dispatch(&mut self, intent: Intent) -> Notice {
        let editing = self.view().mode.is_editing();

        let outcome = match intent {
            Intent::SetQuery(text) => Ok(Notice::QueryChanged { visible: self.set_query(&text) }),
            Intent::SetEditMode(on) => Ok(Notice::ModeChanged(self.set_edit_mode(on))),
            Intent::ToggleEditMode => Ok(Notice::ModeChanged(self.toggle_edit_mode())),

            Intent::Open(_) if editing => Ok(Notice::Ignored("open is disabled while editing".to_string())),
            Intent::Open(id) => self.open_app(&id).map(Notice::Opened),

            Intent::Delete(_) | Intent::Reorder { .. } if !editing => {
                Ok(Notice::Ignored("switch to edit mode first".to_string()))
            }
            Intent::Delete(id) => self.delete_app(&id).map(|removed| {
                if removed {
                    Notice::Deleted(id)
                } else {
                    Notice::Ignored(format!("no app {}", id))
                }
            }),
            Intent::Reorder { from, to } => self.reorder(&from, &to).map(|moved| {
                if moved {
                    Notice::Moved { from, to }
                } else {
                    Notice::Ignored("nothing to move".to_string())
                }
            }),

            Intent::Import(file) => self.import_file(file.as_ref()).map(Notice::Synced),
            Intent::Scan(Some(dir)) => self.scan_folder(&dir).map(Notice::Synced),
            Intent::Scan(None) => self
                .auto_scan_if_permitted()
                .map(|report| report.map_or(Notice::NothingToScan, Notice::Synced)),
            Intent::Reload(id) => self.reload_app(&id).map(Notice::Synced),
            Intent::Sync => self.sync_from_manifest().map(Notice::Synced),
            Intent::Reset => self.reset_all().map(Notice::Reset),
        };

        outcome.unwrap_or_else(|e| {
            match &e {
                DeckError::CapabilityDenied(_) | DeckError::UnsupportedEnvironment(_) => {
                    log::warn!("{}", e)
                }
                _ => log::error!("Command failed: {}", e),
            }
            Notice::Failed(e.to_string())
        })
    }
}
