// AppDeck - Dashboard
// Application state: one store connection, the sources it syncs from, and the
// view (edit mode, query, cached app list) the renderer draws.

use rusqlite::Connection;
use serde::Serialize;

use crate::config::Config;
use crate::constants::META_FOLDER_HANDLE;
use crate::db::{self, schema};
use crate::db::schema::{AppRecord, AppSource};
use crate::error::{DeckError, Result};
use crate::launcher::{self, Launcher, SystemLauncher};
use crate::query;
use crate::reconcile::{self, SyncReport};
use crate::sources::capability::{
    DirectoryHandle, FileHandle, FileSystemAccess, HandleKind, HandleRef, NativeFs, Permission,
};
use crate::sources::manifest::{self, AutoTransport, Transport};
use crate::sources::{file_pick, folder};
use super::cards::{self, Card};
use super::library;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Browsing,
    Editing,
}

impl EditMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditMode::Editing)
    }
}

/// Everything the renderer needs. Rebuilt from the store after every command.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub mode: EditMode,
    pub query: String,
    pub apps: Vec<AppRecord>,
}

impl ViewState {
    /// Filtered and sorted, in grid order.
    pub fn visible_apps(&self) -> Vec<&AppRecord> {
        query::sorted(query::visible(&self.apps, &self.query))
    }
}

pub struct Dashboard {
    conn: Connection,
    config: Config,
    transport: Box<dyn Transport>,
    fs: Option<Box<dyn FileSystemAccess>>,
    launcher: Box<dyn Launcher>,
    view: ViewState,
}

impl Dashboard {
    /// Open the store under the configured data directory with native
    /// transport, file access and launcher.
    pub fn open(config: Config) -> Result<Self> {
        config.ensure_dirs()?;
        let conn = db::open_db(&config.db_path())?;
        let transport = Box::new(AutoTransport::new(config.http_timeout));

        Self::with_parts(
            conn,
            config,
            transport,
            Some(Box::new(NativeFs)),
            Box::new(SystemLauncher),
        )
    }

    /// Assemble from explicit parts. `fs = None` disables folder features.
    pub fn with_parts(
        conn: Connection,
        config: Config,
        transport: Box<dyn Transport>,
        fs: Option<Box<dyn FileSystemAccess>>,
        launcher: Box<dyn Launcher>,
    ) -> Result<Self> {
        let mut dashboard = Self {
            conn,
            config,
            transport,
            fs,
            launcher,
            view: ViewState::default(),
        };
        dashboard.refresh()?;
        Ok(dashboard)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Reload the cached app list from the store.
    pub fn refresh(&mut self) -> Result<()> {
        self.view.apps = schema::list_apps(&self.conn)?;
        Ok(())
    }

    pub fn cards(&self) -> Vec<Card> {
        cards::cards(&self.view)
    }

    pub fn find_app(&self, id: &str) -> Option<&AppRecord> {
        self.view.apps.iter().find(|app| app.id == id)
    }

    // ----- Sources -----

    /// Pull every app listed in the manifest. An unreachable manifest is
    /// an empty sync, not an error.
    pub fn sync_from_manifest(&mut self) -> Result<SyncReport> {
        let batch = manifest::collect_candidates(self.transport.as_ref(), &self.config.manifest);
        let report = reconcile::reconcile(&self.conn, batch, AppSource::Bundled)?;
        self.refresh()?;
        Ok(report)
    }

    /// Import one picked file. Reserved or non-HTML names are refused,
    /// a read failure counts as skipped.
    pub fn import_file(&mut self, file: &dyn FileHandle) -> Result<SyncReport> {
        let candidate = file_pick::pick_candidate(file);
        if let Err(DeckError::ExcludedName(name)) = &candidate {
            return Err(DeckError::ExcludedName(name.clone()));
        }

        let report = reconcile::reconcile(&self.conn, vec![candidate], AppSource::File)?;
        self.refresh()?;
        Ok(report)
    }

    /// Scan a user-chosen folder, asking for access if needed, and remember
    /// it for later auto-scans.
    pub fn scan_folder(&mut self, dir: &HandleRef) -> Result<SyncReport> {
        let fs = self.fs.as_ref().ok_or_else(|| {
            DeckError::UnsupportedEnvironment("folder access is not available".to_string())
        })?;
        let handle = fs.open_directory(dir)?;

        let permission = match handle.query_permission() {
            Permission::Granted => Permission::Granted,
            _ => handle.request_permission(),
        };
        if permission != Permission::Granted {
            return Err(DeckError::CapabilityDenied(format!("read access to {}", dir.path)));
        }

        schema::put_meta(&self.conn, META_FOLDER_HANDLE, &serde_json::to_value(handle.handle_ref())?)?;
        log::info!("Remembered folder {}", dir.path);

        self.scan_handle(handle.as_ref())
    }

    /// Rescan the remembered folder. A denied folder is skipped, a folder
    /// whose access needs a prompt gets one. Returns None when there was
    /// nothing to do.
    pub fn auto_scan_if_permitted(&mut self) -> Result<Option<SyncReport>> {
        let fs = match &self.fs {
            Some(fs) => fs,
            None => return Ok(None),
        };
        let stored = match self.remembered_folder()? {
            Some(stored) => stored,
            None => return Ok(None),
        };

        let handle = match fs.open_directory(&stored) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("Auto-scan skipped, cannot reopen {}: {}", stored.path, e);
                return Ok(None);
            }
        };
        let permission = match handle.query_permission() {
            Permission::Denied => Permission::Denied,
            Permission::Granted => Permission::Granted,
            Permission::Prompt => handle.request_permission(),
        };
        if permission != Permission::Granted {
            log::debug!("Auto-scan skipped, no access to {}", stored.path);
            return Ok(None);
        }

        match self.scan_handle(handle.as_ref()) {
            Ok(report) => Ok(Some(report)),
            Err(DeckError::Database(e)) => Err(DeckError::Database(e)),
            Err(e) => {
                log::warn!("Auto-scan of {} failed: {}", stored.path, e);
                Ok(None)
            }
        }
    }

    /// The folder handle saved by the last explicit scan. A stored value
    /// that is not a directory handle is dropped.
    pub fn remembered_folder(&self) -> Result<Option<HandleRef>> {
        let value = match schema::get_meta(&self.conn, META_FOLDER_HANDLE)? {
            Some(value) => value,
            None => return Ok(None),
        };

        match serde_json::from_value::<HandleRef>(value) {
            Ok(handle) if handle.kind == HandleKind::Directory => Ok(Some(handle)),
            Ok(handle) => {
                log::warn!("Dropping stored folder handle {}: not a directory", handle.path);
                schema::delete_meta(&self.conn, META_FOLDER_HANDLE)?;
                Ok(None)
            }
            Err(e) => {
                log::warn!("Dropping unreadable stored folder handle: {}", e);
                schema::delete_meta(&self.conn, META_FOLDER_HANDLE)?;
                Ok(None)
            }
        }
    }

    fn scan_handle(&mut self, handle: &dyn DirectoryHandle) -> Result<SyncReport> {
        let batch = folder::scan_candidates(handle)?;
        let report = reconcile::reconcile(&self.conn, batch, AppSource::Folder)?;
        self.refresh()?;
        Ok(report)
    }

    /// Re-read one folder-sourced app from its live file.
    pub fn reload_app(&mut self, id: &str) -> Result<SyncReport> {
        let fs = self.fs.as_ref().ok_or_else(|| {
            DeckError::UnsupportedEnvironment("file access is not available".to_string())
        })?;
        let report = reconcile::reload_app(&self.conn, &**fs, id)?;
        self.refresh()?;
        Ok(report)
    }

    // ----- Library edits -----

    /// Delete an app and any opened copy of it.
    pub fn delete_app(&mut self, id: &str) -> Result<bool> {
        let removed = library::delete_app(&self.conn, id)?;
        if removed {
            launcher::discard(&self.config.open_dir(), id);
            self.refresh()?;
        }
        Ok(removed)
    }

    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> Result<bool> {
        let moved = library::reorder(&self.conn, from_id, to_id)?;
        if moved {
            self.refresh()?;
        }
        Ok(moved)
    }

    /// Clear the store and the opened copies, then pull the manifest again.
    pub fn reset_all(&mut self) -> Result<SyncReport> {
        library::reset_all(&self.conn)?;
        launcher::discard_all(&self.config.open_dir());
        self.sync_from_manifest()
    }

    // ----- View state -----

    pub fn set_edit_mode(&mut self, editing: bool) -> EditMode {
        self.view.mode = if editing { EditMode::Editing } else { EditMode::Browsing };
        self.view.mode
    }

    pub fn toggle_edit_mode(&mut self) -> EditMode {
        let editing = !self.view.mode.is_editing();
        self.set_edit_mode(editing)
    }

    /// Returns how many apps match.
    pub fn set_query(&mut self, text: &str) -> usize {
        self.view.query = text.to_string();
        query::visible(&self.view.apps, &self.view.query).len()
    }

    // ----- Open -----

    /// Open an app. Returns the location handed to the launcher.
    pub fn open_app(&self, id: &str) -> Result<String> {
        let app = self.find_app(id).ok_or_else(|| DeckError::AppNotFound(id.to_string()))?;
        launcher::open_app(self.launcher.as_ref(), &self.config.open_dir(), &self.config.manifest, app)
    }
}
