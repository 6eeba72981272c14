// Launcher
// Opening an app writes its stored content to <data_dir>/open/<id>.html and
// hands that file to the platform's default handler.

use std::path::{Path, PathBuf};

use crate::db::schema::AppRecord;
use crate::error::{DeckError, Result};
use crate::sources::manifest::resolve_app_location;

/// Presents a document location (path or URL) to the user.
pub trait Launcher {
    fn present(&self, target: &str) -> Result<()>;
}

/// Default browser / file handler via the `open` crate.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn present(&self, target: &str) -> Result<()> {
        open::that(target).map_err(|e| DeckError::Launch(format!("{}: {}", target, e)))
    }
}

/// Write the stored markup to the open folder. Overwrites any earlier copy.
pub fn materialize(open_dir: &Path, app: &AppRecord) -> Result<PathBuf> {
    std::fs::create_dir_all(open_dir)?;
    let path = opened_copy_path(open_dir, &app.id);
    std::fs::write(&path, &app.content)?;
    Ok(path)
}

pub fn opened_copy_path(open_dir: &Path, id: &str) -> PathBuf {
    open_dir.join(format!("{}.html", id))
}

/// Remove the opened copy of one app. Best-effort: failures are logged.
pub fn discard(open_dir: &Path, id: &str) {
    remove_copy(&opened_copy_path(open_dir, id));
}

/// Remove every opened copy. The open folder itself stays.
pub fn discard_all(open_dir: &Path) {
    let entries = match std::fs::read_dir(open_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
        Err(e) => {
            log::warn!("Cannot list {}: {}", open_dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "html") {
            remove_copy(&path);
        }
    }
}

fn remove_copy(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed opened copy {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Cannot remove opened copy {}: {}", path.display(), e),
    }
}

/// Where the app originally lives: its live file, else its manifest location.
pub fn original_location(manifest: &str, app: &AppRecord) -> String {
    match &app.capability {
        Some(handle) => handle.path.clone(),
        None => resolve_app_location(manifest, &app.filename),
    }
}

/// Open an app from its stored content, falling back to the original
/// location when that fails. Returns what was presented.
pub fn open_app(launcher: &dyn Launcher, open_dir: &Path, manifest: &str, app: &AppRecord) -> Result<String> {
    let attempt = materialize(open_dir, app).and_then(|path| {
        let target = path.to_string_lossy().to_string();
        launcher.present(&target).map(|_| target)
    });

    match attempt {
        Ok(target) => {
            log::info!("Opened {} from stored content", app.filename);
            Ok(target)
        }
        Err(e) => {
            let fallback = original_location(manifest, app);
            log::warn!("Opening stored copy of {} failed ({}), trying {}", app.filename, e, fallback);
            launcher.present(&fallback)?;
            Ok(fallback)
        }
    }
}
