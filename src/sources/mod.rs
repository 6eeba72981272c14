// Source adapters
// Each adapter turns one kind of origin into (filename, html) candidates.
// Per-candidate failures stay in the batch as Err so the reconciler can
// count them without aborting.

pub mod capability;
pub mod file_pick;
pub mod folder;
pub mod manifest;

use crate::constants::{APP_EXTENSIONS, RESERVED_INDEX, RESERVED_PREFIX};
use crate::db::schema::AppSource;
use crate::error::Result;
use capability::HandleRef;

/// Raw material for one app record.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub filename: String,
    pub content: String,
    /// Explicit source override. None keeps an existing record's source.
    pub source: Option<AppSource>,
    /// Re-readable handle. None keeps an existing record's capability.
    pub capability: Option<HandleRef>,
}

impl Candidate {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            source: None,
            capability: None,
        }
    }

    pub fn with_source(mut self, source: AppSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_capability(mut self, capability: HandleRef) -> Self {
        self.capability = Some(capability);
        self
    }
}

pub type CandidateBatch = Vec<Result<Candidate>>;

/// Final path component, splitting on both separator styles.
pub fn base_name(filename: &str) -> &str {
    filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(filename)
}

/// Shared exclusion policy for every adapter. Keeps only .html/.htm files and
/// rejects the dashboard shell itself (index.html, dashboard.*).
///
/// The reserved names match the whole entry, so `apps/index.html` listed in
/// a manifest is an ordinary app.
pub fn is_app_filename(filename: &str) -> bool {
    let entry = filename.trim().to_lowercase();

    let has_app_extension = base_name(&entry)
        .rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && APP_EXTENSIONS.contains(&ext))
        .unwrap_or(false);
    if !has_app_extension {
        return false;
    }

    entry != RESERVED_INDEX && !entry.starts_with(RESERVED_PREFIX)
}

/// Display name for a filename: directory and .html/.htm extension removed.
pub fn app_name_from_filename(filename: &str) -> String {
    let name = base_name(filename);
    match name.rsplit_once('.') {
        Some((stem, ext)) if APP_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => stem.to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_app_filename() {
        assert!(is_app_filename("todo.html"));
        assert!(is_app_filename("notes.HTM"));
        assert!(is_app_filename("tools/timer.html"));
        assert!(!is_app_filename("readme.txt"));
        assert!(!is_app_filename("index.html"));
        assert!(!is_app_filename("INDEX.HTML"));
        assert!(!is_app_filename("dashboard.html"));
        assert!(!is_app_filename("Dashboard.htm"));
        assert!(!is_app_filename("dashboard.css.html"));
        assert!(!is_app_filename(".html"));
        assert!(!is_app_filename("archive.html.zip"));
    }

    #[test]
    fn test_index_variants_are_not_reserved() {
        assert!(is_app_filename("index2.html"));
        assert!(is_app_filename("my-dashboard.html"));
    }

    #[test]
    fn test_reserved_names_match_whole_entry() {
        assert!(is_app_filename("apps/index.html"));
        assert!(is_app_filename("tools/dashboard.html"));
        assert!(is_app_filename("Apps/INDEX.HTML"));
        assert!(!is_app_filename("  index.html "));
        assert!(!is_app_filename("tools/.html"));
    }

    #[test]
    fn test_app_name_from_filename() {
        assert_eq!(app_name_from_filename("todo.html"), "todo");
        assert_eq!(app_name_from_filename("apps/Notes.HTM"), "Notes");
        assert_eq!(app_name_from_filename("C:\\apps\\timer.htm"), "timer");
        assert_eq!(app_name_from_filename("release.v2.html"), "release.v2");
        assert_eq!(app_name_from_filename("plain"), "plain");
    }
}
