// Folder-scan adapter
// Immediate children only. Unreadable files stay in the batch as errors so
// one bad file never aborts the scan.

use super::capability::{DirectoryHandle, EntryKind};
use super::{is_app_filename, Candidate, CandidateBatch};
use crate::error::Result;

/// Enumerate a directory and read every app file in it.
/// Candidates carry no source override (new records default to folder)
/// and a per-file capability for later re-reads.
pub fn scan_candidates(dir: &dyn DirectoryHandle) -> Result<CandidateBatch> {
    let mut batch = Vec::new();

    for entry in dir.list_entries()? {
        if !matches!(entry.kind, EntryKind::File) || !is_app_filename(&entry.name) {
            continue;
        }
        let file = match entry.file {
            Some(file) => file,
            None => continue,
        };

        let candidate = file.read_text().map(|text| {
            Candidate::new(entry.name.clone(), text).with_capability(file.handle_ref())
        });
        if let Err(e) = &candidate {
            log::warn!("Failed to read {} from folder {}: {}", entry.name, dir.name(), e);
        }
        batch.push(candidate);
    }

    Ok(batch)
}
