// File-pick adapter: one user-chosen file becomes one candidate

use crate::db::schema::AppSource;
use crate::error::{DeckError, Result};
use super::capability::FileHandle;
use super::{is_app_filename, Candidate};

/// Read a picked file. Always tagged as an import, overriding any earlier source.
pub fn pick_candidate(file: &dyn FileHandle) -> Result<Candidate> {
    let filename = file.name();
    if !is_app_filename(&filename) {
        return Err(DeckError::ExcludedName(filename));
    }

    let content = file.read_text()?;
    Ok(Candidate::new(filename, content).with_source(AppSource::File))
}
