// File-system capabilities
// Folder and file access goes through these handles so the scan logic never
// touches a concrete file API. NativeFs backs them with std::fs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{DeckError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    File,
    Directory,
}

/// Persistable reference to a handle. Stored in the meta collection for the
/// remembered folder and on folder-sourced app records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandleRef {
    pub kind: HandleKind,
    pub path: String,
}

impl HandleRef {
    pub fn new(kind: HandleKind, path: impl Into<String>) -> Self {
        Self { kind, path: path.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Prompt,
}

pub trait FileHandle {
    fn name(&self) -> String;
    fn read_text(&self) -> Result<String>;
    fn handle_ref(&self) -> HandleRef;
}

pub trait DirectoryHandle {
    fn name(&self) -> String;
    /// Immediate children only.
    fn list_entries(&self) -> Result<Vec<DirEntry>>;
    fn query_permission(&self) -> Permission;
    fn request_permission(&self) -> Permission;
    fn handle_ref(&self) -> HandleRef;
}

pub enum EntryKind {
    File,
    Directory,
}

pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Present for file entries.
    pub file: Option<Box<dyn FileHandle>>,
}

/// Platform facility that turns stored references back into live handles.
pub trait FileSystemAccess {
    fn open_directory(&self, handle: &HandleRef) -> Result<Box<dyn DirectoryHandle>>;
    fn open_file(&self, handle: &HandleRef) -> Result<Box<dyn FileHandle>>;
}

// ----- Native implementation -----

pub struct NativeFs;

impl FileSystemAccess for NativeFs {
    fn open_directory(&self, handle: &HandleRef) -> Result<Box<dyn DirectoryHandle>> {
        if handle.kind != HandleKind::Directory {
            return Err(DeckError::InvalidPath(format!("{} is not a directory handle", handle.path)));
        }
        Ok(Box::new(NativeDirectory::new(&handle.path)))
    }

    fn open_file(&self, handle: &HandleRef) -> Result<Box<dyn FileHandle>> {
        if handle.kind != HandleKind::File {
            return Err(DeckError::InvalidPath(format!("{} is not a file handle", handle.path)));
        }
        Ok(Box::new(NativeFile::new(&handle.path)))
    }
}

pub struct NativeFile {
    path: PathBuf,
}

impl NativeFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl FileHandle for NativeFile {
    fn name(&self) -> String {
        file_name_of(&self.path)
    }

    fn read_text(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| DeckError::Read(format!("{}: {}", self.path.display(), e)))
    }

    fn handle_ref(&self) -> HandleRef {
        HandleRef::new(HandleKind::File, self.path.to_string_lossy())
    }
}

pub struct NativeDirectory {
    path: PathBuf,
}

impl NativeDirectory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl DirectoryHandle for NativeDirectory {
    fn name(&self) -> String {
        file_name_of(&self.path)
    }

    fn list_entries(&self) -> Result<Vec<DirEntry>> {
        if !self.path.is_dir() {
            return Err(DeckError::InvalidPath(format!("{} is not a directory", self.path.display())));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", self.path.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = entry.file_type();
            if file_type.is_file() {
                entries.push(DirEntry {
                    name,
                    kind: EntryKind::File,
                    file: Some(Box::new(NativeFile::new(entry.path()))),
                });
            } else if file_type.is_dir() {
                entries.push(DirEntry { name, kind: EntryKind::Directory, file: None });
            }
        }

        Ok(entries)
    }

    fn query_permission(&self) -> Permission {
        match fs::read_dir(&self.path) {
            Ok(_) => Permission::Granted,
            Err(e) => {
                log::debug!("No read access to {}: {}", self.path.display(), e);
                Permission::Denied
            }
        }
    }

    // A native process cannot ask the user for more rights than it has.
    fn request_permission(&self) -> Permission {
        self.query_permission()
    }

    fn handle_ref(&self) -> HandleRef {
        HandleRef::new(HandleKind::Directory, self.path.to_string_lossy())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_entries_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.html"), "b").unwrap();
        fs::write(dir.path().join("a.html"), "a").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.html"), "deep").unwrap();

        let handle = NativeDirectory::new(dir.path());
        let entries = handle.list_entries().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["a.html", "b.html", "nested"]);
        assert!(matches!(entries[2].kind, EntryKind::Directory));
        assert!(entries[2].file.is_none());
    }

    #[test]
    fn test_missing_directory_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let handle = NativeDirectory::new(dir.path().join("gone"));
        assert_eq!(handle.query_permission(), Permission::Denied);
        assert!(handle.list_entries().is_err());
    }

    #[test]
    fn test_native_fs_reopens_stored_refs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.html");
        fs::write(&path, "<p>notes</p>").unwrap();

        let file_ref = NativeFile::new(&path).handle_ref();
        let reopened = NativeFs.open_file(&file_ref).unwrap();
        assert_eq!(reopened.name(), "notes.html");
        assert_eq!(reopened.read_text().unwrap(), "<p>notes</p>");

        assert!(NativeFs.open_directory(&file_ref).is_err());
    }
}
