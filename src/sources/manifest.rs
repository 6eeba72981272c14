// Manifest adapter
// Reads apps.json ({"apps": ["todo.html", {"file": "notes.html"}]}) from a
// URL or a local path and fetches every listed file next to it.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::constants::USER_AGENT;
use crate::error::{DeckError, Result};
use super::{is_app_filename, Candidate, CandidateBatch};

/// Fetches text documents by location. Any failure is a transport error.
pub trait Transport {
    fn fetch_text(&self, location: &str) -> Result<String>;
}

pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ----- Transports -----

pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn fetch_text(&self, location: &str) -> Result<String> {
        let response = self.agent
            .get(location)
            .set("Cache-Control", "no-cache")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => {
                    DeckError::Transport(format!("{}: HTTP {}", location, code))
                }
                other => DeckError::Transport(format!("{}: {}", location, other)),
            })?;

        response
            .into_string()
            .map_err(|e| DeckError::Transport(format!("{}: failed to read body: {}", location, e)))
    }
}

pub struct FsTransport;

impl Transport for FsTransport {
    fn fetch_text(&self, location: &str) -> Result<String> {
        std::fs::read_to_string(location)
            .map_err(|e| DeckError::Transport(format!("{}: {}", location, e)))
    }
}

/// Picks HTTP or the local filesystem from the location's scheme.
pub struct AutoTransport {
    http: HttpTransport,
}

impl AutoTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { http: HttpTransport::new(timeout) }
    }
}

impl Transport for AutoTransport {
    fn fetch_text(&self, location: &str) -> Result<String> {
        if is_remote(location) {
            self.http.fetch_text(location)
        } else {
            FsTransport.fetch_text(location)
        }
    }
}

// ----- Manifest parsing -----

/// Extract app filenames from manifest JSON: trimmed, filtered through the
/// exclusion policy, exact duplicates dropped (first occurrence wins).
pub fn parse_manifest(text: &str) -> Result<Vec<String>> {
    let doc: serde_json::Value = serde_json::from_str(text)?;

    let entries = match doc.get("apps").and_then(|apps| apps.as_array()) {
        Some(entries) => entries,
        None => return Ok(Vec::new()),
    };

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for entry in entries {
        let raw = match entry {
            serde_json::Value::String(s) => s.as_str(),
            serde_json::Value::Object(map) => match map.get("file").and_then(|f| f.as_str()) {
                Some(file) => file,
                None => continue,
            },
            _ => continue,
        };

        let file = raw.trim();
        if file.is_empty() || !is_app_filename(file) {
            continue;
        }
        if seen.insert(file.to_string()) {
            files.push(file.to_string());
        }
    }

    Ok(files)
}

/// Load the manifest's file list. An unreachable or malformed manifest
/// yields an empty list so startup never fails on it.
pub fn load_manifest(transport: &dyn Transport, manifest_location: &str) -> Vec<String> {
    let text = match transport.fetch_text(manifest_location) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Manifest {} could not be read: {}", manifest_location, e);
            return Vec::new();
        }
    };

    match parse_manifest(&text) {
        Ok(files) => files,
        Err(e) => {
            log::warn!("Manifest {} is not valid JSON: {}", manifest_location, e);
            Vec::new()
        }
    }
}

/// Location of a manifest entry, relative to the manifest itself.
pub fn resolve_app_location(manifest_location: &str, filename: &str) -> String {
    let file = filename.trim_start_matches("./");
    if is_remote(file) {
        return file.to_string();
    }

    if is_remote(manifest_location) {
        let base = match manifest_location.rfind('/') {
            Some(idx) => &manifest_location[..=idx],
            None => manifest_location,
        };
        return format!("{}{}", base, file);
    }

    match Path::new(manifest_location).parent() {
        Some(parent) => parent.join(file).to_string_lossy().to_string(),
        None => file.to_string(),
    }
}

/// Fetch every app listed in the manifest. Unreachable files stay in the
/// batch as errors.
pub fn collect_candidates(transport: &dyn Transport, manifest_location: &str) -> CandidateBatch {
    load_manifest(transport, manifest_location)
        .into_iter()
        .map(|filename| {
            let location = resolve_app_location(manifest_location, &filename);
            transport
                .fetch_text(&location)
                .map(|html| Candidate::new(filename, html))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::test_support::MapTransport;

    #[test]
    fn test_parse_mixed_entries() {
        let files = parse_manifest(
            r#"{"apps": ["todo.html", {"file": "notes.html"}, {"name": "x"}, 42, " todo.html ", "todo.html"]}"#,
        ).unwrap();
        assert_eq!(files, vec!["todo.html", "notes.html"]);
    }

    #[test]
    fn test_parse_applies_exclusion_policy() {
        let files = parse_manifest(
            r#"{"apps": ["index.html", "dashboard.html", "dashboard.v2.html", "style.css", "timer.htm"]}"#,
        ).unwrap();
        assert_eq!(files, vec!["timer.htm"]);
    }

    #[test]
    fn test_parse_keeps_nested_index() {
        let files = parse_manifest(r#"{"apps": ["apps/index.html", "index.html"]}"#).unwrap();
        assert_eq!(files, vec!["apps/index.html"]);
    }

    #[test]
    fn test_parse_without_apps_array() {
        assert!(parse_manifest(r#"{"apps": "todo.html"}"#).unwrap().is_empty());
        assert!(parse_manifest(r#"{}"#).unwrap().is_empty());
        assert!(parse_manifest("not json").is_err());
    }

    #[test]
    fn test_resolve_app_location() {
        assert_eq!(
            resolve_app_location("https://example.org/deck/apps.json", "./todo.html"),
            "https://example.org/deck/todo.html"
        );
        assert_eq!(
            resolve_app_location("https://example.org/deck/apps.json", "https://cdn.example.org/a.html"),
            "https://cdn.example.org/a.html"
        );
        let local = resolve_app_location("/srv/deck/apps.json", "todo.html");
        assert_eq!(Path::new(&local), Path::new("/srv/deck/todo.html"));
        assert_eq!(resolve_app_location("apps.json", "todo.html"), "todo.html");
    }

    #[test]
    fn test_collect_keeps_failures_in_batch() {
        let mut docs = HashMap::new();
        docs.insert(
            "deck/apps.json".to_string(),
            r#"{"apps": ["todo.html", "missing.html"]}"#.to_string(),
        );
        docs.insert("deck/todo.html".to_string(), "<title>todo</title>".to_string());
        let transport = MapTransport::new(docs);

        let batch = collect_candidates(&transport, "deck/apps.json");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].as_ref().unwrap().filename, "todo.html");
        assert!(matches!(batch[1], Err(DeckError::Transport(_))));
    }

    #[test]
    fn test_unreachable_manifest_is_empty() {
        let transport = MapTransport::new(HashMap::new());
        assert!(collect_candidates(&transport, "apps.json").is_empty());
    }

    #[test]
    fn test_fs_transport_reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, r#"{"apps": []}"#).unwrap();

        let text = FsTransport.fetch_text(&path.to_string_lossy()).unwrap();
        assert_eq!(text, r#"{"apps": []}"#);
        assert!(FsTransport.fetch_text(&dir.path().join("nope.json").to_string_lossy()).is_err());
    }
}
