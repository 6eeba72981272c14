// Runtime configuration
// Each field resolves as: CLI flag, then environment, then default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_MANIFEST, ENV_HOME, ENV_MANIFEST, HTTP_TIMEOUT_SECONDS, OPEN_FOLDER,
    PROJECT_APPLICATION, PROJECT_ORGANIZATION, PROJECT_QUALIFIER,
};
use crate::db::get_db_path;
use crate::error::{DeckError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Holds the database and the materialized open/ folder.
    pub data_dir: PathBuf,
    /// URL or local path of apps.json.
    pub manifest: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>, manifest: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            manifest: manifest.into(),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECONDS),
        }
    }

    /// Resolve against the process environment.
    pub fn resolve(cli_data_dir: Option<PathBuf>, cli_manifest: Option<String>) -> Result<Self> {
        Self::resolve_with(cli_data_dir, cli_manifest, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with<F>(cli_data_dir: Option<PathBuf>, cli_manifest: Option<String>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let data_dir = match cli_data_dir.or_else(|| non_empty(ENV_HOME).map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let manifest = cli_manifest
            .or_else(|| non_empty(ENV_MANIFEST))
            .unwrap_or_else(|| DEFAULT_MANIFEST.to_string());

        Ok(Self::new(data_dir, manifest))
    }

    pub fn db_path(&self) -> PathBuf {
        get_db_path(&self.data_dir)
    }

    pub fn open_dir(&self) -> PathBuf {
        self.data_dir.join(OPEN_FOLDER)
    }

    /// Create the data directory and its open/ folder if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        create_dir(&self.data_dir)?;
        create_dir(&self.open_dir())
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION)
        .ok_or_else(|| DeckError::Other("Could not determine a data directory for this user".to_string()))?;
    Ok(dirs.data_dir().to_path_buf())
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        DeckError::InvalidPath(format!(
            "Cannot create {}: {}. Check directory permissions.",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_cli_flags_win_over_environment() {
        let env = env_from(&[(ENV_HOME, "/env/home"), (ENV_MANIFEST, "https://env/apps.json")]);
        let config = Config::resolve_with(
            Some(PathBuf::from("/cli/home")),
            Some("cli/apps.json".to_string()),
            env,
        ).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/cli/home"));
        assert_eq!(config.manifest, "cli/apps.json");
    }

    #[test]
    fn test_environment_wins_over_defaults() {
        let env = env_from(&[(ENV_HOME, "/env/home"), (ENV_MANIFEST, "https://env/apps.json")]);
        let config = Config::resolve_with(None, None, env).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/env/home"));
        assert_eq!(config.manifest, "https://env/apps.json");
        assert_eq!(config.http_timeout, Duration::from_secs(HTTP_TIMEOUT_SECONDS));
    }

    #[test]
    fn test_blank_environment_falls_back_to_default_manifest() {
        let env = env_from(&[(ENV_HOME, "/env/home"), (ENV_MANIFEST, "  ")]);
        let config = Config::resolve_with(None, None, env).unwrap();
        assert_eq!(config.manifest, DEFAULT_MANIFEST);
    }

    #[test]
    fn test_ensure_dirs_creates_open_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().join("deck"), DEFAULT_MANIFEST);

        config.ensure_dirs().unwrap();
        assert!(config.open_dir().is_dir());
        assert_eq!(config.db_path(), dir.path().join("deck").join("appdeck.db"));

        // Second call is a no-op
        config.ensure_dirs().unwrap();
    }
}
