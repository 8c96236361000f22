//! # Configuration
//!
//! Where the inventory file lives and how it is opened.
//!
//! ## Configuration Sources (Priority Order)
//! 1. `--db <PATH>` flag
//! 2. Environment variable `THREADCOUNT_DB_PATH`
//! 3. Platform data directory (`directories`)
//!    - Linux: `~/.local/share/threadcount/garments.db`
//!    - macOS: `~/Library/Application Support/threadcount/garments.db`
//!    - Windows: `%APPDATA%\threadcount\data\garments.db`
//!
//! `THREADCOUNT_EXCLUSIVE=0` (or `false`) opens the file without the
//! exclusive lock, e.g. to inspect it with `sqlite3` while the CLI runs.

use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::CliError;
use threadcount_db::DbConfig;

/// Env var overriding the database path.
pub const DB_PATH_VAR: &str = "THREADCOUNT_DB_PATH";

/// Env var toggling the exclusive file lock.
pub const EXCLUSIVE_VAR: &str = "THREADCOUNT_EXCLUSIVE";

/// File name used inside the platform data directory.
pub const DEFAULT_DB_FILE: &str = "garments.db";

/// Where the database path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Flag,
    Env,
    DataDir,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Which source supplied `database_path`.
    pub path_source: PathSource,

    /// Hold an exclusive lock on the file while running.
    /// Default: true
    pub exclusive: bool,
}

impl AppConfig {
    /// Resolves configuration from the flag and the process environment.
    pub fn from_env(flag: Option<PathBuf>) -> Result<Self, CliError> {
        AppConfig::resolve(flag, |key| env::var(key).ok(), default_data_dir)
    }

    /// Resolves configuration from explicit sources.
    ///
    /// `lookup` reads an environment variable; `data_dir` yields the
    /// platform data directory. Both are injected so resolution can be
    /// tested without touching the real environment.
    pub fn resolve(
        flag: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
        data_dir: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let exclusive = match lookup(EXCLUSIVE_VAR) {
            None => true,
            Some(value) => parse_flag(&value).ok_or_else(|| {
                CliError::validation(format!(
                    "Invalid value for {}: '{}' (expected 1/0, true/false)",
                    EXCLUSIVE_VAR, value
                ))
            })?,
        };

        let (database_path, path_source) = if let Some(path) = flag {
            (path, PathSource::Flag)
        } else if let Some(path) = lookup(DB_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            (PathBuf::from(path), PathSource::Env)
        } else {
            let dir = data_dir()
                .ok_or_else(|| CliError::io("Could not determine app data directory"))?;
            (dir.join(DEFAULT_DB_FILE), PathSource::DataDir)
        };

        Ok(AppConfig {
            database_path,
            path_source,
            exclusive,
        })
    }

    /// Creates the platform data directory when the default path is used.
    ///
    /// Explicit paths are taken as given: a missing directory there is the
    /// user's mistake and surfaces as a storage error on open.
    pub fn prepare(&self) -> Result<(), CliError> {
        if self.path_source == PathSource::DataDir {
            if let Some(dir) = self.database_path.parent() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Store settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).exclusive(self.exclusive)
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "threadcount").map(|dirs| dirs.data_dir().to_path_buf())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn data_dir() -> Option<PathBuf> {
        Some(PathBuf::from("/data/threadcount"))
    }

    #[test]
    fn test_flag_beats_env() {
        let config = AppConfig::resolve(
            Some(PathBuf::from("flag.db")),
            env_of(&[(DB_PATH_VAR, "env.db")]),
            data_dir,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("flag.db"));
        assert_eq!(config.path_source, PathSource::Flag);
        assert!(config.exclusive);
    }

    #[test]
    fn test_env_beats_data_dir() {
        let config =
            AppConfig::resolve(None, env_of(&[(DB_PATH_VAR, "env.db")]), data_dir).unwrap();

        assert_eq!(config.database_path, PathBuf::from("env.db"));
        assert_eq!(config.path_source, PathSource::Env);
    }

    #[test]
    fn test_default_data_dir() {
        let config = AppConfig::resolve(None, env_of(&[(DB_PATH_VAR, "  ")]), data_dir).unwrap();

        assert_eq!(
            config.database_path,
            PathBuf::from("/data/threadcount").join(DEFAULT_DB_FILE)
        );
        assert_eq!(config.path_source, PathSource::DataDir);

        let err = AppConfig::resolve(None, env_of(&[]), || None).unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);
    }

    #[test]
    fn test_exclusive_toggle() {
        let config =
            AppConfig::resolve(None, env_of(&[(EXCLUSIVE_VAR, "0")]), data_dir).unwrap();
        assert!(!config.exclusive);
        assert!(!config.db_config().exclusive);

        let err =
            AppConfig::resolve(None, env_of(&[(EXCLUSIVE_VAR, "maybe")]), data_dir).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_prepare_creates_data_dir_only() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("nested").join("threadcount");

        let config = AppConfig::resolve(None, env_of(&[]), || Some(base.clone())).unwrap();
        config.prepare().unwrap();
        assert!(base.is_dir());

        let missing = tmp.path().join("elsewhere").join("garments.db");
        let config = AppConfig::resolve(Some(missing), env_of(&[]), data_dir).unwrap();
        config.prepare().unwrap();
        assert!(!tmp.path().join("elsewhere").exists());
    }
}
