//! Storage configuration and path management.
//!
//! Centralizes every file path the crate touches so tests can inject a temp
//! root (`StorageConfig::with_root`) and the CLI can honor a `--data-dir`
//! override without path logic leaking into callers.

use std::path::{Path, PathBuf};

/// Central configuration for all Hybrid Master 51 storage paths.
///
/// Production code uses `StorageConfig::default()` which points to `~/.hm51/`.
/// Tests use `StorageConfig::with_root(temp_dir)` for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all data (default: ~/.hm51)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self {
            root: home.join(".hm51"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories and the CLI `--data-dir` flag.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to progress.json (the single progress/history/settings document).
    pub fn progress_file(&self) -> PathBuf {
        self.root.join("progress.json")
    }

    /// Path to logs/ directory (rotating CLI log files).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Ensures the root directory and standard subdirectories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
