//! Configuration management for the Ferret indexing engine.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{FerretError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Directories to crawl on a full pass
    #[serde(default = "default_topdirs")]
    pub topdirs: Vec<PathBuf>,

    /// File/directory names never indexed (glob syntax, matched
    /// against the entry name)
    #[serde(default = "default_skipped_names")]
    pub skipped_names: Vec<String>,

    /// Full paths never indexed (glob syntax, matched against the
    /// whole path)
    #[serde(default)]
    pub skipped_paths: Vec<String>,

    /// Languages for which stemming expansion databases are built
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Whether the index keeps terms raw (case and diacritics).
    /// A raw index additionally gets unaccented-stem and
    /// diacritics/case folding expansion databases.
    #[serde(default = "default_raw_index")]
    pub raw_index: bool,

    /// Terms at or above this many bytes are discarded
    #[serde(default = "default_max_term_length")]
    pub max_term_length: usize,

    /// Worker threads draining the per-document queue
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Capacity of the per-document work queue; `put` blocks when
    /// this many tasks are pending
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Optional spool directory drained by the queued-import
    /// sub-indexer after the filesystem pass
    #[serde(default)]
    pub import_dir: Option<PathBuf>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the index database
    #[serde(default = "default_db_dir")]
    pub db_dir: PathBuf,
}

/// Status side-channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusConfig {
    /// File where indexing status is written for external pollers
    #[serde(default = "default_status_file")]
    pub file: PathBuf,
}

// Default value functions
fn default_topdirs() -> Vec<PathBuf> {
    vec![dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))]
}

fn default_skipped_names() -> Vec<String> {
    [
        "#*", "*~", ".git", ".hg", ".svn", "node_modules", "target", "__pycache__", "*.o", "*.so",
        "*.a", "*.la", "*.lib", "*.dll", "*.exe", "*.zip", "*.gz", "*.bz2", "*.xz", "*.7z",
        "*.rar", "*.iso", "*.img", "*.jpg", "*.jpeg", "*.png", "*.gif", "*.mp3", "*.mp4", "*.avi",
        "*.mkv", "*.tmp",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_languages() -> Vec<String> {
    vec!["english".to_string()]
}

fn default_raw_index() -> bool {
    true
}

fn default_max_term_length() -> usize {
    40
}

fn default_worker_count() -> usize {
    3
}

fn default_queue_depth() -> usize {
    100
}

fn default_max_file_size() -> usize {
    50
}

fn default_db_dir() -> PathBuf {
    XdgDirs::new().index_dir()
}

fn default_status_file() -> PathBuf {
    XdgDirs::new().status_file()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            topdirs: default_topdirs(),
            skipped_names: default_skipped_names(),
            skipped_paths: Vec::new(),
            languages: default_languages(),
            raw_index: default_raw_index(),
            max_term_length: default_max_term_length(),
            worker_count: default_worker_count(),
            queue_depth: default_queue_depth(),
            max_file_size_mb: default_max_file_size(),
            import_dir: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_dir: default_db_dir(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            file: default_status_file(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Missing file is not an error: defaults apply. Environment
    /// variables override file values for a few operational knobs.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_from(&xdg.config_file())
    }

    /// Load configuration from an explicit file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path)?;
            toml::from_str(&raw)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("FERRET_DB_DIR") {
            self.storage.db_dir = PathBuf::from(dir);
        }
        if let Ok(file) = env::var("FERRET_STATUS_FILE") {
            self.status.file = PathBuf::from(file);
        }
        if let Ok(n) = env::var("FERRET_WORKERS") {
            if let Ok(n) = n.parse() {
                self.indexing.worker_count = n;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.indexing.worker_count == 0 {
            return Err(FerretError::ConfigError(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.indexing.queue_depth == 0 {
            return Err(FerretError::ConfigError(
                "queue_depth must be at least 1".to_string(),
            ));
        }
        if self.indexing.max_term_length < 2 {
            return Err(FerretError::ConfigError(
                "max_term_length must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}
