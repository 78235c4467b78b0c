//! XDG Base Directory Support
//!
//! Resolves the config, data and state directories used by Ferret on
//! Linux/Unix systems.

use std::env;
use std::fs;
use std::path::PathBuf;

/// XDG directory structure for Ferret
///
/// Resolution order (highest to lowest):
/// 1. Explicit FERRET_* env vars
/// 2. XDG_* environment variables
/// 3. XDG defaults (~/.config, ~/.local/share, ~/.local/state)
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl XdgDirs {
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve("FERRET_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: Self::resolve("FERRET_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
            state_dir: Self::resolve("FERRET_STATE_DIR", "XDG_STATE_HOME", &[".local", "state"]),
        }
    }

    fn resolve(app_var: &str, xdg_var: &str, default_parts: &[&str]) -> PathBuf {
        if let Ok(dir) = env::var(app_var) {
            return PathBuf::from(dir);
        }
        if let Ok(xdg) = env::var(xdg_var) {
            return PathBuf::from(xdg).join("ferret");
        }
        let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        for part in default_parts {
            dir = dir.join(part);
        }
        dir.join("ferret")
    }

    /// Create all directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.state_dir)?;
        Ok(())
    }

    /// Path of the main configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("ferret.toml")
    }

    /// Default index database directory
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Path of the indexing status side file polled by front-ends
    pub fn status_file(&self) -> PathBuf {
        self.state_dir.join("idxstatus.txt")
    }
}
