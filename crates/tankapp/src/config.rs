//! # Configuration
//!
//! Tank configuration is managed by [`confique`], which layers values from
//! the environment and an optional TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `TANK_ROOT`, `TANK_LOG_FILE`, `TANK_HIDE_DELETED`
//! 2. **Config file**: `tank.toml`, wherever the client points at it
//! 3. **Compiled defaults**
//!
//! Command-line flags are applied by the client on top of the loaded value.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `root` | `<data dir>/Tank` | Storage root holding one directory per fish |
//! | `log_file` | none | Append the operation log to this file |
//! | `hide_deleted` | `false` | Leave soft-deleted fish out of listings |

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the storage directory under the platform data directory.
pub const TANK_DIR: &str = "Tank";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TankConfig {
    /// Storage root. When absent, the platform data directory is used.
    #[config(env = "TANK_ROOT")]
    pub root: Option<PathBuf>,

    /// Operation log file. When absent, no operation log is written.
    #[config(env = "TANK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[config(env = "TANK_HIDE_DELETED", default = false)]
    pub hide_deleted: bool,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            root: None,
            log_file: None,
            hide_deleted: false,
        }
    }
}

impl TankConfig {
    /// Load from the environment and, if given and present, a TOML file.
    pub fn load(file: Option<&Path>) -> Result<Self, confique::Error> {
        let mut builder = TankConfig::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder.load()
    }

    /// The configured root, falling back to [`default_root`].
    pub fn storage_root(&self) -> Option<PathBuf> {
        self.root.clone().or_else(default_root)
    }
}

/// `<platform data dir>/Tank`, or `None` when the platform has no home.
pub fn default_root() -> Option<PathBuf> {
    ProjectDirs::from("com", "tank", "tank").map(|dirs| dirs.data_dir().join(TANK_DIR))
}
