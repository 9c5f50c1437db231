//! TOML configuration.
//!
//! Everything is optional; an empty file is the same as [`Config::default`].
//!
//! ```toml
//! backend = "auto"            # auto | evdev | xinput | virtual
//! platform = "Linux"          # database platform tag override
//! builtin_mappings = true
//! mapping_files = ["~/.config/mygame/gamecontrollerdb.txt"]
//! input_dir = "/dev/input"
//! rescan_ticks = 60
//! ```
//!
//! Pad, button and axis limits are compile-time constants and are not configurable.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::gamedb::{MappingDatabase, Platform};

/// Default evdev node directory.
pub const DEFAULT_INPUT_DIR: &str = "/dev/input";

/// Default number of polls to keep rescanning after a node is created.
pub const DEFAULT_RESCAN_TICKS: u32 = 60;

/// Which raw layer to drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Native backend for the target (evdev on Linux, XInput on Windows).
    #[default]
    Auto,
    Evdev,
    Xinput,
    /// Scriptable in-memory backend with nothing plugged in.
    Virtual,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub backend: BackendKind,
    /// Platform tag used when scanning the database. Defaults to the backend's.
    pub platform: Option<Platform>,
    /// Include the compiled-in mapping table.
    pub builtin_mappings: bool,
    /// Extra SDL-format mapping files, scanned before the built-in table in
    /// the order listed.
    pub mapping_files: Vec<PathBuf>,
    /// evdev node directory.
    pub input_dir: PathBuf,
    /// Polls to keep rescanning after a node is created.
    pub rescan_ticks: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Auto,
            platform: None,
            builtin_mappings: true,
            mapping_files: Vec::new(),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            rescan_ticks: DEFAULT_RESCAN_TICKS,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Mapping database described by this config: listed files first, then the
    /// built-in table if enabled.
    pub fn database(&self) -> Result<MappingDatabase, Error> {
        let mut db = if self.builtin_mappings {
            MappingDatabase::builtin()
        } else {
            MappingDatabase::empty()
        };
        for file in &self.mapping_files {
            db.add_file(file)?;
        }
        Ok(db)
    }
}
