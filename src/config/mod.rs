// SPDX-License-Identifier: MPL-2.0
//! Loads and saves user preferences in a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Program UI language
//! - `[backup]` - Where registry backups are written and how they are named
//! - `[cache]` - Override for the local application data root
//!
//! # Path Resolution
//!
//! `settings.toml` lives in the directory [`paths::get_app_config_dir`]
//! resolves. [`load_from_path`] and [`save_to_path`] bypass the lookup.
//!
//! ```no_run
//! use vegas_lang_changer::config;
//!
//! let (mut config, _warning) = config::load();
//! config.general.language = Some("ko".to_string());
//! config::save(&config)?;
//! # Ok::<(), vegas_lang_changer::error::Error>(())
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GeneralConfig {
    /// Program UI language code (e.g., "en-US", "ko").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BackupConfig {
    /// Destination folder for `.reg` snapshots. Desktop when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_prefix: Option<String>,
}

impl BackupConfig {
    /// Configured prefix, or [`DEFAULT_BACKUP_FILE_PREFIX`] when unset or
    /// blank.
    #[must_use]
    pub fn file_prefix(&self) -> &str {
        self.file_prefix
            .as_deref()
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(DEFAULT_BACKUP_FILE_PREFIX)
    }

    #[must_use]
    pub fn directory(&self) -> Option<PathBuf> {
        self.directory.clone().or_else(paths::default_backup_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Root that holds `VEGAS Pro/` and `Movie Studio Platinum/` cache
    /// folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_app_data: Option<PathBuf>,
}

impl CacheConfig {
    #[must_use]
    pub fn local_app_data(&self) -> Option<PathBuf> {
        self.local_app_data
            .clone()
            .or_else(paths::default_local_app_data)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

fn settings_path(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|dir| dir.join(CONFIG_FILE))
}

// =============================================================================
// Loading
// =============================================================================

/// Reads `settings.toml` from the resolved config directory.
///
/// A missing file yields the defaults silently. An unreadable or malformed
/// file also yields the defaults, together with a warning naming the file.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// [`load`] with `base_dir` in place of the resolved config directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = settings_path(base_dir).filter(|path| path.exists()) else {
        return (Config::default(), None);
    };
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(format!("{}: {err}", path.display()))),
    }
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    Ok(toml::from_str(&fs::read_to_string(path)?)?)
}

// =============================================================================
// Saving
// =============================================================================

pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Does nothing when no config directory can be resolved.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    match settings_path(base_dir) {
        Some(path) => save_to_path(config, &path),
        None => Ok(()),
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}
