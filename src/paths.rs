// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for the directories this tool reads and
//! writes outside of the VEGAS install folders.
//!
//! # Config Directory Resolution
//!
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI argument** (`--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variable** (`VEGAS_LANG_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs` crate
//!
//! Backup and cache locations come from `settings.toml` first and fall back
//! to [`default_backup_dir`] and [`default_local_app_data`].

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "VegasLanguageChanger";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "VEGAS_LANG_CONFIG_DIR";

/// Global CLI override for config directory (set once at startup).
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the `--config-dir` argument. Only the first call has an effect;
/// later calls are logged and ignored.
pub fn init_cli_overrides(config_dir: Option<PathBuf>) {
    if CLI_CONFIG_DIR.set(config_dir).is_err() {
        tracing::warn!("config dir override already initialized");
    }
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

/// Returns the directory holding `settings.toml`.
///
/// - Linux: `~/.config/VegasLanguageChanger/`
/// - macOS: `~/Library/Application Support/VegasLanguageChanger/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\VegasLanguageChanger\`
///
/// Returns `None` if the directory cannot be determined.
#[must_use]
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Like [`get_app_config_dir`], with `override_path` taking precedence over
/// everything else.
#[must_use]
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = get_cli_config_dir() {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Where registry backups go when nothing else is configured: the desktop,
/// or the home directory on systems without one.
#[must_use]
pub fn default_backup_dir() -> Option<PathBuf> {
    dirs::desktop_dir().or_else(dirs::home_dir)
}

/// Root of the per-user local application data, where VEGAS keeps its
/// plugin caches.
#[must_use]
pub fn default_local_app_data() -> Option<PathBuf> {
    dirs::data_local_dir()
}
