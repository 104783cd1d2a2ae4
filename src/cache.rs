// SPDX-License-Identifier: MPL-2.0
//! Removes the plugin caches VEGAS rebuilds on its next start.
//!
//! Stale caches keep plugin names in the previous language. They live at
//! `<local app data>/<family folder>/<version>/`.

use crate::discovery::InstalledInstance;
use crate::report::Outcome;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Cache files deleted per release, in deletion order.
pub const CACHE_FILES: [&str; 2] = ["plugin_manager_cache.bin", "svfx_plugin_cache.bin"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Every present cache file was deleted. `removed` may be zero.
    Cleared { removed: usize },
    /// Deleting `file` failed; later files were not attempted.
    Failed { file: String, message: String },
}

impl CacheOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, CacheOutcome::Cleared { .. })
    }
}

#[must_use]
pub fn cache_directory(local_app_data: &Path, instance: &InstalledInstance) -> PathBuf {
    local_app_data
        .join(instance.product.family.cache_folder())
        .join(instance.version_key())
}

pub fn invalidate(
    instances: &[&InstalledInstance],
    local_app_data: &Path,
) -> Vec<Outcome<CacheOutcome>> {
    instances
        .iter()
        .map(|instance| {
            let directory = cache_directory(local_app_data, instance);
            let outcome = clear_directory(&directory);
            match &outcome {
                CacheOutcome::Cleared { removed } => {
                    tracing::info!(name = %instance.name(), removed, "plugin cache cleared");
                }
                CacheOutcome::Failed { file, message } => {
                    tracing::warn!(name = %instance.name(), %file, %message, "plugin cache not cleared");
                }
            }
            Outcome::new(instance.name(), outcome)
        })
        .collect()
}

fn clear_directory(directory: &Path) -> CacheOutcome {
    let mut removed = 0;
    for file in CACHE_FILES {
        match fs::remove_file(directory.join(file)) {
            Ok(()) => removed += 1,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return CacheOutcome::Failed {
                    file: file.to_string(),
                    message: err.to_string(),
                };
            }
        }
    }
    CacheOutcome::Cleared { removed }
}
