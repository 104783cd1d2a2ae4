// SPDX-License-Identifier: MPL-2.0
//! Port for the hierarchical configuration store VEGAS keeps its settings in.
//!
//! On Windows this is `HKEY_LOCAL_MACHINE`, seen through two views: the
//! native 64-bit view and the WOW64 32-bit view. The same logical path can
//! hold different data in each view, so every consumer probes both.
//!
//! # Available Adapters
//!
//! - [`memory::MemoryRegistry`]: in-memory store for tests and simulated runs
//! - `windows::WindowsRegistry`: the real registry via `winreg` (Windows only)
//!
//! # Handles
//!
//! [`ConfigStore::open`] returns a boxed [`RecordHandle`]. The handle is
//! released when dropped, so a handle never outlives the probe that opened it.

pub mod memory;
#[cfg(windows)]
pub mod windows;

use std::fmt;
use std::io;

/// Root hive prefix used when a record path is written out for humans or
/// for `.reg` import.
pub const HIVE_NAME: &str = "HKEY_LOCAL_MACHINE";

/// DWORD value holding the active display language.
pub const LANG_ID_VALUE: &str = "ULangID";

/// String value holding the install directory, stored on the version key.
pub const INSTALL_PATH_VALUE: &str = "InstallPath";

/// Sub-key of a version key that carries [`LANG_ID_VALUE`].
pub const LANG_SUBKEY: &str = "Lang";

// =============================================================================
// Views and access
// =============================================================================

/// Bit-width projection of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegistryView {
    Registry64,
    Registry32,
}

impl RegistryView {
    /// Probe order shared by discovery, backup and mutation.
    pub const ALL: [RegistryView; 2] = [RegistryView::Registry64, RegistryView::Registry32];
}

impl fmt::Display for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryView::Registry64 => f.write_str("64-bit"),
            RegistryView::Registry32 => f.write_str("32-bit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

// =============================================================================
// StoreError
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("registry key or value not found")]
    NotFound,

    #[error("access denied")]
    PermissionDenied,

    /// The value exists but is not of the requested type.
    #[error("value '{0}' has an unexpected type")]
    InvalidValue(String),

    #[error("{0}")]
    Other(String),
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound,
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied,
            io::ErrorKind::InvalidData => StoreError::InvalidValue(err.to_string()),
            _ => StoreError::Other(err.to_string()),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// =============================================================================
// Traits
// =============================================================================

/// An open registry key.
pub trait RecordHandle {
    fn read_dword(&self, name: &str) -> StoreResult<u32>;

    fn read_string(&self, name: &str) -> StoreResult<String>;

    /// Fails with [`StoreError::PermissionDenied`] on a handle opened for
    /// [`Access::Read`].
    fn write_dword(&self, name: &str, value: u32) -> StoreResult<()>;
}

/// The registry as a whole. Paths are relative to [`HIVE_NAME`] and use `\`
/// separators (see [`join_path`]).
pub trait ConfigStore {
    /// Opens an existing key. Never creates keys.
    fn open(
        &self,
        view: RegistryView,
        path: &str,
        access: Access,
    ) -> StoreResult<Box<dyn RecordHandle + '_>>;
}

// =============================================================================
// Probing
// =============================================================================

/// Which failures [`probe_first`] treats as "try the next candidate".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Only [`StoreError::NotFound`]. Everything else stops the probe.
    Missing,
    /// Every error; unexpected ones are logged before moving on.
    Any,
}

impl Tolerance {
    fn tolerates(self, err: &StoreError) -> bool {
        match self {
            Tolerance::Missing => matches!(err, StoreError::NotFound),
            Tolerance::Any => true,
        }
    }
}

/// Runs `attempt` over `candidates` in order and returns the first success
/// together with the candidate that produced it.
///
/// Tolerated errors move on to the next candidate; any other error is
/// returned immediately and the remaining candidates are not tried.
/// `Ok(None)` means every candidate missed.
pub fn probe_first<C, T, F>(
    candidates: impl IntoIterator<Item = C>,
    tolerance: Tolerance,
    mut attempt: F,
) -> StoreResult<Option<(C, T)>>
where
    C: fmt::Debug,
    F: FnMut(&C) -> StoreResult<T>,
{
    for candidate in candidates {
        match attempt(&candidate) {
            Ok(value) => return Ok(Some((candidate, value))),
            Err(err) if tolerance.tolerates(&err) => match err {
                StoreError::NotFound | StoreError::PermissionDenied => {
                    tracing::debug!(?candidate, %err, "probe miss");
                }
                _ => tracing::warn!(?candidate, %err, "probe failed, trying next candidate"),
            },
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}

// =============================================================================
// Paths
// =============================================================================

/// Joins key path segments with `\`, accepting `/` or `\` inside segments
/// and dropping empty ones.
#[must_use]
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .flat_map(|segment| segment.split(['\\', '/']))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
}

/// Fully qualified form of a hive-relative path, e.g.
/// `HKEY_LOCAL_MACHINE\SOFTWARE\...`.
#[must_use]
pub fn qualified_path(path: &str) -> String {
    format!("{HIVE_NAME}\\{path}")
}
