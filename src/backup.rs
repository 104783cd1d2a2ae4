// SPDX-License-Identifier: MPL-2.0
//! Registry snapshot written before anything is changed.
//!
//! The snapshot is a `.reg` script (UTF-16LE with BOM, CRLF line endings)
//! that restores every captured `ULangID` when double-clicked. Instances
//! whose value cannot be read are left out; only a failure to write the
//! file itself is an error, and that error stops the whole run.

use crate::discovery::InstalledInstance;
use crate::registry::{self, Access, ConfigStore, RegistryView, Tolerance, LANG_ID_VALUE};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// First line of every `.reg` script.
pub const REG_HEADER: &str = "Windows Registry Editor Version 5.00";

/// Default file name prefix, completed with `_YYYYMMDD_HHMMSS.reg`.
pub const DEFAULT_FILE_PREFIX: &str = "Vegas_RegBackup";

// =============================================================================
// BackupError
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("registry backup failed: cannot write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// =============================================================================
// Snapshot
// =============================================================================

/// One captured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub record_path: String,
    pub lang_id: u32,
}

/// Reads the current `ULangID` of each instance. The first view that yields
/// a DWORD is used; unreadable instances are skipped.
pub fn capture(store: &dyn ConfigStore, instances: &[InstalledInstance]) -> Vec<BackupEntry> {
    instances
        .iter()
        .filter_map(|instance| {
            let probe = registry::probe_first(RegistryView::ALL, Tolerance::Any, |&view| {
                let key = store.open(view, &instance.record_path, Access::Read)?;
                key.read_dword(LANG_ID_VALUE)
            });
            match probe {
                Ok(Some((_, lang_id))) => Some(BackupEntry {
                    record_path: instance.record_path.clone(),
                    lang_id,
                }),
                Ok(None) | Err(_) => {
                    tracing::warn!(name = %instance.name(), "no readable language value, not backed up");
                    None
                }
            }
        })
        .collect()
}

/// Renders entries as a `.reg` script with CRLF line endings.
#[must_use]
pub fn render_reg(entries: &[BackupEntry]) -> String {
    let mut out = String::new();
    out.push_str(REG_HEADER);
    out.push_str("\r\n\r\n");
    for entry in entries {
        out.push_str(&format!(
            "[{}]\r\n\"{LANG_ID_VALUE}\"=dword:{:08x}\r\n\r\n",
            registry::qualified_path(&entry.record_path),
            entry.lang_id
        ));
    }
    out
}

/// UTF-16LE with a leading byte order mark, the encoding `regedit` expects
/// for version 5 scripts.
#[must_use]
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

// =============================================================================
// Writing
// =============================================================================

/// Format: `<prefix>_YYYYMMDD_HHMMSS.reg`, local time.
#[must_use]
pub fn backup_file_name(prefix: &str, now: &DateTime<Local>) -> String {
    format!("{prefix}_{}.reg", now.format("%Y%m%d_%H%M%S"))
}

/// Picks a file name in `directory` that does not exist yet, appending
/// `_2`, `_3`, ... to the timestamped name when needed.
fn unique_path(directory: &Path, prefix: &str, now: &DateTime<Local>) -> PathBuf {
    let base = backup_file_name(prefix, now);
    let first = directory.join(&base);
    if !first.exists() {
        return first;
    }
    let stem = base.trim_end_matches(".reg");
    (2u32..)
        .map(|n| directory.join(format!("{stem}_{n}.reg")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Writes content through a `.tmp` sibling and a rename, so a failed write
/// never leaves a truncated script behind.
///
/// # Errors
///
/// Returns an error if writing or renaming fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = path.with_extension("reg.tmp");
    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

/// Captures the instances and writes the snapshot into `directory`.
///
/// # Errors
///
/// [`BackupError::WriteFailed`] if the directory cannot be created or the
/// file cannot be written. Unreadable instances are not errors.
pub fn backup(
    store: &dyn ConfigStore,
    instances: &[InstalledInstance],
    directory: &Path,
    prefix: &str,
    now: &DateTime<Local>,
) -> Result<PathBuf, BackupError> {
    let entries = capture(store, instances);
    let content = encode_utf16le(&render_reg(&entries));

    fs::create_dir_all(directory).map_err(|source| BackupError::WriteFailed {
        path: directory.to_path_buf(),
        source,
    })?;
    let path = unique_path(directory, prefix, now);
    write_atomic(&path, &content).map_err(|source| BackupError::WriteFailed {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), entries = entries.len(), "registry backup written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductDescriptor, ProductFamily};
    use crate::registry::memory::{MemoryRegistry, RegValue};
    use chrono::TimeZone;
    use tempfile::tempdir;

    const LANG: &str = r"SOFTWARE\MAGIX\VEGAS Pro\18.0\Lang";

    fn instance(record_path: &str) -> InstalledInstance {
        InstalledInstance {
            product: ProductDescriptor::new(
                "Vegas Pro 18.0",
                ProductFamily::VegasPro,
                [r"SOFTWARE\MAGIX\VEGAS Pro"],
                "18.0",
                [1033],
                true,
            ),
            record_path: record_path.to_string(),
            install_directory: None,
            view: RegistryView::Registry64,
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 10, 28, 9, 5, 7).unwrap()
    }

    fn decode(bytes: &[u8]) -> String {
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).unwrap()
    }

    #[test]
    fn file_name_has_timestamp() {
        assert_eq!(
            backup_file_name("Vegas_RegBackup", &fixed_time()),
            "Vegas_RegBackup_20251028_090507.reg"
        );
    }

    #[test]
    fn render_reg_matches_regedit_format() {
        let text = render_reg(&[BackupEntry {
            record_path: LANG.to_string(),
            lang_id: 1042,
        }]);
        assert_eq!(
            text,
            "Windows Registry Editor Version 5.00\r\n\r\n\
             [HKEY_LOCAL_MACHINE\\SOFTWARE\\MAGIX\\VEGAS Pro\\18.0\\Lang]\r\n\
             \"ULangID\"=dword:00000412\r\n\r\n"
        );
    }

    #[test]
    fn capture_uses_first_view_with_a_dword() {
        let registry = MemoryRegistry::new();
        registry.insert_value(
            RegistryView::Registry64,
            LANG,
            "ULangID",
            RegValue::String("oops".into()),
        );
        registry.insert_value(RegistryView::Registry32, LANG, "ULangID", RegValue::Dword(1041));

        let entries = capture(&registry, &[instance(LANG)]);

        assert_eq!(entries, vec![BackupEntry { record_path: LANG.into(), lang_id: 1041 }]);
    }

    #[test]
    fn capture_omits_unreadable_instances() {
        let registry = MemoryRegistry::new();
        registry.insert_value(RegistryView::Registry64, LANG, "ULangID", RegValue::Dword(1033));
        let missing = r"SOFTWARE\MAGIX\VEGAS Pro\99.0\Lang";

        let entries = capture(&registry, &[instance(missing), instance(LANG)]);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record_path, LANG);
    }

    #[test]
    fn backup_writes_utf16_file() {
        let registry = MemoryRegistry::new();
        registry.insert_value(RegistryView::Registry64, LANG, "ULangID", RegValue::Dword(1033));
        let dir = tempdir().expect("failed to create temp dir");

        let path = backup(&registry, &[instance(LANG)], dir.path(), "Vegas_RegBackup", &fixed_time())
            .expect("backup should succeed");

        assert_eq!(path.file_name().unwrap(), "Vegas_RegBackup_20251028_090507.reg");
        let text = decode(&fs::read(&path).unwrap());
        assert!(text.starts_with(REG_HEADER));
        assert!(text.contains("\"ULangID\"=dword:00000409"));
        assert!(!path.with_extension("reg.tmp").exists());
    }

    #[test]
    fn backup_with_nothing_readable_still_writes_header() {
        let registry = MemoryRegistry::new();
        let dir = tempdir().expect("failed to create temp dir");

        let path = backup(&registry, &[instance(LANG)], dir.path(), "Vegas_RegBackup", &fixed_time())
            .expect("backup should succeed");

        assert_eq!(decode(&fs::read(path).unwrap()), format!("{REG_HEADER}\r\n\r\n"));
    }

    #[test]
    fn backup_never_overwrites_an_existing_snapshot() {
        let registry = MemoryRegistry::new();
        let dir = tempdir().expect("failed to create temp dir");

        let first = backup(&registry, &[], dir.path(), "Vegas_RegBackup", &fixed_time()).unwrap();
        let second = backup(&registry, &[], dir.path(), "Vegas_RegBackup", &fixed_time()).unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap(),
            "Vegas_RegBackup_20251028_090507_2.reg"
        );
    }

    #[test]
    fn backup_into_a_file_path_fails() {
        let registry = MemoryRegistry::new();
        let dir = tempdir().expect("failed to create temp dir");
        let blocker = dir.path().join("not_a_directory");
        fs::write(&blocker, b"x").unwrap();

        let err = backup(&registry, &[], &blocker, "Vegas_RegBackup", &fixed_time()).unwrap_err();

        assert!(matches!(err, BackupError::WriteFailed { .. }));
    }
}
