// SPDX-License-Identifier: MPL-2.0
//! Installs the `local_<locale>.cfg` files newer VEGAS Pro releases need
//! before they will show a language.
//!
//! The files ship inside the executable (see [`EmbeddedLangCfg`]), one per
//! product version and locale. They are only ever added: a file already in
//! the install directory is left untouched.

use crate::discovery::InstalledInstance;
use crate::language::Language;
use crate::report::Outcome;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Namespace prefix of every composite asset key.
pub const BUNDLE_NAMESPACE: &str = "lang_cfg";

/// Both spellings of the locale folder, in lookup order. Releases differ in
/// which one they use, and bundle paths are case-sensitive.
pub const LOCALE_FOLDER_VARIANTS: [&str; 2] = ["Language", "language"];

// =============================================================================
// Asset keys and bundles
// =============================================================================

/// Address of one file in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    /// e.g. `VEGAS Pro 23.0`
    pub version_folder: String,
    /// One of [`LOCALE_FOLDER_VARIANTS`].
    pub locale_folder: &'static str,
    /// e.g. `local_ko_KR.cfg`
    pub file_name: String,
}

impl AssetKey {
    #[must_use]
    pub fn new(version_key: &str, locale_folder: &'static str, file_name: &str) -> Self {
        Self {
            version_folder: format!("VEGAS Pro {version_key}"),
            locale_folder,
            file_name: file_name.to_string(),
        }
    }

    /// Relative path inside the embedded folder.
    #[must_use]
    pub fn embed_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.version_folder, self.locale_folder, self.file_name
        )
    }
}

/// Dotted composite key, e.g.
/// `lang_cfg.VEGAS_Pro_23._0.Language.local_ko_KR.cfg`. Spaces become `_`
/// and every `.` in the version folder becomes `._`.
impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let folder = self.version_folder.replace(' ', "_").replace('.', "._");
        write!(
            f,
            "{BUNDLE_NAMESPACE}.{folder}.{}.{}",
            self.locale_folder, self.file_name
        )
    }
}

/// Read-only source of locale assets.
pub trait AssetBundle {
    fn get(&self, key: &AssetKey) -> Option<Cow<'static, [u8]>>;
}

/// Files compiled into the binary from `assets/lang_cfg/`, laid out as
/// `VEGAS Pro <version>/<Language|language>/local_<suffix>.cfg`.
#[derive(RustEmbed)]
#[folder = "assets/lang_cfg/"]
#[exclude = "*.md"]
pub struct EmbeddedLangCfg;

impl AssetBundle for EmbeddedLangCfg {
    fn get(&self, key: &AssetKey) -> Option<Cow<'static, [u8]>> {
        <EmbeddedLangCfg as RustEmbed>::get(&key.embed_path()).map(|file| file.data)
    }
}

/// Bundle backed by a map of composite keys, for tests and simulations.
#[derive(Debug, Default, Clone)]
pub struct MemoryBundle {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &AssetKey, data: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(key.to_string(), data.into());
        self
    }
}

impl AssetBundle for MemoryBundle {
    fn get(&self, key: &AssetKey) -> Option<Cow<'static, [u8]>> {
        self.files
            .get(&key.to_string())
            .map(|data| Cow::Owned(data.clone()))
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Copied { file_name: String, destination: PathBuf },
    /// The destination file already exists; nothing was written.
    AlreadyPresent,
    /// This release does not use auxiliary files.
    NotRequired,
    NoInstallDirectory,
    SourceMissing,
    Failed(String),
}

impl AssetOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AssetOutcome::NoInstallDirectory | AssetOutcome::SourceMissing | AssetOutcome::Failed(_)
        )
    }
}

/// Locale folder name to use under an install directory: `language` if
/// that spelling exists on disk, otherwise `Language`.
#[must_use]
pub fn locale_folder_on_disk(install_directory: &Path) -> &'static str {
    if install_directory.join(LOCALE_FOLDER_VARIANTS[1]).is_dir() {
        LOCALE_FOLDER_VARIANTS[1]
    } else {
        LOCALE_FOLDER_VARIANTS[0]
    }
}

/// Installs the `.cfg` file for `language` into every instance that needs
/// one. Returns an empty list when the language has no auxiliary file.
pub fn reconcile(
    instances: &[&InstalledInstance],
    language: Language,
    bundle: &dyn AssetBundle,
) -> Vec<Outcome<AssetOutcome>> {
    let Some(file_name) = language.cfg_file_name() else {
        tracing::debug!(%language, "no auxiliary file for this language");
        return Vec::new();
    };

    instances
        .iter()
        .map(|instance| {
            let outcome = reconcile_one(instance, &file_name, bundle);
            match &outcome {
                AssetOutcome::Copied { destination, .. } => {
                    tracing::info!(name = %instance.name(), path = %destination.display(), "language file installed");
                }
                other if other.is_failure() => {
                    tracing::warn!(name = %instance.name(), outcome = ?other, "language file not installed");
                }
                _ => {}
            }
            Outcome::new(instance.name(), outcome)
        })
        .collect()
}

fn reconcile_one(
    instance: &InstalledInstance,
    file_name: &str,
    bundle: &dyn AssetBundle,
) -> AssetOutcome {
    if !instance.product.requires_asset_install {
        return AssetOutcome::NotRequired;
    }
    let Some(install_directory) = &instance.install_directory else {
        return AssetOutcome::NoInstallDirectory;
    };

    let destination_folder = install_directory.join(locale_folder_on_disk(install_directory));
    let destination = destination_folder.join(file_name);
    if destination.exists() {
        return AssetOutcome::AlreadyPresent;
    }

    let source = LOCALE_FOLDER_VARIANTS.iter().find_map(|&folder| {
        let key = AssetKey::new(instance.version_key(), folder, file_name);
        bundle.get(&key).inspect(|_| tracing::debug!(%key, "asset resolved"))
    });
    let Some(data) = source else {
        return AssetOutcome::SourceMissing;
    };

    if let Err(err) = fs::create_dir_all(&destination_folder) {
        return AssetOutcome::Failed(err.to_string());
    }
    match write_new(&destination, &data) {
        Ok(()) => AssetOutcome::Copied {
            file_name: file_name.to_string(),
            destination,
        },
        // Created by someone else since the existence check.
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => AssetOutcome::AlreadyPresent,
        Err(err) => AssetOutcome::Failed(err.to_string()),
    }
}

fn write_new(destination: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;
    io::copy(&mut &data[..], &mut file)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductDescriptor, ProductFamily};
    use crate::registry::RegistryView;
    use tempfile::tempdir;

    fn instance(version: &str, install: Option<&Path>, requires: bool) -> InstalledInstance {
        InstalledInstance {
            product: ProductDescriptor::new(
                format!("Vegas Pro {version}"),
                ProductFamily::VegasPro,
                [r"SOFTWARE\VEGAS Creative Software\VEGAS Pro"],
                version,
                [1033, 1042],
                requires,
            ),
            record_path: format!(r"SOFTWARE\VEGAS Creative Software\VEGAS Pro\{version}\Lang"),
            install_directory: install.map(Path::to_path_buf),
            view: RegistryView::Registry64,
        }
    }

    fn bundle_with(version: &str, folder: &'static str, file: &str) -> MemoryBundle {
        let mut bundle = MemoryBundle::new();
        bundle.insert(&AssetKey::new(version, folder, file), b"cfg-data".to_vec());
        bundle
    }

    #[test]
    fn composite_key_format() {
        let key = AssetKey::new("23.0", "Language", "local_ko_KR.cfg");
        assert_eq!(key.to_string(), "lang_cfg.VEGAS_Pro_23._0.Language.local_ko_KR.cfg");
        assert_eq!(key.embed_path(), "VEGAS Pro 23.0/Language/local_ko_KR.cfg");
    }

    #[test]
    fn embedded_bundle_holds_only_cfg_files() {
        for path in <EmbeddedLangCfg as RustEmbed>::iter() {
            assert!(path.ends_with(".cfg"), "unexpected bundle entry {path}");
        }
        assert!(<EmbeddedLangCfg as RustEmbed>::get("README.md").is_none());
    }

    #[test]
    fn copies_into_capitalized_folder_by_default() {
        let dir = tempdir().expect("failed to create temp dir");
        let vegas = instance("21.0", Some(dir.path()), true);
        let bundle = bundle_with("21.0", "Language", "local_ko_KR.cfg");

        let results = reconcile(&[&vegas], Language::Korean, &bundle);

        let expected = dir.path().join("Language").join("local_ko_KR.cfg");
        assert_eq!(
            results[0].outcome,
            AssetOutcome::Copied {
                file_name: "local_ko_KR.cfg".into(),
                destination: expected.clone()
            }
        );
        assert_eq!(fs::read(expected).unwrap(), b"cfg-data");
    }

    #[test]
    fn uses_lowercase_folder_when_present_on_disk() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::create_dir(dir.path().join("language")).unwrap();
        let vegas = instance("16.0", Some(dir.path()), true);
        let bundle = bundle_with("16.0", "language", "local_ja_JP.cfg");

        let results = reconcile(&[&vegas], Language::Japanese, &bundle);

        assert!(matches!(results[0].outcome, AssetOutcome::Copied { .. }));
        assert!(dir.path().join("language").join("local_ja_JP.cfg").exists());
    }

    #[test]
    fn second_run_never_overwrites() {
        let dir = tempdir().expect("failed to create temp dir");
        let vegas = instance("22.0", Some(dir.path()), true);
        let bundle = bundle_with("22.0", "Language", "local_de_DE.cfg");

        reconcile(&[&vegas], Language::German, &bundle);
        let target = dir.path().join("Language").join("local_de_DE.cfg");
        fs::write(&target, b"edited by user").unwrap();
        let results = reconcile(&[&vegas], Language::German, &bundle);

        assert_eq!(results[0].outcome, AssetOutcome::AlreadyPresent);
        assert_eq!(fs::read(target).unwrap(), b"edited by user");
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempdir().expect("failed to create temp dir");
        let vegas = instance("20.0", Some(dir.path()), true);

        let results = reconcile(&[&vegas], Language::French, &MemoryBundle::new());

        assert_eq!(results[0].outcome, AssetOutcome::SourceMissing);
        assert!(!dir.path().join("Language").exists());
    }

    #[test]
    fn unflagged_and_pathless_instances() {
        let old = instance("13.0", None, false);
        let pathless = instance("19.0", None, true);
        let bundle = MemoryBundle::new();

        let results = reconcile(&[&old, &pathless], Language::Korean, &bundle);

        assert_eq!(results[0].outcome, AssetOutcome::NotRequired);
        assert_eq!(results[1].outcome, AssetOutcome::NoInstallDirectory);
    }

    #[test]
    fn language_without_cfg_is_a_no_op() {
        let dir = tempdir().expect("failed to create temp dir");
        let vegas = instance("18.0", Some(dir.path()), true);
        assert!(reconcile(&[&vegas], Language::Russian, &MemoryBundle::new()).is_empty());
    }

    #[test]
    fn unwritable_destination_is_a_failure() {
        let dir = tempdir().expect("failed to create temp dir");
        // A file where the locale folder should be makes create_dir_all fail.
        fs::write(dir.path().join("Language"), b"").unwrap();
        let vegas = instance("23.0", Some(dir.path()), true);
        let bundle = bundle_with("23.0", "Language", "local_zh_CN.cfg");

        let results = reconcile(&[&vegas], Language::ChineseSimplified, &bundle);

        assert!(matches!(results[0].outcome, AssetOutcome::Failed(_)));
    }
}
