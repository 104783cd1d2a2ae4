// SPDX-License-Identifier: MPL-2.0
//! The committed language change, stage by stage.
//!
//! ```text
//! prepare ──► backup ──(fails: stop)──► mutate ──► reconcile ──► invalidate
//!                                          │         ▲              ▲
//!                                          └─ succeeded instances ──┘
//! ```
//!
//! Only the backup is a gate. Every later stage records one outcome per
//! instance and never stops early.

use crate::assets::{self, AssetBundle};
use crate::backup::{self, BackupError};
use crate::cache;
use crate::compat;
use crate::config::Config;
use crate::discovery::InstalledInstance;
use crate::error::Error;
use crate::i18n::I18n;
use crate::language::Language;
use crate::mutate;
use crate::registry::ConfigStore;
use crate::report::ChangeReport;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Name of the release whose early builds lack Korean.
const PRO_15_NAME: &str = "Vegas Pro 15.0";

/// Why a change cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotReady {
    #[error("no versions selected")]
    NoTargets,
    #[error("no valid language selected")]
    NoValidLanguage,
}

impl NotReady {
    /// Program text explaining the problem.
    #[must_use]
    pub fn message_id(self) -> &'static str {
        match self {
            NotReady::NoTargets => "error-no-versions-selected",
            NotReady::NoValidLanguage => "error-no-valid-lang",
        }
    }
}

/// A warning the operator must accept before the change runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Korean on VEGAS Pro 15.0 needs build 384 or later.
    Pro15KoreanBuild,
}

impl Advisory {
    #[must_use]
    pub fn message_id(self) -> &'static str {
        match self {
            Advisory::Pro15KoreanBuild => "vegas-pro-15-korean-warning",
        }
    }
}

/// A validated change waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub language: Language,
    pub target_count: usize,
    pub advisories: Vec<Advisory>,
}

impl Plan {
    /// The confirmation question naming the target count and language.
    #[must_use]
    pub fn summary(&self, i18n: &I18n) -> String {
        i18n.tr_args(
            "confirm-message",
            &[
                ("count", self.target_count.into()),
                ("language", i18n.language_name(self.language).into()),
            ],
        )
    }
}

/// Checks that there is something to change and that every target supports
/// `language`.
///
/// # Errors
///
/// [`NotReady::NoTargets`] for an empty target set,
/// [`NotReady::NoValidLanguage`] when `language` is missing or not shared by
/// all targets.
pub fn prepare(targets: &[InstalledInstance], language: Option<Language>) -> Result<Plan, NotReady> {
    if targets.is_empty() {
        return Err(NotReady::NoTargets);
    }
    let language = language
        .filter(|language| compat::common_lang_ids(targets).contains(&language.id()))
        .ok_or(NotReady::NoValidLanguage)?;

    let mut advisories = Vec::new();
    if language == Language::Korean && targets.iter().any(|t| t.name() == PRO_15_NAME) {
        advisories.push(Advisory::Pro15KoreanBuild);
    }

    Ok(Plan {
        language,
        target_count: targets.len(),
        advisories,
    })
}

/// Where the side effects of a change land.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub backup_dir: PathBuf,
    pub backup_prefix: String,
    /// `None` skips the cache stage.
    pub local_app_data: Option<PathBuf>,
    /// Timestamp for the backup file name.
    pub now: DateTime<Local>,
}

/// Folders given on the command line. They win over `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderOverrides {
    pub backup_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
}

impl PipelineSettings {
    /// Picks the backup and cache folders for a run.
    ///
    /// A simulated run only writes where the command line says: the backup
    /// folder must be given, the cache stage runs only with an explicit cache
    /// folder, and `settings.toml` plus the platform defaults are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::Usage`] when a simulated run has no backup folder.
    /// [`Error::Config`] when no backup folder can be found at all.
    pub fn resolve(
        simulated: bool,
        overrides: FolderOverrides,
        config: &Config,
        now: DateTime<Local>,
    ) -> crate::error::Result<Self> {
        let backup_prefix = config.backup.file_prefix().to_string();
        if simulated {
            let backup_dir = overrides.backup_dir.ok_or_else(|| {
                Error::Usage("--simulate needs --backup-dir <DIR> for the registry backup".into())
            })?;
            return Ok(Self {
                backup_dir,
                backup_prefix,
                local_app_data: overrides.cache_dir,
                now,
            });
        }

        let backup_dir = overrides
            .backup_dir
            .or_else(|| config.backup.directory())
            .ok_or_else(|| Error::Config("no folder available for the registry backup".into()))?;
        Ok(Self {
            backup_dir,
            backup_prefix,
            local_app_data: overrides.cache_dir.or_else(|| config.cache.local_app_data()),
            now,
        })
    }
}

/// Runs backup, mutation, asset installation and cache invalidation.
///
/// # Errors
///
/// [`BackupError`] if the snapshot cannot be written. Nothing else has been
/// touched in that case.
pub fn apply(
    store: &dyn ConfigStore,
    bundle: &dyn AssetBundle,
    targets: &[InstalledInstance],
    language: Language,
    settings: &PipelineSettings,
) -> Result<ChangeReport, BackupError> {
    let backup_path = backup::backup(
        store,
        targets,
        &settings.backup_dir,
        &settings.backup_prefix,
        &settings.now,
    )?;

    let registry = mutate::mutate(store, targets, language.id());
    let succeeded = mutate::succeeded(targets, &registry);
    let assets = assets::reconcile(&succeeded, language, bundle);

    let (caches, cache_skipped) = match &settings.local_app_data {
        Some(root) => (cache::invalidate(&succeeded, root), false),
        None => {
            tracing::warn!("local app data folder unknown, plugin caches left alone");
            (Vec::new(), !succeeded.is_empty())
        }
    };

    let report = ChangeReport {
        backup_path,
        registry,
        assets,
        caches,
        cache_skipped,
    };
    tracing::info!(
        registry_ok = report.registry_successes(),
        registry_failed = report.registry_failures(),
        assets_copied = report.assets_copied(),
        caches_cleared = report.cache_successes(),
        "language change finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductDescriptor, ProductFamily};
    use crate::registry::RegistryView;

    fn instance(name: &str, ids: &[u32]) -> InstalledInstance {
        InstalledInstance {
            product: ProductDescriptor::new(
                name,
                ProductFamily::VegasPro,
                [r"SOFTWARE\Sony Creative Software\Vegas Pro"],
                "15.0",
                ids.iter().copied(),
                true,
            ),
            record_path: r"SOFTWARE\Sony Creative Software\Vegas Pro\15.0\Lang".into(),
            install_directory: None,
            view: RegistryView::Registry64,
        }
    }

    #[test]
    fn empty_targets_are_not_ready() {
        assert_eq!(prepare(&[], Some(Language::English)), Err(NotReady::NoTargets));
    }

    #[test]
    fn language_must_be_chosen() {
        let targets = [instance("Vegas Pro 14.0", &[1033])];
        assert_eq!(prepare(&targets, None), Err(NotReady::NoValidLanguage));
    }

    #[test]
    fn language_must_be_shared_by_all_targets() {
        let targets = [
            instance("Vegas Pro 14.0", &[1033, 1042]),
            instance("Vegas Pro 16.0", &[1033]),
        ];
        assert_eq!(
            prepare(&targets, Some(Language::Korean)),
            Err(NotReady::NoValidLanguage)
        );
    }

    #[test]
    fn korean_on_pro_15_needs_acknowledgement() {
        let targets = [
            instance("Vegas Pro 15.0", &[1033, 1042]),
            instance("Vegas Pro 16.0", &[1033, 1042]),
        ];

        let plan = prepare(&targets, Some(Language::Korean)).unwrap();
        assert_eq!(plan.advisories, vec![Advisory::Pro15KoreanBuild]);
        assert_eq!(plan.target_count, 2);

        let plan = prepare(&targets, Some(Language::English)).unwrap();
        assert!(plan.advisories.is_empty());
    }

    fn configured() -> Config {
        let mut config = Config::default();
        config.backup.directory = Some(PathBuf::from("/configured/backups"));
        config.backup.file_prefix = Some("Nightly".into());
        config.cache.local_app_data = Some(PathBuf::from("/configured/appdata"));
        config
    }

    #[test]
    fn simulated_run_ignores_configured_folders() {
        let overrides = FolderOverrides {
            backup_dir: Some(PathBuf::from("/sandbox/backups")),
            cache_dir: None,
        };

        let settings = PipelineSettings::resolve(true, overrides, &configured(), Local::now()).unwrap();

        assert_eq!(settings.backup_dir, PathBuf::from("/sandbox/backups"));
        assert_eq!(settings.local_app_data, None);
        assert_eq!(settings.backup_prefix, "Nightly");
    }

    #[test]
    fn simulated_run_clears_only_the_given_cache_folder() {
        let overrides = FolderOverrides {
            backup_dir: Some(PathBuf::from("/sandbox/backups")),
            cache_dir: Some(PathBuf::from("/sandbox/appdata")),
        };

        let settings = PipelineSettings::resolve(true, overrides, &configured(), Local::now()).unwrap();

        assert_eq!(settings.local_app_data, Some(PathBuf::from("/sandbox/appdata")));
    }

    #[test]
    fn simulated_run_needs_a_backup_folder() {
        let overrides = FolderOverrides {
            backup_dir: None,
            cache_dir: Some(PathBuf::from("/sandbox/appdata")),
        };

        let result = PipelineSettings::resolve(true, overrides, &configured(), Local::now());

        assert!(matches!(result, Err(Error::Usage(msg)) if msg.contains("--backup-dir")));
    }

    #[test]
    fn real_run_prefers_command_line_then_settings() {
        let settings =
            PipelineSettings::resolve(false, FolderOverrides::default(), &configured(), Local::now()).unwrap();
        assert_eq!(settings.backup_dir, PathBuf::from("/configured/backups"));
        assert_eq!(settings.local_app_data, Some(PathBuf::from("/configured/appdata")));

        let overrides = FolderOverrides {
            backup_dir: Some(PathBuf::from("/cli/backups")),
            cache_dir: Some(PathBuf::from("/cli/appdata")),
        };
        let settings = PipelineSettings::resolve(false, overrides, &configured(), Local::now()).unwrap();
        assert_eq!(settings.backup_dir, PathBuf::from("/cli/backups"));
        assert_eq!(settings.local_app_data, Some(PathBuf::from("/cli/appdata")));
    }

    #[test]
    fn summary_names_count_and_language() {
        let mut i18n = I18n::default();
        i18n.set_locale("en-US".parse().unwrap());
        let plan = Plan {
            language: Language::Japanese,
            target_count: 3,
            advisories: Vec::new(),
        };

        let text = plan.summary(&i18n);

        assert!(text.starts_with("The language for 3 selected version(s) will be changed to 'Japanese'."));
    }
}
