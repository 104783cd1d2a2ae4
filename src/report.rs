// SPDX-License-Identifier: MPL-2.0
//! Per-instance outcomes and the consolidated end-of-run report.

use crate::assets::AssetOutcome;
use crate::cache::CacheOutcome;
use crate::i18n::I18n;
use crate::mutate::MutationOutcome;
use std::path::PathBuf;

/// Result of one stage for one instance, keyed by instance name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub name: String,
    pub outcome: T,
}

impl<T> Outcome<T> {
    pub fn new(name: impl Into<String>, outcome: T) -> Self {
        Self {
            name: name.into(),
            outcome,
        }
    }
}

/// Everything that happened during one committed language change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub backup_path: PathBuf,
    pub registry: Vec<Outcome<MutationOutcome>>,
    pub assets: Vec<Outcome<AssetOutcome>>,
    pub caches: Vec<Outcome<CacheOutcome>>,
    /// The cache stage did not run because no local app-data root is known.
    pub cache_skipped: bool,
}

impl ChangeReport {
    #[must_use]
    pub fn registry_successes(&self) -> usize {
        self.registry.iter().filter(|o| o.outcome.is_success()).count()
    }

    #[must_use]
    pub fn registry_failures(&self) -> usize {
        self.registry.len() - self.registry_successes()
    }

    #[must_use]
    pub fn assets_copied(&self) -> usize {
        self.assets
            .iter()
            .filter(|o| matches!(o.outcome, AssetOutcome::Copied { .. }))
            .count()
    }

    #[must_use]
    pub fn cache_successes(&self) -> usize {
        self.caches.iter().filter(|o| o.outcome.is_success()).count()
    }

    /// Backup file name, without its directory.
    #[must_use]
    pub fn backup_file_name(&self) -> String {
        self.backup_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.backup_path.display().to_string())
    }

    /// Operator-facing summary. Sections with nothing to say are left out.
    #[must_use]
    pub fn render(&self, i18n: &I18n) -> String {
        let mut sections = vec![i18n.tr_args(
            "task-complete-message",
            &[("backup_path", self.backup_path.display().to_string().into())],
        )];

        let (succeeded, failed): (Vec<_>, Vec<_>) =
            self.registry.iter().partition(|o| o.outcome.is_success());
        if !succeeded.is_empty() {
            let lines = succeeded.iter().map(|o| o.name.clone()).collect();
            sections.push(section(i18n.tr("success"), lines));
        }
        if !failed.is_empty() {
            let lines = failed
                .iter()
                .map(|o| match &o.outcome {
                    MutationOutcome::FailedNoRecord => {
                        format!("{}: {}", o.name, i18n.tr("reg-path-not-found"))
                    }
                    MutationOutcome::FailedWriteError(message) => format!("{}: {message}", o.name),
                    MutationOutcome::Succeeded => o.name.clone(),
                })
                .collect();
            sections.push(section(i18n.tr("failure"), lines));
        }

        let asset_lines = successes_then_failures(
            self.assets
                .iter()
                .filter_map(|o| asset_line(i18n, &o.name, &o.outcome)),
        );
        if !asset_lines.is_empty() {
            sections.push(section(i18n.tr("cfg-copy-results"), asset_lines));
        }

        let mut cache_lines = successes_then_failures(
            self.caches
                .iter()
                .filter_map(|o| cache_line(i18n, &o.name, &o.outcome)),
        );
        if self.cache_skipped {
            cache_lines.push(i18n.tr("cache-clear-skipped"));
        }
        if !cache_lines.is_empty() {
            sections.push(section(i18n.tr("cache-clear-results"), cache_lines));
        }

        sections.join("\n\n")
    }
}

fn section(title: String, lines: Vec<String>) -> String {
    std::iter::once(title)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `(is_success, line)` pairs, successes kept ahead of failures.
fn successes_then_failures(lines: impl Iterator<Item = (bool, String)>) -> Vec<String> {
    let (ok, failed): (Vec<_>, Vec<_>) = lines.partition(|(success, _)| *success);
    ok.into_iter().chain(failed).map(|(_, line)| line).collect()
}

fn asset_line(i18n: &I18n, name: &str, outcome: &AssetOutcome) -> Option<(bool, String)> {
    let line = match outcome {
        AssetOutcome::Copied { file_name, .. } => (
            true,
            i18n.tr_args(
                "cfg-copied",
                &[("version_name", name.into()), ("filename", file_name.as_str().into())],
            ),
        ),
        AssetOutcome::AlreadyPresent | AssetOutcome::NotRequired => return None,
        AssetOutcome::NoInstallDirectory => (
            false,
            i18n.tr_args("cfg-copy-failed-no-dest", &[("version_name", name.into())]),
        ),
        AssetOutcome::SourceMissing => (
            false,
            i18n.tr_args("cfg-copy-failed-no-source", &[("version_name", name.into())]),
        ),
        AssetOutcome::Failed(error) => (
            false,
            i18n.tr_args(
                "cfg-copy-failed-permission",
                &[("version_name", name.into()), ("error", error.as_str().into())],
            ),
        ),
    };
    Some(line)
}

fn cache_line(i18n: &I18n, name: &str, outcome: &CacheOutcome) -> Option<(bool, String)> {
    match outcome {
        CacheOutcome::Cleared { removed: 0 } => None,
        CacheOutcome::Cleared { .. } => Some((
            true,
            i18n.tr_args("cache-cleared", &[("version_name", name.into())]),
        )),
        CacheOutcome::Failed { message, .. } => Some((
            false,
            i18n.tr_args(
                "cache-clear-failed",
                &[("version_name", name.into()), ("error", message.as_str().into())],
            ),
        )),
    }
}
