// SPDX-License-Identifier: MPL-2.0
//! Writes the new `ULangID` into each targeted release.
//!
//! Views are tried in order until one opens the record for writing. Once a
//! writable handle exists, that view is the only one used: a failing write
//! is reported as is and the other view is not attempted. Every instance is
//! handled on its own; one failure never stops or undoes another.

use crate::discovery::InstalledInstance;
use crate::language::LangId;
use crate::registry::{self, Access, ConfigStore, RegistryView, Tolerance, LANG_ID_VALUE};
use crate::report::Outcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Succeeded,
    /// No view had the record.
    FailedNoRecord,
    /// The record was reachable but the write (or the write open) failed.
    FailedWriteError(String),
}

impl MutationOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Succeeded)
    }
}

/// Sets `lang_id` on every instance. Results are in input order.
pub fn mutate(
    store: &dyn ConfigStore,
    instances: &[InstalledInstance],
    lang_id: LangId,
) -> Vec<Outcome<MutationOutcome>> {
    instances
        .iter()
        .map(|instance| Outcome::new(instance.name(), mutate_one(store, instance, lang_id)))
        .collect()
}

fn mutate_one(
    store: &dyn ConfigStore,
    instance: &InstalledInstance,
    lang_id: LangId,
) -> MutationOutcome {
    let probe = registry::probe_first(RegistryView::ALL, Tolerance::Missing, |&view| {
        let key = store.open(view, &instance.record_path, Access::Write)?;
        key.write_dword(LANG_ID_VALUE, lang_id.value())
    });

    match probe {
        Ok(Some((view, ()))) => {
            tracing::info!(name = %instance.name(), %view, %lang_id, "language value written");
            MutationOutcome::Succeeded
        }
        Ok(None) => {
            tracing::warn!(name = %instance.name(), "language record not found in any view");
            MutationOutcome::FailedNoRecord
        }
        Err(err) => {
            tracing::warn!(name = %instance.name(), %err, "language value not written");
            MutationOutcome::FailedWriteError(err.to_string())
        }
    }
}

/// The instances whose outcome is [`MutationOutcome::Succeeded`], in input
/// order.
#[must_use]
pub fn succeeded<'a>(
    instances: &'a [InstalledInstance],
    outcomes: &[Outcome<MutationOutcome>],
) -> Vec<&'a InstalledInstance> {
    instances
        .iter()
        .filter(|instance| {
            outcomes
                .iter()
                .any(|o| o.name == instance.name() && o.outcome.is_success())
        })
        .collect()
}
