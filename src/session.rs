// SPDX-License-Identifier: MPL-2.0
//! The discovered instances and the operator's current target set.
//!
//! The target set only ever names instances from the current catalog. A
//! re-scan replaces the catalog wholesale and drops targets that vanished.

use crate::catalog::Catalog;
use crate::compat::{self, LanguageOptions};
use crate::discovery::{self, InstalledInstance};
use crate::i18n::I18n;
use crate::language::{LangId, Language};
use crate::registry::ConfigStore;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Default)]
pub struct Session {
    /// Display order.
    instances: Vec<InstalledInstance>,
    targets: HashSet<String>,
    chosen_language: Option<Language>,
}

impl Session {
    #[must_use]
    pub fn new(mut instances: Vec<InstalledInstance>) -> Self {
        discovery::sort_for_display(&mut instances);
        Self {
            instances,
            targets: HashSet::new(),
            chosen_language: None,
        }
    }

    /// Runs discovery and starts a session with nothing targeted.
    pub fn discover(store: &dyn ConfigStore, catalog: &Catalog) -> Self {
        Self::new(discovery::discover(store, catalog))
    }

    /// Replaces the instance catalog with a fresh discovery result.
    pub fn rescan(&mut self, store: &dyn ConfigStore, catalog: &Catalog) {
        self.replace_instances(discovery::discover(store, catalog));
    }

    pub fn replace_instances(&mut self, mut instances: Vec<InstalledInstance>) {
        discovery::sort_for_display(&mut instances);
        self.instances = instances;
        let known: HashSet<&str> = self.instances.iter().map(InstalledInstance::name).collect();
        self.targets.retain(|name| {
            let keep = known.contains(name.as_str());
            if !keep {
                tracing::info!(%name, "target no longer installed, deselected");
            }
            keep
        });
    }

    #[must_use]
    pub fn instances(&self) -> &[InstalledInstance] {
        &self.instances
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[must_use]
    pub fn instance(&self, name: &str) -> Option<&InstalledInstance> {
        self.instances.iter().find(|instance| instance.name() == name)
    }

    /// Targets `name`. Returns `false` if no such instance was discovered.
    pub fn select(&mut self, name: &str) -> bool {
        if self.instance(name).is_none() {
            return false;
        }
        self.targets.insert(name.to_string());
        true
    }

    /// Removes `name` from the targets. Returns whether it was targeted.
    pub fn deselect(&mut self, name: &str) -> bool {
        self.targets.remove(name)
    }

    /// Flips membership of `name`. Returns whether it is now targeted.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.deselect(name) {
            false
        } else {
            self.select(name)
        }
    }

    pub fn select_all(&mut self) {
        self.targets = self
            .instances
            .iter()
            .map(|instance| instance.name().to_string())
            .collect();
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    #[must_use]
    pub fn is_targeted(&self, name: &str) -> bool {
        self.targets.contains(name)
    }

    /// Instances not targeted, in display order.
    #[must_use]
    pub fn available(&self) -> Vec<&InstalledInstance> {
        self.instances
            .iter()
            .filter(|instance| !self.is_targeted(instance.name()))
            .collect()
    }

    /// Targeted instances, in display order.
    #[must_use]
    pub fn targeted(&self) -> Vec<&InstalledInstance> {
        self.instances
            .iter()
            .filter(|instance| self.is_targeted(instance.name()))
            .collect()
    }

    /// Owned copies of the targeted instances, for handing to the pipeline.
    #[must_use]
    pub fn target_set(&self) -> Vec<InstalledInstance> {
        self.targeted().into_iter().cloned().collect()
    }

    #[must_use]
    pub fn common_lang_ids(&self) -> BTreeSet<LangId> {
        compat::common_lang_ids(self.targeted())
    }

    /// Recomputes the language picker for the current targets and remembers
    /// the entry it selects.
    pub fn language_options(&mut self, i18n: &I18n) -> LanguageOptions {
        let options = compat::language_options(self.targeted(), i18n, self.chosen_language);
        self.chosen_language = options.selected().or(self.chosen_language);
        options
    }

    #[must_use]
    pub fn chosen_language(&self) -> Option<Language> {
        self.chosen_language
    }

    pub fn choose_language(&mut self, language: Language) {
        self.chosen_language = Some(language);
    }
}
