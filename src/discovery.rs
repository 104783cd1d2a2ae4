// SPDX-License-Identifier: MPL-2.0
//! Finds the VEGAS releases actually installed on this machine.
//!
//! For each catalog entry every `(root, view)` pair is probed in declared
//! order, roots outer and views inner. The first pair whose
//! `<root>\<version>\Lang` key opens wins; the rest are skipped.

use crate::catalog::{Catalog, ProductDescriptor};
use crate::registry::{
    self, Access, ConfigStore, RegistryView, StoreError, StoreResult, Tolerance,
    INSTALL_PATH_VALUE, LANG_SUBKEY,
};
use std::cmp::Ordering;
use std::path::PathBuf;

/// A catalog entry that was found in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledInstance {
    pub product: ProductDescriptor,
    /// Hive-relative path of the key holding `ULangID`. Never empty.
    pub record_path: String,
    pub install_directory: Option<PathBuf>,
    /// View the record was found in.
    pub view: RegistryView,
}

impl InstalledInstance {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.product.name
    }

    #[must_use]
    pub fn version_key(&self) -> &str {
        &self.product.version_key
    }

    /// Display order: numeric version, then name.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.product
            .version_number()
            .total_cmp(&other.product.version_number())
            .then_with(|| self.name().cmp(other.name()))
    }
}

/// Sorts instances for display.
pub fn sort_for_display(instances: &mut [InstalledInstance]) {
    instances.sort_by(InstalledInstance::display_cmp);
}

/// Probes every catalog entry and returns one instance per installed
/// release, deduplicated by name. Order follows the catalog.
pub fn discover(store: &dyn ConfigStore, catalog: &Catalog) -> Vec<InstalledInstance> {
    let mut found: Vec<InstalledInstance> = Vec::new();

    for product in catalog.iter() {
        if found.iter().any(|instance| instance.name() == product.name) {
            tracing::debug!(name = %product.name, "duplicate catalog entry skipped");
            continue;
        }
        if let Some(instance) = locate(store, product) {
            tracing::info!(
                name = %instance.name(),
                view = %instance.view,
                record = %instance.record_path,
                "found installed release"
            );
            found.push(instance);
        }
    }

    found
}

fn locate(store: &dyn ConfigStore, product: &ProductDescriptor) -> Option<InstalledInstance> {
    let candidates = product
        .candidate_roots
        .iter()
        .flat_map(|root| RegistryView::ALL.map(|view| (root.as_str(), view)));

    let probe = registry::probe_first(candidates, Tolerance::Any, |&(root, view)| {
        let version_path = registry::join_path(&[root, &product.version_key]);
        let record_path = registry::join_path(&[&version_path, LANG_SUBKEY]);
        drop(store.open(view, &record_path, Access::Read)?);
        let install_directory = read_install_path(store, view, &version_path);
        Ok((record_path, install_directory))
    });

    match probe {
        Ok(Some(((_, view), (record_path, install_directory)))) => Some(InstalledInstance {
            product: product.clone(),
            record_path,
            install_directory,
            view,
        }),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(name = %product.name, %err, "registry scan failed");
            None
        }
    }
}

/// `InstallPath` on the version key, if present and a non-empty string.
fn read_install_path(
    store: &dyn ConfigStore,
    view: RegistryView,
    version_path: &str,
) -> Option<PathBuf> {
    let read = || -> StoreResult<String> {
        let key = store.open(view, version_path, Access::Read)?;
        key.read_string(INSTALL_PATH_VALUE)
    };
    match read() {
        Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
        Ok(_) | Err(StoreError::NotFound) => None,
        Err(err) => {
            tracing::debug!(path = version_path, %err, "install path unreadable");
            None
        }
    }
}
