// SPDX-License-Identifier: MPL-2.0
//! In-memory registry.
//!
//! Backs the test suite and `--simulate` runs. Keys can be marked unreadable
//! or unwritable to reproduce the access failures seen on locked-down
//! machines. Paths and value names are matched case-insensitively, like the
//! real registry.

use super::{Access, ConfigStore, RecordHandle, RegistryView, StoreError, StoreResult};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RegValue {
    Dword(u32),
    String(String),
}

#[derive(Debug, Clone, Default)]
struct MemoryKey {
    values: BTreeMap<String, RegValue>,
    deny_read: bool,
    deny_write: bool,
    write_failure: Option<String>,
}

type KeyId = (RegistryView, String);

fn key_id(view: RegistryView, path: &str) -> KeyId {
    (view, super::join_path(&[path]).to_lowercase())
}

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RefCell<BTreeMap<KeyId, MemoryKey>>,
    open_handles: Cell<usize>,
    peak_open_handles: Cell<usize>,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the key if needed, without values.
    pub fn insert_key(&self, view: RegistryView, path: &str) -> &Self {
        self.keys.borrow_mut().entry(key_id(view, path)).or_default();
        self
    }

    /// Creates the key if needed and sets a value on it.
    pub fn insert_value(
        &self,
        view: RegistryView,
        path: &str,
        name: &str,
        value: RegValue,
    ) -> &Self {
        self.keys
            .borrow_mut()
            .entry(key_id(view, path))
            .or_default()
            .values
            .insert(name.to_lowercase(), value);
        self
    }

    /// Any open of this key fails with `PermissionDenied`.
    pub fn deny_access(&self, view: RegistryView, path: &str) -> &Self {
        self.keys.borrow_mut().entry(key_id(view, path)).or_default().deny_read = true;
        self
    }

    /// Opening this key for writing fails with `PermissionDenied`.
    pub fn deny_write(&self, view: RegistryView, path: &str) -> &Self {
        self.keys.borrow_mut().entry(key_id(view, path)).or_default().deny_write = true;
        self
    }

    /// The key opens for writing, but every write fails with `message`.
    pub fn fail_writes(&self, view: RegistryView, path: &str, message: &str) -> &Self {
        self.keys
            .borrow_mut()
            .entry(key_id(view, path))
            .or_default()
            .write_failure = Some(message.to_string());
        self
    }

    /// Reads a DWORD without going through a handle.
    #[must_use]
    pub fn dword(&self, view: RegistryView, path: &str, name: &str) -> Option<u32> {
        let keys = self.keys.borrow();
        let value = keys.get(&key_id(view, path))?.values.get(&name.to_lowercase())?;
        match value {
            RegValue::Dword(value) => Some(*value),
            RegValue::String(_) => None,
        }
    }

    /// Highest number of handles that were open at the same time.
    #[must_use]
    pub fn peak_open_handles(&self) -> usize {
        self.peak_open_handles.get()
    }

    #[must_use]
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }

    // =========================================================================
    // Fixtures
    // =========================================================================

    /// Builds a registry from a TOML fixture:
    ///
    /// ```toml
    /// [[key]]
    /// view = "64"
    /// path = 'SOFTWARE\VEGAS Creative Software\VEGAS Pro\20.0'
    /// values = { InstallPath = 'C:\Program Files\VEGAS\VEGAS Pro 20.0' }
    ///
    /// [[key]]
    /// path = 'SOFTWARE\VEGAS Creative Software\VEGAS Pro\20.0\Lang'
    /// values = { ULangID = 1033 }
    /// deny_write = true
    /// ```
    pub fn from_fixture_str(content: &str) -> Result<Self> {
        let fixture: Fixture = toml::from_str(content)?;
        let registry = Self::new();
        for key in fixture.key {
            let view = key.view.into();
            registry.insert_key(view, &key.path);
            for (name, value) in key.values {
                registry.insert_value(view, &key.path, &name, value);
            }
            if key.deny_access {
                registry.deny_access(view, &key.path);
            }
            if key.deny_write {
                registry.deny_write(view, &key.path);
            }
        }
        Ok(registry)
    }

    pub fn load_fixture(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_fixture_str(&content)
    }

    fn release(&self) {
        self.open_handles.set(self.open_handles.get().saturating_sub(1));
    }
}

impl ConfigStore for MemoryRegistry {
    fn open(
        &self,
        view: RegistryView,
        path: &str,
        access: Access,
    ) -> StoreResult<Box<dyn RecordHandle + '_>> {
        let id = key_id(view, path);
        {
            let keys = self.keys.borrow();
            let key = keys.get(&id).ok_or(StoreError::NotFound)?;
            if key.deny_read || (access == Access::Write && key.deny_write) {
                return Err(StoreError::PermissionDenied);
            }
        }

        let open = self.open_handles.get() + 1;
        self.open_handles.set(open);
        self.peak_open_handles.set(self.peak_open_handles.get().max(open));

        Ok(Box::new(MemoryHandle {
            store: self,
            id,
            access,
        }))
    }
}

struct MemoryHandle<'a> {
    store: &'a MemoryRegistry,
    id: KeyId,
    access: Access,
}

impl MemoryHandle<'_> {
    fn value(&self, name: &str) -> StoreResult<RegValue> {
        let keys = self.store.keys.borrow();
        keys.get(&self.id)
            .and_then(|key| key.values.get(&name.to_lowercase()))
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

impl RecordHandle for MemoryHandle<'_> {
    fn read_dword(&self, name: &str) -> StoreResult<u32> {
        match self.value(name)? {
            RegValue::Dword(value) => Ok(value),
            RegValue::String(_) => Err(StoreError::InvalidValue(name.to_string())),
        }
    }

    fn read_string(&self, name: &str) -> StoreResult<String> {
        match self.value(name)? {
            RegValue::String(value) => Ok(value),
            RegValue::Dword(_) => Err(StoreError::InvalidValue(name.to_string())),
        }
    }

    fn write_dword(&self, name: &str, value: u32) -> StoreResult<()> {
        if self.access != Access::Write {
            return Err(StoreError::PermissionDenied);
        }
        let mut keys = self.store.keys.borrow_mut();
        let key = keys.get_mut(&self.id).ok_or(StoreError::NotFound)?;
        if let Some(message) = &key.write_failure {
            return Err(StoreError::Other(message.clone()));
        }
        key.values.insert(name.to_lowercase(), RegValue::Dword(value));
        Ok(())
    }
}

impl Drop for MemoryHandle<'_> {
    fn drop(&mut self) {
        self.store.release();
    }
}

// =============================================================================
// Fixture format
// =============================================================================

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    key: Vec<FixtureKey>,
}

#[derive(Debug, Deserialize)]
struct FixtureKey {
    #[serde(default)]
    view: FixtureView,
    path: String,
    #[serde(default)]
    values: BTreeMap<String, RegValue>,
    #[serde(default)]
    deny_access: bool,
    #[serde(default)]
    deny_write: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
enum FixtureView {
    #[default]
    #[serde(rename = "64")]
    Wide,
    #[serde(rename = "32")]
    Narrow,
}

impl From<FixtureView> for RegistryView {
    fn from(view: FixtureView) -> Self {
        match view {
            FixtureView::Wide => RegistryView::Registry64,
            FixtureView::Narrow => RegistryView::Registry32,
        }
    }
}
