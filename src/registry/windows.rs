// SPDX-License-Identifier: MPL-2.0
//! `HKEY_LOCAL_MACHINE` through `winreg`.

use super::{Access, ConfigStore, RecordHandle, RegistryView, StoreResult};
use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_32KEY, KEY_WOW64_64KEY, KEY_WRITE};
use winreg::RegKey;

#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsRegistry;

impl WindowsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConfigStore for WindowsRegistry {
    fn open(
        &self,
        view: RegistryView,
        path: &str,
        access: Access,
    ) -> StoreResult<Box<dyn RecordHandle + '_>> {
        let view_flag = match view {
            RegistryView::Registry64 => KEY_WOW64_64KEY,
            RegistryView::Registry32 => KEY_WOW64_32KEY,
        };
        let access_flag = match access {
            Access::Read => KEY_READ,
            Access::Write => KEY_READ | KEY_WRITE,
        };
        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let key = hklm.open_subkey_with_flags(path, access_flag | view_flag)?;
        Ok(Box::new(WindowsKey(key)))
    }
}

/// Closes the underlying `HKEY` on drop.
struct WindowsKey(RegKey);

impl RecordHandle for WindowsKey {
    fn read_dword(&self, name: &str) -> StoreResult<u32> {
        Ok(self.0.get_value::<u32, _>(name)?)
    }

    fn read_string(&self, name: &str) -> StoreResult<String> {
        Ok(self.0.get_value::<String, _>(name)?)
    }

    fn write_dword(&self, name: &str, value: u32) -> StoreResult<()> {
        Ok(self.0.set_value(name, &value)?)
    }
}
