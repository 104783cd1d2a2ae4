// SPDX-License-Identifier: MPL-2.0
//! Build script for platform-specific resources.
//!
//! On Windows, this embeds an application manifest requesting administrator
//! rights, since `ULangID` lives under `HKEY_LOCAL_MACHINE`, together with
//! the version metadata shown in file properties.

#[cfg(target_os = "windows")]
const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
  <trustInfo xmlns="urn:schemas-microsoft-com:asm.v3">
    <security>
      <requestedPrivileges>
        <requestedExecutionLevel level="requireAdministrator" uiAccess="false"/>
      </requestedPrivileges>
    </security>
  </trustInfo>
</assembly>
"#;

fn main() {
    println!("cargo:rerun-if-changed=assets/lang_cfg");
    println!("cargo:rerun-if-changed=assets/i18n");

    // Only run on Windows
    #[cfg(target_os = "windows")]
    {
        let mut res = winresource::WindowsResource::new();
        res.set_manifest(MANIFEST);
        res.set("ProductName", "Vegas Language Changer");
        res.set("FileDescription", env!("CARGO_PKG_DESCRIPTION"));
        if let Err(err) = res.compile() {
            println!("cargo:warning=failed to compile Windows resources: {err}");
        }
    }
}
