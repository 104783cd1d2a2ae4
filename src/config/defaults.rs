// SPDX-License-Identifier: MPL-2.0
//! Default values for settings that `settings.toml` may leave out.

/// Program UI locale used when nothing else resolves, and the locale every
/// lookup falls back to.
pub const DEFAULT_UI_LOCALE: &str = "en-US";

/// Registry backup file name prefix.
pub const DEFAULT_BACKUP_FILE_PREFIX: &str = crate::backup::DEFAULT_FILE_PREFIX;

/// Log level used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
