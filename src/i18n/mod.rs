// SPDX-License-Identifier: MPL-2.0
//! Program text in the operator's language.
//!
//! Translations are Fluent (`.ftl`) files embedded at build time, one per
//! locale. Every lookup tries the current locale, then `en-US`, and finally
//! yields the sentinel `MISSING: <key>` so a gap in a table is visible
//! instead of silently empty.
//!
//! # Locale Resolution
//!
//! 1. `--ui-lang` command-line argument
//! 2. `[general] language` in `settings.toml`
//! 3. Operating system locale
//! 4. `en-US`
//!
//! A candidate that has no table of its own still matches a table for the
//! same language (`ko-KR` selects `ko`).

pub mod fluent;

pub use fluent::I18n;

use crate::language::Language;
use unic_langid::LanguageIdentifier;

/// Message id holding the localized display name of `language`.
#[must_use]
pub fn language_message_id(language: Language) -> String {
    format!("language-{}", language.key().replace('_', "-"))
}

/// Picks the first candidate that matches an available locale.
pub fn resolve_locale(
    cli_lang: Option<&str>,
    config_lang: Option<&str>,
    system_lang: Option<&str>,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    [cli_lang, config_lang, system_lang]
        .into_iter()
        .flatten()
        .find_map(|candidate| match_available(candidate, available))
}

/// Exact match first, then any available locale with the same language
/// subtag.
fn match_available(candidate: &str, available: &[LanguageIdentifier]) -> Option<LanguageIdentifier> {
    let wanted: LanguageIdentifier = candidate.replace('_', "-").parse().ok()?;
    available
        .iter()
        .find(|locale| **locale == wanted)
        .or_else(|| {
            available
                .iter()
                .find(|locale| locale.language == wanted.language)
        })
        .cloned()
}
