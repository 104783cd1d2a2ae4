// SPDX-License-Identifier: MPL-2.0
//! Display-language identifiers.
//!
//! VEGAS stores its UI language as a Windows LCID (`ULangID`, a DWORD). This
//! module maps those numeric ids to the symbolic keys used for text lookup
//! and for naming the auxiliary `local_<suffix>.cfg` files.

use std::fmt;
use std::str::FromStr;

/// Numeric language id as written to the registry (e.g. `1042`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LangId(u32);

impl LangId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw DWORD value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the known language for this id, if any.
    #[must_use]
    pub fn language(self) -> Option<Language> {
        Language::from_id(self)
    }
}

impl fmt::Display for LangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A display language VEGAS knows how to run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    German,
    English,
    Spanish,
    French,
    Japanese,
    Korean,
    Polish,
    Portuguese,
    Russian,
    ChineseSimplified,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::German,
        Language::English,
        Language::Spanish,
        Language::French,
        Language::Japanese,
        Language::Korean,
        Language::Polish,
        Language::Portuguese,
        Language::Russian,
        Language::ChineseSimplified,
    ];

    #[must_use]
    pub fn id(self) -> LangId {
        LangId(match self {
            Language::German => 1031,
            Language::English => 1033,
            Language::Spanish => 1034,
            Language::French => 1036,
            Language::Japanese => 1041,
            Language::Korean => 1042,
            Language::Polish => 1045,
            Language::Portuguese => 1046,
            Language::Russian => 1049,
            Language::ChineseSimplified => 2052,
        })
    }

    /// Symbolic key. The display name is looked up under
    /// [`crate::i18n::language_message_id`].
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Language::German => "german",
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::Japanese => "japanese",
            Language::Korean => "korean",
            Language::Polish => "polish",
            Language::Portuguese => "portuguese",
            Language::Russian => "russian",
            Language::ChineseSimplified => "chinese_simplified",
        }
    }

    /// Locale suffix of the auxiliary `.cfg` file, or `None` when VEGAS needs
    /// no extra file for this language.
    #[must_use]
    pub fn cfg_suffix(self) -> Option<&'static str> {
        match self {
            Language::German => Some("de_DE"),
            Language::English => Some("en_US"),
            Language::Spanish => Some("es_ES"),
            Language::French => Some("fr_FR"),
            Language::Japanese => Some("ja_JP"),
            Language::Korean => Some("ko_KR"),
            Language::Portuguese => Some("pt_BR"),
            Language::ChineseSimplified => Some("zh_CN"),
            Language::Polish | Language::Russian => None,
        }
    }

    /// File name of the auxiliary asset, e.g. `local_ko_KR.cfg`.
    #[must_use]
    pub fn cfg_file_name(self) -> Option<String> {
        self.cfg_suffix().map(|suffix| format!("local_{suffix}.cfg"))
    }

    #[must_use]
    pub fn from_id(id: LangId) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.id() == id)
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.key() == key)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Accepts either the symbolic key (`korean`) or the numeric id (`1042`).
impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<u32>() {
            return Language::from_id(LangId(raw))
                .ok_or_else(|| format!("unknown language id '{raw}'"));
        }
        Language::from_key(&trimmed.to_lowercase())
            .ok_or_else(|| format!("unknown language '{trimmed}'"))
    }
}
