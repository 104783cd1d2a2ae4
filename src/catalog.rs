// SPDX-License-Identifier: MPL-2.0
//! Static description of every VEGAS release this tool knows about.
//!
//! The catalog is built once at startup and handed by reference to the
//! discovery engine. Nothing mutates it afterwards.

use crate::language::LangId;
use std::collections::BTreeSet;

// =============================================================================
// ProductFamily
// =============================================================================

/// Product line a release belongs to. Drives the cache directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductFamily {
    VegasPro,
    MovieStudio,
}

impl ProductFamily {
    /// Folder name under the local application-data directory that holds
    /// the per-version plugin caches.
    #[must_use]
    pub fn cache_folder(self) -> &'static str {
        match self {
            ProductFamily::VegasPro => "VEGAS Pro",
            ProductFamily::MovieStudio => "Movie Studio Platinum",
        }
    }
}

// =============================================================================
// ProductDescriptor
// =============================================================================

/// One known release: where to look for it and what it supports.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDescriptor {
    /// Display name, also the identity of a discovered instance.
    pub name: String,
    pub family: ProductFamily,
    /// Registry roots to probe, in priority order.
    pub candidate_roots: Vec<String>,
    /// Version sub-key under each root, e.g. `"23.0"`.
    pub version_key: String,
    pub supported_lang_ids: BTreeSet<LangId>,
    /// Whether switching language also needs a `local_<locale>.cfg` file.
    pub requires_asset_install: bool,
}

impl ProductDescriptor {
    pub fn new(
        name: impl Into<String>,
        family: ProductFamily,
        candidate_roots: impl IntoIterator<Item = impl Into<String>>,
        version_key: impl Into<String>,
        supported_lang_ids: impl IntoIterator<Item = u32>,
        requires_asset_install: bool,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            candidate_roots: candidate_roots.into_iter().map(Into::into).collect(),
            version_key: version_key.into(),
            supported_lang_ids: supported_lang_ids.into_iter().map(LangId::new).collect(),
            requires_asset_install,
        }
    }

    /// Numeric value of the version key, used for display ordering.
    /// Unparseable keys sort last.
    #[must_use]
    pub fn version_number(&self) -> f64 {
        parse_version(&self.version_key)
    }
}

pub(crate) fn parse_version(version_key: &str) -> f64 {
    version_key.trim().parse::<f64>().unwrap_or(f64::MAX)
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<ProductDescriptor>,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<ProductDescriptor>) -> Self {
        Self { products }
    }

    /// The releases shipped with the tool.
    #[must_use]
    pub fn builtin() -> Self {
        let products = BUILTIN
            .iter()
            .map(|entry| {
                ProductDescriptor::new(
                    entry.name,
                    entry.family,
                    entry.roots.iter().copied(),
                    entry.version_key,
                    entry.lang_ids.iter().copied(),
                    entry.requires_asset_install,
                )
            })
            .collect();
        Self { products }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductDescriptor> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProductDescriptor> {
        self.products.iter().find(|product| product.name == name)
    }
}

// =============================================================================
// Built-in data
// =============================================================================

struct Entry {
    name: &'static str,
    family: ProductFamily,
    roots: &'static [&'static str],
    version_key: &'static str,
    lang_ids: &'static [u32],
    requires_asset_install: bool,
}

const SONY_PRO: &[&str] = &[r"SOFTWARE\Sony Creative Software\Vegas Pro"];
const MODERN_PRO: &[&str] = &[
    r"SOFTWARE\VEGAS Creative Software\VEGAS Pro",
    r"SOFTWARE\MAGIX\VEGAS Pro",
    r"SOFTWARE\Sony Creative Software\Vegas Pro",
];
const SONY_MEDIA_MS: &[&str] = &[r"SOFTWARE\Sony Media Software\Vegas Movie Studio"];
const SONY_MEDIA_MSP: &[&str] = &[r"SOFTWARE\Sony Media Software\Vegas Movie Studio Platinum"];
const SONY_MS: &[&str] = &[r"SOFTWARE\Sony Creative Software\Vegas Movie Studio"];
const SONY_MSP_LEGACY: &[&str] = &[r"SOFTWARE\Sony Creative Software\Vegas Movie Studio Platinum"];
const SONY_MS_HD: &[&str] = &[r"SOFTWARE\Sony Creative Software\Vegas Movie Studio HD Platinum"];
const SONY_MSP: &[&str] = &[r"SOFTWARE\Sony Creative Software\Movie Studio Platinum"];
const MODERN_MSP: &[&str] = &[
    r"SOFTWARE\VEGAS\Movie Studio Platinum",
    r"SOFTWARE\MAGIX\Movie Studio Platinum",
    r"SOFTWARE\Sony Creative Software\Movie Studio Platinum",
];

const WESTERN_JA: &[u32] = &[1031, 1033, 1034, 1036, 1041];
const WESTERN_JA_RU: &[u32] = &[1031, 1033, 1034, 1036, 1041, 1049];
const SONY_LATE: &[u32] = &[1031, 1033, 1034, 1036, 1041, 1045, 1049, 2052];
const PRO_15: &[u32] = &[1031, 1033, 1034, 1036, 1041, 1042, 1045, 1049, 2052];
const PRO_16: &[u32] = &[1031, 1033, 1034, 1036, 1041, 1042, 1045, 1046, 1049, 2052];
const PRO_MODERN: &[u32] = &[1031, 1033, 1034, 1036, 1041, 1042, 1045, 1046, 2052];
const MSP_MAGIX: &[u32] = &[1031, 1033, 1034, 1036, 1041, 1045, 1046, 1049, 2052];
const MSP_MODERN: &[u32] = &[1031, 1033, 1034, 1036, 1041, 1042, 1045, 1046, 1049, 2052];

macro_rules! pro {
    ($version:literal, $roots:expr, $ids:expr, $cfg:literal) => {
        Entry {
            name: concat!("Vegas Pro ", $version),
            family: ProductFamily::VegasPro,
            roots: $roots,
            version_key: $version,
            lang_ids: $ids,
            requires_asset_install: $cfg,
        }
    };
}

macro_rules! studio {
    ($name:literal, $version:literal, $roots:expr, $ids:expr) => {
        Entry {
            name: concat!($name, " ", $version),
            family: ProductFamily::MovieStudio,
            roots: $roots,
            version_key: $version,
            lang_ids: $ids,
            requires_asset_install: false,
        }
    };
}

const BUILTIN: &[Entry] = &[
    pro!("9.0", SONY_PRO, WESTERN_JA, false),
    pro!("10.0", SONY_PRO, WESTERN_JA, false),
    pro!("11.0", SONY_PRO, WESTERN_JA_RU, false),
    pro!("12.0", SONY_PRO, WESTERN_JA_RU, false),
    pro!("13.0", SONY_PRO, SONY_LATE, false),
    pro!("14.0", MODERN_PRO, SONY_LATE, true),
    pro!("15.0", MODERN_PRO, PRO_15, true),
    pro!("16.0", MODERN_PRO, PRO_16, true),
    pro!("17.0", MODERN_PRO, PRO_MODERN, true),
    pro!("18.0", MODERN_PRO, PRO_MODERN, true),
    pro!("19.0", MODERN_PRO, PRO_MODERN, true),
    pro!("20.0", MODERN_PRO, PRO_MODERN, true),
    pro!("21.0", MODERN_PRO, PRO_MODERN, true),
    pro!("22.0", MODERN_PRO, PRO_MODERN, true),
    pro!("23.0", MODERN_PRO, PRO_MODERN, true),
    studio!("Vegas Movie Studio", "8.0", SONY_MEDIA_MS, WESTERN_JA),
    studio!("Vegas Movie Studio Platinum", "8.0", SONY_MEDIA_MSP, WESTERN_JA),
    studio!("Vegas Movie Studio", "9.0", SONY_MS, &[1033]),
    studio!("Vegas Movie Studio Platinum", "9.0", SONY_MSP_LEGACY, WESTERN_JA),
    studio!("Vegas Movie Studio HD Platinum", "10.0", SONY_MS_HD, WESTERN_JA),
    studio!("Vegas Movie Studio HD Platinum", "11.0", SONY_MS_HD, WESTERN_JA),
    studio!("Vegas Movie Studio Platinum", "12.0", SONY_MSP, SONY_LATE),
    studio!("Vegas Movie Studio Platinum", "13.0", SONY_MSP, SONY_LATE),
    studio!("Vegas Movie Studio Platinum", "14.0", MODERN_MSP, MSP_MAGIX),
    studio!("Vegas Movie Studio Platinum", "15.0", MODERN_MSP, MSP_MAGIX),
    studio!("Vegas Movie Studio Platinum", "16.0", MODERN_MSP, MSP_MODERN),
    studio!("Vegas Movie Studio Platinum", "17.0", MODERN_MSP, MSP_MODERN),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_names_are_unique() {
        let catalog = Catalog::builtin();
        let names: HashSet<_> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn every_builtin_entry_has_roots_and_languages() {
        for product in Catalog::builtin().iter() {
            assert!(!product.candidate_roots.is_empty(), "{}", product.name);
            assert!(!product.supported_lang_ids.is_empty(), "{}", product.name);
        }
    }

    #[test]
    fn modern_pro_releases_require_cfg_files() {
        let catalog = Catalog::builtin();
        assert!(catalog.get("Vegas Pro 23.0").unwrap().requires_asset_install);
        assert!(catalog.get("Vegas Pro 14.0").unwrap().requires_asset_install);
        assert!(!catalog.get("Vegas Pro 13.0").unwrap().requires_asset_install);
        assert!(
            !catalog
                .get("Vegas Movie Studio Platinum 17.0")
                .unwrap()
                .requires_asset_install
        );
    }

    #[test]
    fn modern_pro_probes_vegas_creative_root_first() {
        let catalog = Catalog::builtin();
        let pro = catalog.get("Vegas Pro 20.0").unwrap();
        assert_eq!(
            pro.candidate_roots.first().map(String::as_str),
            Some(r"SOFTWARE\VEGAS Creative Software\VEGAS Pro")
        );
        assert_eq!(pro.family, ProductFamily::VegasPro);
    }

    #[test]
    fn version_number_parses_key() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get("Vegas Pro 9.0").unwrap().version_number(), 9.0);
        assert!(parse_version("garbage") > 1000.0);
    }

    #[test]
    fn cache_folder_per_family() {
        assert_eq!(ProductFamily::VegasPro.cache_folder(), "VEGAS Pro");
        assert_eq!(
            ProductFamily::MovieStudio.cache_folder(),
            "Movie Studio Platinum"
        );
    }
}
