// SPDX-License-Identifier: MPL-2.0
//! Languages every targeted release can be switched to.

use crate::discovery::InstalledInstance;
use crate::i18n::I18n;
use crate::language::{LangId, Language};
use std::collections::BTreeSet;

/// Intersection of the supported ids of all `targets`. Empty for an empty
/// target set.
#[must_use]
pub fn common_lang_ids<'a, I>(targets: I) -> BTreeSet<LangId>
where
    I: IntoIterator<Item = &'a InstalledInstance>,
{
    let mut targets = targets.into_iter();
    let Some(first) = targets.next() else {
        return BTreeSet::new();
    };
    targets.fold(first.product.supported_lang_ids.clone(), |common, instance| {
        common
            .intersection(&instance.product.supported_lang_ids)
            .copied()
            .collect()
    })
}

/// Common ids that map to a known [`Language`], in id order.
#[must_use]
pub fn common_languages<'a, I>(targets: I) -> Vec<Language>
where
    I: IntoIterator<Item = &'a InstalledInstance>,
{
    common_lang_ids(targets)
        .into_iter()
        .filter_map(LangId::language)
        .collect()
}

/// What the language picker offers for the current targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageOptions {
    /// Nothing is targeted.
    SelectVersion,
    /// The targets share no known language.
    NoCommonLanguage,
    /// `(language, localized name)` pairs sorted by name, and the entry
    /// that starts out chosen.
    Choices {
        options: Vec<(Language, String)>,
        selected: Language,
    },
}

impl LanguageOptions {
    #[must_use]
    pub fn selected(&self) -> Option<Language> {
        match self {
            LanguageOptions::Choices { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    /// Placeholder text or the localized option names, one per entry.
    #[must_use]
    pub fn labels(&self, i18n: &I18n) -> Vec<String> {
        match self {
            LanguageOptions::SelectVersion => vec![i18n.tr("select-version")],
            LanguageOptions::NoCommonLanguage => vec![i18n.tr("no-common-lang")],
            LanguageOptions::Choices { options, .. } => {
                options.iter().map(|(_, name)| name.clone()).collect()
            }
        }
    }
}

/// Builds the picker contents. `previous` stays selected when the targets
/// still share it; otherwise the first option is.
pub fn language_options<'a, I>(targets: I, i18n: &I18n, previous: Option<Language>) -> LanguageOptions
where
    I: IntoIterator<Item = &'a InstalledInstance>,
{
    let mut targets = targets.into_iter().peekable();
    if targets.peek().is_none() {
        return LanguageOptions::SelectVersion;
    }

    let mut options: Vec<(Language, String)> = common_languages(targets)
        .into_iter()
        .map(|language| (language, i18n.language_name(language)))
        .collect();
    options.sort_by(|(_, a), (_, b)| a.cmp(b));

    let Some(&(first, _)) = options.first() else {
        return LanguageOptions::NoCommonLanguage;
    };
    let selected = previous
        .filter(|prev| options.iter().any(|(language, _)| language == prev))
        .unwrap_or(first);
    LanguageOptions::Choices { options, selected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductDescriptor, ProductFamily};
    use crate::registry::RegistryView;
    use proptest::prelude::*;

    fn instance(name: &str, ids: &[u32]) -> InstalledInstance {
        InstalledInstance {
            product: ProductDescriptor::new(
                name,
                ProductFamily::VegasPro,
                ["SOFTWARE"],
                "1.0",
                ids.iter().copied(),
                false,
            ),
            record_path: r"SOFTWARE\1.0\Lang".into(),
            install_directory: None,
            view: RegistryView::Registry64,
        }
    }

    fn ids(raw: &[u32]) -> BTreeSet<LangId> {
        raw.iter().copied().map(LangId::new).collect()
    }

    #[test]
    fn empty_target_set_has_no_common_languages() {
        assert!(common_lang_ids(std::iter::empty()).is_empty());
    }

    #[test]
    fn single_instance_keeps_all_its_ids() {
        let a = instance("a", &[1033, 1041]);
        assert_eq!(common_lang_ids([&a]), ids(&[1033, 1041]));
    }

    #[test]
    fn intersects_three_instances() {
        let a = instance("a", &[1033, 1042, 1041]);
        let b = instance("b", &[1033, 1042]);
        let c = instance("c", &[1033, 1042, 2052]);
        assert_eq!(common_lang_ids([&a, &b, &c]), ids(&[1033, 1042]));
    }

    #[test]
    fn unknown_ids_are_dropped_from_languages() {
        let a = instance("a", &[1033, 4242]);
        let b = instance("b", &[1033, 4242]);
        assert_eq!(common_languages([&a, &b]), vec![Language::English]);
    }

    fn english() -> I18n {
        let mut i18n = I18n::default();
        i18n.set_locale("en-US".parse().unwrap());
        i18n
    }

    #[test]
    fn options_placeholder_without_targets() {
        let options = language_options(std::iter::empty(), &english(), None);
        assert_eq!(options, LanguageOptions::SelectVersion);
        assert_eq!(options.labels(&english()), vec!["Select a Version".to_string()]);
    }

    #[test]
    fn options_placeholder_without_common_language() {
        let a = instance("a", &[1041]);
        let b = instance("b", &[1042]);
        let options = language_options([&a, &b], &english(), Some(Language::Korean));
        assert_eq!(options, LanguageOptions::NoCommonLanguage);
        assert_eq!(options.selected(), None);
    }

    #[test]
    fn options_sorted_by_localized_name() {
        let a = instance("a", &[1042, 1031, 1033]);
        let options = language_options([&a], &english(), None);
        assert_eq!(
            options.labels(&english()),
            vec!["English".to_string(), "German".to_string(), "Korean".to_string()]
        );
        assert_eq!(options.selected(), Some(Language::English));
    }

    #[test]
    fn previous_choice_kept_when_still_common() {
        let a = instance("a", &[1042, 1033]);
        let options = language_options([&a], &english(), Some(Language::Korean));
        assert_eq!(options.selected(), Some(Language::Korean));

        let options = language_options([&a], &english(), Some(Language::French));
        assert_eq!(options.selected(), Some(Language::English));
    }

    proptest! {
        #[test]
        fn intersection_is_contained_in_every_target(
            sets in proptest::collection::vec(
                proptest::collection::btree_set(1030u32..1050, 0..8),
                1..5,
            )
        ) {
            let instances: Vec<_> = sets
                .iter()
                .enumerate()
                .map(|(i, set)| instance(&i.to_string(), &set.iter().copied().collect::<Vec<_>>()))
                .collect();
            let common = common_lang_ids(&instances);
            for instance in &instances {
                prop_assert!(common.is_subset(&instance.product.supported_lang_ids));
            }
            // Anything supported by all targets must be in the result.
            for id in &instances[0].product.supported_lang_ids {
                let everywhere = instances
                    .iter()
                    .all(|i| i.product.supported_lang_ids.contains(id));
                prop_assert_eq!(everywhere, common.contains(id));
            }
        }
    }
}
