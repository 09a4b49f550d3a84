//! Translation lookup.
//!
//! Message keys are the `zh_cn` source strings, gettext style: the default
//! locale needs no table because its translation is the key itself. Other
//! locales are flat TOML tables embedded at build time.

use anyhow::{Context, Result};
use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "zh_cn";

static EN: &str = include_str!("../locales/en.toml");
static RU: &str = include_str!("../locales/ru.toml");

pub trait Translator: Send + Sync {
    /// Never fails: unknown locales and missing keys fall back to the key.
    fn translate(&self, key: &str, locale: &str) -> String;
}

/// Per-locale translation tables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locales: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Catalog with every locale shipped in `locales/`.
    pub fn builtin() -> Result<Self> {
        Catalog::default().with_locale("en", EN)?.with_locale("ru", RU)
    }

    /// Add (or replace) the table for `locale`, parsed from a flat TOML document.
    pub fn with_locale(mut self, locale: &str, source: &str) -> Result<Self> {
        let table: HashMap<String, String> = toml::from_str(source)
            .with_context(|| format!("Failed to parse translation catalogue for '{locale}'"))?;

        self.locales.insert(normalize(locale), table);
        Ok(self)
    }

    /// Default locale first, then the loaded ones in alphabetical order.
    pub fn available_locales(&self) -> Vec<String> {
        let mut loaded: Vec<String> =
            self.locales.keys().filter(|l| l.as_str() != DEFAULT_LOCALE).cloned().collect();
        loaded.sort();

        let mut all = vec![DEFAULT_LOCALE.to_string()];
        all.extend(loaded);
        all
    }

    fn table(&self, locale: &str) -> Option<&HashMap<String, String>> {
        let locale = normalize(locale);
        if let Some(table) = self.locales.get(&locale) {
            return Some(table);
        }

        let language = locale.split('_').next()?;
        self.locales.get(language)
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, locale: &str) -> String {
        self.table(locale)
            .and_then(|table| table.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn normalize(locale: &str) -> String {
    locale.trim().to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().expect("embedded catalogues must parse")
    }

    #[test]
    fn default_locale_returns_key() {
        assert_eq!(catalog().translate("湿度", DEFAULT_LOCALE), "湿度");
    }

    #[test]
    fn known_locale_is_translated() {
        let catalog = catalog();
        assert_eq!(catalog.translate("湿度", "en"), "Humidity");
        assert_eq!(catalog.translate("湿度", "ru"), "Влажность");
    }

    #[test]
    fn region_and_case_variants_resolve_to_language() {
        let catalog = catalog();
        assert_eq!(catalog.translate("日出", "en-US"), "Sunrise");
        assert_eq!(catalog.translate("日出", "EN_gb"), "Sunrise");
    }

    #[test]
    fn unknown_locale_or_key_falls_back_to_key() {
        let catalog = catalog();
        assert_eq!(catalog.translate("湿度", "de"), "湿度");
        assert_eq!(catalog.translate("no such key", "en"), "no such key");
    }

    #[test]
    fn embedded_catalogues_cover_the_same_keys() {
        let en: HashMap<String, String> = toml::from_str(EN).unwrap();
        let ru: HashMap<String, String> = toml::from_str(RU).unwrap();

        let mut en_keys: Vec<_> = en.keys().collect();
        let mut ru_keys: Vec<_> = ru.keys().collect();
        en_keys.sort();
        ru_keys.sort();
        assert_eq!(en_keys, ru_keys);
    }

    #[test]
    fn available_locales_lists_default_first() {
        assert_eq!(catalog().available_locales(), vec!["zh_cn", "en", "ru"]);
    }

    #[test]
    fn with_locale_replaces_existing_table() {
        let catalog = catalog().with_locale("en", r#""湿度" = "Moisture""#).unwrap();
        assert_eq!(catalog.translate("湿度", "en"), "Moisture");
        assert_eq!(catalog.translate("日出", "en"), "日出");
    }

    #[test]
    fn malformed_catalogue_is_an_error() {
        let err = Catalog::default().with_locale("xx", "not = [valid").unwrap_err();
        assert!(err.to_string().contains("'xx'"));
    }
}
