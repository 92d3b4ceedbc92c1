//! Locale registry: Single source of truth for all supported locales.
//!
//! This module provides a centralized registry of every locale the site can
//! render in. It uses a singleton pattern with `OnceLock` to ensure thread-safe
//! initialization and access.

use std::sync::OnceLock;

/// Configuration for a supported locale.
///
/// Contains all metadata for a specific locale: its routing code, display
/// name, the language prefix used for `Accept-Language` matching and
/// whether it is the fallback locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Locale code as it appears in URLs and cookies (e.g., "en", "pt-BR")
    pub code: &'static str,

    /// Native name shown in the language switch (e.g., "English", "Português")
    pub native_name: &'static str,

    /// Flag emoji shown next to the native name
    pub flag: &'static str,

    /// OpenGraph locale tag (e.g., "en_US", "pt_BR")
    pub og_locale: &'static str,

    /// Lowercase language prefix matched against `Accept-Language` tags
    pub language: &'static str,

    /// Whether this is the default locale (only one should be true)
    pub is_default: bool,
}

/// Global locale registry singleton.
///
/// Initialized once on first access and immutable thereafter.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its exact code.
    ///
    /// Matching is case-sensitive: `"pt-br"` is not a supported locale.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all locales in registry order.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the default locale configuration.
    ///
    /// # Panics
    /// Panics if zero or several locales are flagged as default (this
    /// indicates a registry definition error).
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }
}

/// Default locale configurations.
///
/// English is the default; Brazilian Portuguese is the only other locale.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            native_name: "English",
            flag: "🇺🇸",
            og_locale: "en_US",
            language: "en",
            is_default: true,
        },
        LocaleConfig {
            code: "pt-BR",
            native_name: "Português",
            flag: "🇧🇷",
            og_locale: "pt_BR",
            language: "pt",
            is_default: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LocaleRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.code, "en");
        assert_eq!(config.native_name, "English");
        assert_eq!(config.og_locale, "en_US");
        assert!(config.is_default);
    }

    #[test]
    fn test_get_by_code_portuguese() {
        let config = LocaleRegistry::get().get_by_code("pt-BR").unwrap();
        assert_eq!(config.code, "pt-BR");
        assert_eq!(config.native_name, "Português");
        assert_eq!(config.language, "pt");
        assert!(!config.is_default);
    }

    #[test]
    fn test_get_by_code_is_case_sensitive() {
        let registry = LocaleRegistry::get();
        assert!(registry.get_by_code("pt-br").is_none());
        assert!(registry.get_by_code("EN").is_none());
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LocaleRegistry::get().get_by_code("fr").is_none());
    }

    #[test]
    fn test_list_all_in_registry_order() {
        let codes: Vec<_> = LocaleRegistry::get()
            .list_all()
            .iter()
            .map(|locale| locale.code)
            .collect();
        assert_eq!(codes, vec!["en", "pt-BR"]);
    }

    #[test]
    fn test_default_locale_is_english() {
        assert_eq!(LocaleRegistry::get().default_locale().code, "en");
    }
}
