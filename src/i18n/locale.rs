//! Locale type: validated locale representation.
//!
//! A `Locale` can only be built from a code present in the registry, so any
//! value of this type is one of the supported locales.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    /// Locale code (e.g., "en", "pt-BR")
    code: &'static str,
}

impl Locale {
    /// English, the default locale.
    pub const ENGLISH: Locale = Locale { code: "en" };

    /// Brazilian Portuguese.
    pub const PORTUGUESE_BR: Locale = Locale { code: "pt-BR" };

    /// Create a Locale from a code string.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code exactly matches a supported locale
    /// * `Err` otherwise (matching is case-sensitive)
    pub fn from_code(code: &str) -> Result<Locale> {
        match LocaleRegistry::get().get_by_code(code) {
            Some(config) => Ok(Locale { code: config.code }),
            None => bail!("Unsupported locale: '{}'", code),
        }
    }

    /// The locale requests fall back to when nothing else matches.
    pub fn default_locale() -> Locale {
        Locale {
            code: LocaleRegistry::get().default_locale().code,
        }
    }

    /// All supported locales in registry order.
    pub fn all() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_all()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a Locale built through `from_code` or the constants.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be valid")
    }

    /// Native display name (e.g., "Português").
    pub fn name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn flag(&self) -> &'static str {
        self.config().flag
    }

    /// OpenGraph locale tag (e.g., "pt_BR").
    pub fn og_locale(&self) -> &'static str {
        self.config().og_locale
    }

    /// Primary language subtag (e.g., "pt").
    pub fn language(&self) -> &'static str {
        self.config().language
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
