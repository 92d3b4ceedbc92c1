//! Internationalization (i18n) module for locale-aware routing.
//!
//! All locale-related logic lives here: the set of supported locales, the
//! validated `Locale` type, path prefix helpers and request negotiation.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported locales and their metadata
//! - `locale`: Type-safe `Locale` validated against the registry
//! - `paths`: Locale-prefixed path construction and stripping
//! - `negotiation`: Pick a locale for an unprefixed request (cookie, geo, header)
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_edge::i18n::{resolve, GeoRule, LocaleRequest, RoutingDecision};
//!
//! let req = LocaleRequest { path: "/projects", cookie: Some("pt-BR"), ..Default::default() };
//! let decision = resolve(&req, &GeoRule::default());
//! assert!(matches!(decision, RoutingDecision::Redirect { .. }));
//! ```

mod locale;
mod negotiation;
mod paths;
mod registry;

pub use locale::Locale;
pub use negotiation::{
    is_excluded, match_language_tag, negotiate, parse_accept_language, resolve, GeoRule,
    LocaleRequest, RoutingDecision,
};
pub use paths::{localized_path, path_locale, strip_locale};
pub use registry::{LocaleConfig, LocaleRegistry};

/// Cookie holding the visitor's explicit locale choice.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";
