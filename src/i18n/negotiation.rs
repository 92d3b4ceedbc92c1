//! Locale negotiation for inbound page requests.
//!
//! Decides whether a request path already carries a supported locale and, if
//! not, which locale to redirect it to. Precedence, first match wins:
//!
//! 1. the locale preference cookie
//! 2. the geo country signal (one trigger country maps to one locale)
//! 3. the `Accept-Language` header, scanned in header order
//! 4. the default locale
//!
//! Everything here is pure: no I/O, no shared state.

use crate::i18n::paths::{localized_path, path_locale};
use crate::i18n::Locale;

/// Path prefixes that are never locale-routed.
const EXCLUDED_PREFIXES: &[&str] = &["/api", "/_next", "/images", "/fonts", "/static"];

/// Request signals consulted during negotiation. Every signal is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleRequest<'a> {
    pub path: &'a str,
    /// Raw query string without the leading `?`
    pub query: Option<&'a str>,
    /// Value of the locale preference cookie
    pub cookie: Option<&'a str>,
    /// Country code resolved upstream by edge infrastructure
    pub country: Option<&'a str>,
    /// Raw `Accept-Language` header value
    pub accept_language: Option<&'a str>,
}

/// Outcome of locale negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Serve the request as-is.
    PassThrough,
    /// Redirect to the locale-prefixed location (query preserved).
    Redirect { location: String, locale: Locale },
}

/// Maps a single country code to the locale it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoRule {
    pub country: String,
    pub locale: Locale,
}

impl GeoRule {
    pub fn new(country: impl Into<String>, locale: Locale) -> Self {
        Self {
            country: country.into(),
            locale,
        }
    }

    fn matches(&self, country: &str) -> bool {
        self.country == country
    }
}

impl Default for GeoRule {
    fn default() -> Self {
        Self::new("BR", Locale::PORTUGUESE_BR)
    }
}

/// Whether `path` targets API routes, build output, static assets, or any
/// file (a path containing a dot).
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
        || path.contains('.')
}

/// Split an `Accept-Language` header into lowercase language tags.
///
/// Quality parameters are dropped and header order is kept; q-values are
/// not used for ranking.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    header
        .split(',')
        .map(|entry| entry.split(';').next().unwrap_or("").trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Map a lowercase language tag onto the first locale (in registry order)
/// whose language prefix starts it.
pub fn match_language_tag(tag: &str) -> Option<Locale> {
    Locale::all()
        .into_iter()
        .find(|locale| tag.starts_with(locale.language()))
}

/// Pick a locale for a request that does not carry one in its path.
pub fn negotiate(req: &LocaleRequest<'_>, geo: &GeoRule) -> Locale {
    if let Some(locale) = req.cookie.and_then(|value| Locale::from_code(value).ok()) {
        return locale;
    }

    if req.country.is_some_and(|country| geo.matches(country)) {
        return geo.locale;
    }

    req.accept_language
        .and_then(|header| {
            parse_accept_language(header)
                .iter()
                .find_map(|tag| match_language_tag(tag))
        })
        .unwrap_or_else(Locale::default_locale)
}

/// Decide how to route a page request.
pub fn resolve(req: &LocaleRequest<'_>, geo: &GeoRule) -> RoutingDecision {
    if is_excluded(req.path) || path_locale(req.path).is_some() {
        return RoutingDecision::PassThrough;
    }

    let locale = negotiate(req, geo);
    let mut location = localized_path(req.path, locale);
    if let Some(query) = req.query.filter(|query| !query.is_empty()) {
        location.push('?');
        location.push_str(query);
    }

    RoutingDecision::Redirect { location, locale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(path: &str) -> LocaleRequest<'_> {
        LocaleRequest {
            path,
            ..Default::default()
        }
    }

    fn redirect_to(location: &str, locale: Locale) -> RoutingDecision {
        RoutingDecision::Redirect {
            location: location.to_string(),
            locale,
        }
    }

    // ==================== Excluded Paths ====================

    #[test]
    fn test_excluded_prefixes() {
        assert!(is_excluded("/api/contact"));
        assert!(is_excluded("/_next/static/chunk"));
        assert!(is_excluded("/images/og/og-default"));
        assert!(is_excluded("/fonts/inter"));
        assert!(is_excluded("/favicon.ico"));
        assert!(is_excluded("/sitemap.xml"));
        assert!(is_excluded("/about/cv.pdf"));
    }

    #[test]
    fn test_page_paths_not_excluded() {
        assert!(!is_excluded("/"));
        assert!(!is_excluded("/about"));
        assert!(!is_excluded("/projects/portfolio"));
    }

    #[test]
    fn test_excluded_paths_pass_through_despite_signals() {
        let req = LocaleRequest {
            path: "/api/contact",
            cookie: Some("pt-BR"),
            country: Some("BR"),
            accept_language: Some("pt-BR"),
            ..Default::default()
        };
        assert_eq!(resolve(&req, &GeoRule::default()), RoutingDecision::PassThrough);
    }

    // ==================== Locale-prefixed Paths ====================

    #[test]
    fn test_bare_locale_passes_through() {
        let geo = GeoRule::default();
        assert_eq!(resolve(&request("/en"), &geo), RoutingDecision::PassThrough);
        assert_eq!(resolve(&request("/pt-BR"), &geo), RoutingDecision::PassThrough);
    }

    #[test]
    fn test_prefixed_path_passes_through() {
        let req = LocaleRequest {
            path: "/pt-BR/projects",
            cookie: Some("en"),
            ..Default::default()
        };
        assert_eq!(resolve(&req, &GeoRule::default()), RoutingDecision::PassThrough);
    }

    #[test]
    fn test_locale_lookalike_is_redirected() {
        assert_eq!(
            resolve(&request("/english"), &GeoRule::default()),
            redirect_to("/en/english", Locale::ENGLISH)
        );
    }

    // ==================== Precedence ====================

    #[test]
    fn test_cookie_wins() {
        let req = LocaleRequest {
            path: "/projects",
            cookie: Some("pt-BR"),
            country: Some("US"),
            accept_language: Some("en-US"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&req, &GeoRule::default()),
            redirect_to("/pt-BR/projects", Locale::PORTUGUESE_BR)
        );
    }

    #[test]
    fn test_invalid_cookie_falls_through() {
        let req = LocaleRequest {
            path: "/projects",
            cookie: Some("pt-br"),
            accept_language: Some("en"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&req, &GeoRule::default()),
            redirect_to("/en/projects", Locale::ENGLISH)
        );
    }

    #[test]
    fn test_cookie_beats_geo() {
        let req = LocaleRequest {
            path: "/",
            cookie: Some("en"),
            country: Some("BR"),
            ..Default::default()
        };
        assert_eq!(resolve(&req, &GeoRule::default()), redirect_to("/en", Locale::ENGLISH));
    }

    #[test]
    fn test_geo_trigger_country() {
        let req = LocaleRequest {
            path: "/",
            country: Some("BR"),
            accept_language: Some("en-US,en;q=0.9"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&req, &GeoRule::default()),
            redirect_to("/pt-BR", Locale::PORTUGUESE_BR)
        );
    }

    #[test]
    fn test_other_country_falls_through() {
        let req = LocaleRequest {
            path: "/",
            country: Some("PT"),
            ..Default::default()
        };
        assert_eq!(resolve(&req, &GeoRule::default()), redirect_to("/en", Locale::ENGLISH));
    }

    #[test]
    fn test_accept_language_first_recognized_wins() {
        let req = LocaleRequest {
            path: "/contact",
            country: Some("US"),
            accept_language: Some("fr-FR,en;q=0.8"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&req, &GeoRule::default()),
            redirect_to("/en/contact", Locale::ENGLISH)
        );
    }

    #[test]
    fn test_accept_language_ignores_quality() {
        let req = LocaleRequest {
            path: "/about",
            accept_language: Some("pt;q=0.1, en;q=0.9"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&req, &GeoRule::default()),
            redirect_to("/pt-BR/about", Locale::PORTUGUESE_BR)
        );
    }

    #[test]
    fn test_default_when_nothing_matches() {
        let req = LocaleRequest {
            path: "/about",
            cookie: Some("de"),
            country: Some("DE"),
            accept_language: Some("de-DE, fr;q=0.5, *"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&req, &GeoRule::default()),
            redirect_to("/en/about", Locale::ENGLISH)
        );
    }

    #[test]
    fn test_custom_geo_rule() {
        let geo = GeoRule::new("PT", Locale::PORTUGUESE_BR);
        let req = LocaleRequest {
            path: "/",
            country: Some("PT"),
            ..Default::default()
        };
        assert_eq!(resolve(&req, &geo), redirect_to("/pt-BR", Locale::PORTUGUESE_BR));
    }

    // ==================== Query Strings ====================

    #[test]
    fn test_query_preserved_verbatim() {
        let req = LocaleRequest {
            path: "/contact",
            query: Some("ref=x&utm_source=Some%20Thing"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&req, &GeoRule::default()),
            redirect_to("/en/contact?ref=x&utm_source=Some%20Thing", Locale::ENGLISH)
        );
    }

    #[test]
    fn test_empty_query_dropped() {
        let req = LocaleRequest {
            path: "/",
            query: Some(""),
            ..Default::default()
        };
        assert_eq!(resolve(&req, &GeoRule::default()), redirect_to("/en", Locale::ENGLISH));
    }

    // ==================== Accept-Language Parsing ====================

    #[test]
    fn test_parse_accept_language() {
        assert_eq!(
            parse_accept_language("pt-BR,pt;q=0.9, EN-us;q=0.8 ,,"),
            vec!["pt-br", "pt", "en-us"]
        );
        assert!(parse_accept_language("").is_empty());
        assert!(parse_accept_language(" ; q=1").is_empty());
    }

    #[test]
    fn test_match_language_tag() {
        assert_eq!(match_language_tag("pt-pt"), Some(Locale::PORTUGUESE_BR));
        assert_eq!(match_language_tag("en-gb"), Some(Locale::ENGLISH));
        assert_eq!(match_language_tag("pt"), Some(Locale::PORTUGUESE_BR));
        assert_eq!(match_language_tag("es"), None);
        assert_eq!(match_language_tag("*"), None);
    }

    // ==================== Properties ====================

    proptest! {
        #[test]
        fn prop_excluded_paths_always_pass_through(
            prefix in prop::sample::select(EXCLUDED_PREFIXES.to_vec()),
            rest in "[a-z/]{0,20}",
            cookie in proptest::option::of("[a-zA-Z-]{0,6}"),
            country in proptest::option::of("[A-Z]{2}"),
        ) {
            let path = format!("{}{}", prefix, rest);
            let req = LocaleRequest {
                path: &path,
                cookie: cookie.as_deref(),
                country: country.as_deref(),
                accept_language: Some("pt-BR"),
                ..Default::default()
            };
            prop_assert_eq!(resolve(&req, &GeoRule::default()), RoutingDecision::PassThrough);
        }

        #[test]
        fn prop_dotted_paths_always_pass_through(
            stem in "/[a-z]{1,10}",
            ext in "[a-z]{1,4}",
        ) {
            let path = format!("{}.{}", stem, ext);
            prop_assert_eq!(resolve(&request(&path), &GeoRule::default()), RoutingDecision::PassThrough);
        }

        #[test]
        fn prop_resolution_is_idempotent(
            path in "/[a-zA-Z/-]{0,20}",
            query in proptest::option::of("[a-z=&]{0,10}"),
            cookie in proptest::option::of("(en|pt-BR|fr|)"),
            country in proptest::option::of("(BR|US|PT)"),
            accept in proptest::option::of("[a-zA-Z,;=.0-9 -]{0,30}"),
        ) {
            let req = LocaleRequest {
                path: &path,
                query: query.as_deref(),
                cookie: cookie.as_deref(),
                country: country.as_deref(),
                accept_language: accept.as_deref(),
            };
            let geo = GeoRule::default();
            prop_assert_eq!(resolve(&req, &geo), resolve(&req, &geo));
        }

        #[test]
        fn prop_redirects_land_on_locale_prefixed_paths(
            path in "/[a-z]{0,12}",
            accept in proptest::option::of("[a-zA-Z,;=.0-9 -]{0,30}"),
        ) {
            let req = LocaleRequest {
                path: &path,
                accept_language: accept.as_deref(),
                ..Default::default()
            };
            if let RoutingDecision::Redirect { location, locale } = resolve(&req, &GeoRule::default()) {
                prop_assert_eq!(path_locale(&location), Some(locale));
                prop_assert_eq!(resolve(&request(&location), &GeoRule::default()), RoutingDecision::PassThrough);
            }
        }
    }
}
