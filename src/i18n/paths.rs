//! Locale-prefixed path helpers.

use crate::i18n::Locale;

/// Return the locale carried by the first path segment, if any.
///
/// Only an exact segment match counts: `/en` and `/en/about` carry `en`,
/// while `/english` and `/en-US` carry nothing.
pub fn path_locale(path: &str) -> Option<Locale> {
    let first = path.strip_prefix('/')?.split('/').next()?;
    Locale::from_code(first).ok()
}

/// Prefix `path` with `locale`.
///
/// The root path maps to `/<locale>` (no trailing slash); a missing leading
/// slash is added.
pub fn localized_path(path: &str, locale: Locale) -> String {
    if path.is_empty() || path == "/" {
        return format!("/{}", locale.code());
    }

    if path.starts_with('/') {
        format!("/{}{}", locale.code(), path)
    } else {
        format!("/{}/{}", locale.code(), path)
    }
}

/// Remove a leading locale segment from `path`.
///
/// Paths without a locale prefix are returned unchanged; a bare locale
/// (`/pt-BR`) becomes `/`.
pub fn strip_locale(path: &str) -> String {
    if path_locale(path).is_none() {
        return path.to_string();
    }

    let rest = path[1..].split_once('/').map(|(_, rest)| rest).unwrap_or("");
    format!("/{}", rest)
}
