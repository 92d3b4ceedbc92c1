//! Crawler-facing documents: robots.txt, sitemap.xml, the web app manifest
//! and per-page link metadata.

use crate::i18n::Locale;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Site name used in titles.
pub const SITE_NAME: &str = "Rafael Alves";

/// Title used when a page has none of its own.
pub const SITE_TITLE: &str = "Rafael Alves | Tech Lead & Full Stack Developer";

/// Static pages, relative to the locale prefix.
pub const STATIC_PAGES: &[&str] = &["", "/about", "/projects", "/contact"];

/// Crawlers explicitly allowed in addition to the wildcard group.
const ALLOWED_BOTS: &[&str] = &[
    "GPTBot",
    "ChatGPT-User",
    "Google-Extended",
    "Claude-Web",
    "Anthropic-AI",
    "PerplexityBot",
    "Bytespider",
];

pub fn robots_txt(site_url: &str) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /_next/\n");

    for bot in ALLOWED_BOTS {
        out.push_str(&format!("\nUser-agent: {}\nAllow: /\n", bot));
    }

    out.push_str(&format!("\nSitemap: {}/sitemap.xml\nHost: {}\n", site_url, site_url));
    out
}

/// One `<url>` per static page and locale, each listing every locale as an
/// hreflang alternate.
pub fn sitemap_xml(site_url: &str, last_modified: DateTime<Utc>) -> String {
    let lastmod = last_modified.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let locales = Locale::all();

    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for page in STATIC_PAGES {
        let (changefreq, priority) = if page.is_empty() {
            ("weekly", "1.0")
        } else {
            ("monthly", "0.8")
        };

        for locale in &locales {
            out.push_str("  <url>\n");
            out.push_str(&format!("    <loc>{}/{}{}</loc>\n", site_url, locale, page));
            for alternate in &locales {
                out.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}/{}{}\"/>\n",
                    alternate, site_url, alternate, page
                ));
            }
            out.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
            out.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
            out.push_str(&format!("    <priority>{}</priority>\n", priority));
            out.push_str("  </url>\n");
        }
    }

    out.push_str("</urlset>\n");
    out
}

pub fn manifest() -> Value {
    json!({
        "name": "Rafael Alves - Portfolio",
        "short_name": "Rafael Alves",
        "description": "Tech Lead & Full Stack Developer Portfolio",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#f8f9fa",
        "theme_color": "#4e8098",
        "icons": [
            {
                "src": "/images/icons/icon-192x192.png",
                "sizes": "192x192",
                "type": "image/png",
                "purpose": "maskable"
            },
            {
                "src": "/images/icons/icon-512x512.png",
                "sizes": "512x512",
                "type": "image/png",
                "purpose": "any"
            }
        ]
    })
}

/// Head metadata for a localized page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub canonical: String,
    pub og_locale: &'static str,
    /// `(hreflang, href)` for every supported locale
    pub alternates: Vec<(Locale, String)>,
}

impl PageMeta {
    /// `path` is relative to the locale prefix (`""` for home).
    pub fn new(site_url: &str, locale: Locale, path: &str, title: Option<&str>) -> Self {
        let title = match title {
            Some(title) => format!("{} | {}", title, SITE_NAME),
            None => SITE_TITLE.to_string(),
        };

        let alternates = Locale::all()
            .into_iter()
            .map(|alt| (alt, format!("{}/{}{}", site_url, alt, path)))
            .collect();

        Self {
            title,
            canonical: format!("{}/{}{}", site_url, locale, path),
            og_locale: locale.og_locale(),
            alternates,
        }
    }
}
