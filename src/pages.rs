//! Localized page shells and the locale switch endpoint.
//!
//! Page bodies are rendered elsewhere; these shells only carry the document
//! language, head links and the localized navigation.

use crate::config::Config;
use crate::i18n::{localized_path, strip_locale, Locale, LOCALE_COOKIE};
use crate::seo::PageMeta;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Locale cookie lifetime: one year.
const LOCALE_COOKIE_MAX_AGE: u64 = 31_536_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Projects,
    Contact,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::About, Page::Projects, Page::Contact];

    pub fn from_slug(slug: &str) -> Option<Page> {
        Self::ALL.into_iter().find(|page| page.slug() == slug)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "",
            Page::About => "about",
            Page::Projects => "projects",
            Page::Contact => "contact",
        }
    }

    /// Path relative to the locale prefix.
    pub fn path(&self) -> String {
        match self {
            Page::Home => String::new(),
            page => format!("/{}", page.slug()),
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        let portuguese = locale == Locale::PORTUGUESE_BR;
        match self {
            Page::Home if portuguese => "Início",
            Page::Home => "Home",
            Page::About if portuguese => "Sobre",
            Page::About => "About",
            Page::Projects if portuguese => "Projetos",
            Page::Projects => "Projects",
            Page::Contact if portuguese => "Contato",
            Page::Contact => "Contact",
        }
    }
}

/// Render the HTML shell for `page` in `locale`.
pub fn render_shell(site_url: &str, locale: Locale, page: Page) -> String {
    let title = match page {
        Page::Home => None,
        page => Some(page.label(locale)),
    };
    let meta = PageMeta::new(site_url, locale, &page.path(), title);

    let mut head = format!(
        "<meta charset=\"utf-8\" />\n<title>{}</title>\n\
         <meta property=\"og:locale\" content=\"{}\" />\n\
         <link rel=\"canonical\" href=\"{}\" />\n",
        meta.title, meta.og_locale, meta.canonical
    );
    for (alternate, href) in &meta.alternates {
        head.push_str(&format!(
            "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\" />\n",
            alternate, href
        ));
    }

    let nav: String = Page::ALL
        .iter()
        .map(|item| {
            format!(
                "<li><a href=\"{}\">{}</a></li>",
                localized_path(&item.path(), locale),
                item.label(locale)
            )
        })
        .collect();

    let switch: String = Locale::all()
        .into_iter()
        .filter(|other| *other != locale)
        .map(|other| {
            format!(
                "<a href=\"/api/locale/{}?from={}\" hreflang=\"{}\">{} {}</a>",
                other,
                localized_path(&page.path(), locale),
                other,
                other.flag(),
                other.name()
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{}</head>\n<body>\n\
         <nav><ul>{}</ul>{}</nav>\n<main id=\"main\" data-page=\"{}\"></main>\n\
         </body>\n</html>\n",
        locale,
        head,
        nav,
        switch,
        page.slug()
    )
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404</h1>")).into_response()
}

/// `GET /:locale`
pub async fn home(State(config): State<Arc<Config>>, Path(locale): Path<String>) -> Response {
    match Locale::from_code(&locale) {
        Ok(locale) => Html(render_shell(&config.site_url, locale, Page::Home)).into_response(),
        Err(_) => not_found(),
    }
}

/// `GET /:locale/:page`
pub async fn page(
    State(config): State<Arc<Config>>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let page = Page::from_slug(&slug).filter(|page| *page != Page::Home);

    match (Locale::from_code(&locale), page) {
        (Ok(locale), Some(page)) => Html(render_shell(&config.site_url, locale, page)).into_response(),
        _ => not_found(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SwitchParams {
    from: Option<String>,
}

/// Target path for a switch; anything but a same-site absolute path maps to root.
fn switch_target(from: Option<&str>, locale: Locale) -> String {
    let from = from
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or("/");
    localized_path(&strip_locale(from), locale)
}

/// `GET /api/locale/:locale?from=<path>`: persist the choice and go to the
/// same page in the new locale.
pub async fn switch_locale(
    Path(locale): Path<String>,
    Query(params): Query<SwitchParams>,
) -> Response {
    let Ok(locale) = Locale::from_code(&locale) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Unsupported locale" })),
        )
            .into_response();
    };

    let target = switch_target(params.from.as_deref(), locale);
    let cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        LOCALE_COOKIE, locale, LOCALE_COOKIE_MAX_AGE
    );
    debug!("Switching locale to {} -> {}", locale, target);

    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to(&target),
    )
        .into_response()
}
