//! HTTP router and shared application state.

use crate::config::Config;
use crate::contact::{self, ContactService};
use crate::middleware::{locale_redirect, LocaleRouting};
use crate::{pages, seo};
use anyhow::{Context, Result};
use axum::{
    extract::{FromRef, State},
    http::{header, HeaderName, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub contact: Arc<ContactService>,
    pub routing: Arc<LocaleRouting>,
}

impl AppState {
    pub fn new(config: Config, contact: ContactService) -> Result<Self> {
        let geo_header = HeaderName::try_from(config.geo_country_header.as_str())
            .context("GEO_COUNTRY_HEADER is not a valid header name")?;

        Ok(Self {
            config: Arc::new(config),
            contact: Arc::new(contact),
            routing: Arc::new(LocaleRouting::new(geo_header)),
        })
    }

    /// Build state from configuration, constructing the email client if a
    /// credential is present.
    pub fn from_config(config: Config) -> Result<Self> {
        let contact = ContactService::from_config(&config)?;
        Self::new(config, contact)
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<ContactService> {
    fn from_ref(state: &AppState) -> Self {
        state.contact.clone()
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn robots(State(config): State<Arc<Config>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        seo::robots_txt(&config.site_url),
    )
}

async fn sitemap(State(config): State<Arc<Config>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        seo::sitemap_xml(&config.site_url, chrono::Utc::now()),
    )
}

async fn manifest() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        seo::manifest().to_string(),
    )
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Create the router with every route behind the locale middleware.
pub fn create_router(state: AppState) -> Router {
    let routing = state.routing.clone();

    Router::new()
        // API
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/locale/:locale", get(pages::switch_locale))
        .route("/api/health", get(health))
        // Crawler surfaces
        .route("/robots.txt", get(robots))
        .route("/sitemap.xml", get(sitemap))
        .route("/manifest.json", get(manifest))
        // Pages
        .route("/:locale", get(pages::home))
        .route("/:locale/:page", get(pages::page))
        .fallback(not_found)
        .with_state(state)
        .layer(from_fn_with_state(routing, locale_redirect))
        .layer(TraceLayer::new_for_http())
}
