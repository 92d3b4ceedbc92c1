//! Locale routing middleware.
//!
//! Runs ahead of every route: requests whose path lacks a locale prefix are
//! redirected to one, everything else passes through untouched.

use crate::i18n::{resolve, GeoRule, LocaleRequest, RoutingDecision, LOCALE_COOKIE};
use axum::{
    extract::{Request, State},
    http::{header, HeaderName},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

/// Where the middleware finds its geo signal and what that signal implies.
#[derive(Debug, Clone)]
pub struct LocaleRouting {
    pub geo_header: HeaderName,
    pub geo_rule: GeoRule,
}

impl LocaleRouting {
    pub fn new(geo_header: HeaderName) -> Self {
        Self {
            geo_header,
            geo_rule: GeoRule::default(),
        }
    }
}

pub async fn locale_redirect(
    State(routing): State<Arc<LocaleRouting>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let decision = {
        let headers = request.headers();
        let uri = request.uri();

        let req = LocaleRequest {
            path: uri.path(),
            query: uri.query(),
            cookie: jar.get(LOCALE_COOKIE).map(|cookie| cookie.value()),
            country: headers
                .get(&routing.geo_header)
                .and_then(|value| value.to_str().ok()),
            accept_language: headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok()),
        };
        resolve(&req, &routing.geo_rule)
    };

    match decision {
        RoutingDecision::PassThrough => next.run(request).await,
        RoutingDecision::Redirect { location, locale } => {
            debug!(
                "Redirecting {} to {} (locale {})",
                request.uri().path(),
                location,
                locale
            );
            Redirect::temporary(&location).into_response()
        }
    }
}
