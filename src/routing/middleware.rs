//! Thin axum adapter binding the pure resolver to HTTP.

use crate::i18n::Locale;
use crate::routing::negotiation::LOCALE_COOKIE;
use crate::routing::{resolve, RequestSignals, RoutingConfig, RoutingDecision};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{debug, warn};

/// Request extension carrying the locale of a qualified request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale(pub Locale);

pub async fn locale_middleware(
    State(config): State<Arc<RoutingConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.uri().path())
        .to_string();
    let accept_language = header_str(req.headers(), header::ACCEPT_LANGUAGE);
    let cookie = locale_cookie(req.headers());

    let signals = RequestSignals {
        path: &path,
        accept_language: accept_language.as_deref(),
        locale_cookie: cookie.as_deref(),
    };

    match resolve(&signals, &config) {
        RoutingDecision::Bypass => next.run(req).await,
        RoutingDecision::PassThrough { locale } => {
            let content_language = HeaderValue::from_str(locale.code()).ok();
            req.extensions_mut().insert(ResolvedLocale(locale));

            let mut response = next.run(req).await;
            if let Some(value) = content_language {
                response
                    .headers_mut()
                    .entry(header::CONTENT_LANGUAGE)
                    .or_insert(value);
            }
            response
        }
        RoutingDecision::Redirect { location, locale } => {
            debug!("Redirecting {} to {} ({})", path, location, locale);
            redirect(&location, config.locale_detection())
        }
    }
}

fn redirect(location: &str, vary: bool) -> Response {
    let Ok(value) = HeaderValue::from_str(location) else {
        warn!("Cannot redirect to {:?}: not a valid header value", location);
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut response = (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response();
    if vary {
        response.headers_mut().insert(
            header::VARY,
            HeaderValue::from_static("Accept-Language, Cookie"),
        );
    }
    response
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Extract the locale preference cookie from all `Cookie` headers.
fn locale_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == LOCALE_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_string())
}
