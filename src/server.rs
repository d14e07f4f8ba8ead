//! HTTP surface: locale middleware in front of the page handler, plus the
//! routes excluded from locale routing.

use crate::i18n::{Locale, MessageBundle, MessageCatalog};
use crate::routing::{locale_middleware, ResolvedLocale, RoutingConfig};
use crate::switcher::{escape_html, options, render_select, LocaleOption};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub routing: Arc<RoutingConfig>,
    pub catalog: Arc<MessageCatalog>,
}

impl AppState {
    pub fn new(routing: RoutingConfig, catalog: MessageCatalog) -> Self {
        Self {
            routing: Arc::new(routing),
            catalog: Arc::new(catalog),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let locale_layer = middleware::from_fn_with_state(Arc::clone(&state.routing), locale_middleware);

    Router::new()
        .route("/health", get(health))
        .route("/api/locales", get(list_locales))
        .route("/:locale", get(page))
        .route("/:locale/*rest", get(page))
        // `/{locale}/` matches neither route above
        .fallback(page)
        .layer(locale_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
struct LocaleEntry {
    #[serde(flatten)]
    option: LocaleOption,
    default: bool,
}

/// The switcher's options, flagged with the default locale.
async fn list_locales(State(state): State<AppState>) -> Json<Vec<LocaleEntry>> {
    let registry = state.routing.registry();
    let default = registry.default_locale();
    let entries = options(registry)
        .into_iter()
        .map(|option| LocaleEntry {
            default: default == option.code.as_str(),
            option,
        })
        .collect();
    Json(entries)
}

/// Rendering boundary: requires a resolved locale and its message bundle.
async fn page(
    State(state): State<AppState>,
    resolved: Option<Extension<ResolvedLocale>>,
) -> Response {
    // Only qualified requests carry a resolved locale
    let Some(Extension(ResolvedLocale(locale))) = resolved else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.catalog.load(&locale).await {
        Ok(bundle) => Html(render_shell(&state, &locale, &bundle)).into_response(),
        Err(e) => {
            warn!("Refusing to render without messages: {}", e);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

fn render_shell(state: &AppState, locale: &Locale, bundle: &MessageBundle) -> String {
    let title = bundle.get("title").unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{switcher}\n</body>\n</html>\n",
        lang = escape_html(locale.code()),
        title = escape_html(title),
        switcher = render_select(state.routing.registry(), locale),
    )
}
