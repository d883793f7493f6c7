//! Static asset serving for the browser client

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::path::Path;
use tower_http::services::ServeDir;

use crate::config::AssetsConfig;

/// Router serving files from `config.dir`; `/` resolves to `index.html`.
///
/// Successful responses carry a `Cache-Control` max-age from the config, and
/// scripts and stylesheets get an explicit content type.
pub fn router(config: &AssetsConfig) -> Router {
    let cache_control = HeaderValue::from_str(&format!("public, max-age={}", config.max_age_seconds))
        .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=604800"));

    Router::new()
        .fallback_service(ServeDir::new(&config.dir))
        .layer(middleware::from_fn_with_state(cache_control, asset_headers))
}

async fn asset_headers(
    State(cache_control): State<HeaderValue>,
    req: Request,
    next: Next,
) -> Response {
    let content_type = content_type_override(req.uri().path());
    let mut response = next.run(req).await;

    let status = response.status();
    if status.is_success() || status == StatusCode::NOT_MODIFIED {
        let headers = response.headers_mut();
        headers.insert(header::CACHE_CONTROL, cache_control);
        if let Some(content_type) = content_type.filter(|_| status.is_success()) {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }

    response
}

/// Content type forced for a request path, if any
pub fn content_type_override(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("js") {
        Some("application/javascript")
    } else if ext.eq_ignore_ascii_case("css") {
        Some("text/css")
    } else {
        None
    }
}
