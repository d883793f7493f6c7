//! axum middleware applying [`RateLimiter`] to `/api` traffic

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use super::{Decision, RateLimiter};

/// Plain-text body returned when a client is over its quota
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes.";

/// True for `/api` and anything below it
pub fn is_limited_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Count `/api` requests per peer IP; reject with 429 once the quota is used up.
///
/// Other paths pass through untouched.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    if !is_limited_path(req.uri().path()) {
        return next.run(req).await;
    }

    match limiter.check(peer.ip()) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limiter.max_requests()));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            tracing::warn!(
                client_ip = %peer.ip(),
                path = %req.uri().path(),
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            // Round up so clients never retry before the window resets
            let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    (header::RETRY_AFTER, HeaderValue::from(retry_secs)),
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
                ],
                RATE_LIMIT_MESSAGE,
            )
                .into_response()
        }
    }
}
