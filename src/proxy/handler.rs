//! Route handlers for the provider endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::time::Instant;

use super::error::{ApiError, ProxyError};
use super::server::ProxyState;
use crate::providers::Upstream;

/// Upper bound on how much of an upstream error body is logged
const ERROR_BODY_PREVIEW: usize = 500;

/// POST /api/unsplash
pub async fn unsplash_handler(
    State(state): State<ProxyState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    relay(&state.http_client, &state.providers.unsplash, body).await
}

/// POST /api/pixabay
pub async fn pixabay_handler(
    State(state): State<ProxyState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    relay(&state.http_client, &state.providers.pixabay, body).await
}

/// POST /api/runware
pub async fn runware_handler(
    State(state): State<ProxyState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    relay(&state.http_client, &state.providers.runware, body).await
}

/// Validate the client body, call `upstream`, and return its JSON with 200.
///
/// Every failure is turned into a response here; nothing propagates to axum.
pub async fn relay<U: Upstream>(
    client: &reqwest::Client,
    upstream: &U,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match forward(client, upstream, body).await {
        Ok(json) => Json(json).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn forward<U: Upstream>(
    client: &reqwest::Client,
    upstream: &U,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Value, ApiError> {
    let kind = upstream.kind();

    // A body that is not JSON is treated like one without a query
    let body = match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(provider = kind.name(), error = %rejection, "Unreadable JSON body");
            Value::Null
        }
    };

    let request = upstream.parse(&body).map_err(|e| ApiError::new(kind, e))?;
    tracing::info!("{}", upstream.summary(&request));

    let start = Instant::now();
    let outbound = upstream
        .build(client, &request)
        .map_err(|e| ApiError::new(kind, e))?;
    let response = outbound.send().await.map_err(|e| ApiError::new(kind, e))?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(ApiError::new(
            kind,
            ProxyError::UpstreamStatus {
                status,
                body: preview(&error_body),
            },
        ));
    }

    let json: Value = response.json().await.map_err(|e| ApiError::new(kind, e))?;

    tracing::info!(
        provider = kind.name(),
        status = %status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "← relayed upstream response"
    );

    Ok(json)
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}
