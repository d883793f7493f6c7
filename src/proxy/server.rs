//! Main proxy server implementation

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::assets;
use super::handler::{pixabay_handler, runware_handler, unsplash_handler};
use crate::config::AppConfig;
use crate::limiter::{rate_limit, RateLimiter};
use crate::providers::Providers;

/// Largest JSON body accepted on the API routes
const JSON_BODY_LIMIT: usize = 100 * 1024;

/// Shared state for the proxy
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<AppConfig>,
    pub http_client: reqwest::Client,
    pub providers: Arc<Providers>,
    pub limiter: Arc<RateLimiter>,
}

impl ProxyState {
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = build_http_client(&config)?;
        let providers = Providers::from_config(&config.providers)?;
        let limiter = RateLimiter::from_config(&config.rate_limit);

        Ok(Self {
            config: Arc::new(config),
            http_client,
            providers: Arc::new(providers),
            limiter: Arc::new(limiter),
        })
    }
}

/// Build the HTTP client used for all provider calls
fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.upstream.connect_timeout_seconds))
        .pool_max_idle_per_host(10)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Build the full application router.
///
/// Layers, outermost first: tracing, CORS, compression, the `/api` rate
/// limiter, then the API routes with static assets as the fallback.
pub fn build_router(state: ProxyState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/unsplash", post(unsplash_handler))
        .route("/api/pixabay", post(pixabay_handler))
        .route("/api/runware", post(runware_handler))
        .fallback_service(assets::router(&state.config.assets))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .with_state(state.clone());

    if state.config.rate_limit.enabled {
        app = app.layer(from_fn_with_state(state.limiter.clone(), rate_limit));
    }

    app.layer(CompressionLayer::new())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Run the proxy server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    for provider in config.unconfigured_providers() {
        tracing::warn!(provider, "Provider is missing credentials; its route will return errors");
    }

    let state = ProxyState::new(config)?;
    let static_dir = state.config.assets.dir.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("image-proxy listening on {}", addr);
    tracing::info!("Serving static assets from {}", static_dir);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}
