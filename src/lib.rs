//! image-proxy: HTTP proxy for image search and generation APIs
//!
//! Features:
//! - Unsplash and Pixabay search proxying with server-side API keys
//! - Runware image generation proxying
//! - Per-IP rate limiting on `/api`
//! - Static asset serving for the browser client

pub mod api;
pub mod config;
pub mod limiter;
pub mod providers;
pub mod proxy;

pub use config::AppConfig;
pub use limiter::RateLimiter;
pub use proxy::{build_router, run_server, ProxyState};
