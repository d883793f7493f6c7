//! HTTP proxy server

pub mod assets;
mod error;
mod handler;
mod request_log;
pub mod server;

pub use error::{ApiError, ProxyError, ProxyResult};
pub use handler::{pixabay_handler, relay, runware_handler, unsplash_handler};
pub use request_log::format_request_log;
pub use server::{build_router, run_server, ProxyState};
