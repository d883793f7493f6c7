//! Upstream image providers
//!
//! Each provider turns a validated client request into an outbound
//! `reqwest` request. Sending and relaying is shared in `proxy::handler`.

mod pixabay;
mod runware;
mod unsplash;

pub use pixabay::PixabayClient;
pub use runware::RunwareClient;
pub use unsplash::UnsplashClient;

use serde_json::Value;

use crate::api::InvalidRequest;
use crate::config::ProvidersConfig;
use crate::proxy::ProxyResult;

/// Results per page requested from the search providers
pub const PER_PAGE: u32 = 6;

/// Identifies a provider in logs and client-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Unsplash,
    Pixabay,
    Runware,
}

impl ProviderKind {
    /// Lowercase name used in routes and log fields
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Unsplash => "unsplash",
            ProviderKind::Pixabay => "pixabay",
            ProviderKind::Runware => "runware",
        }
    }

    /// Display name used in client-facing error messages
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Unsplash => "Unsplash",
            ProviderKind::Pixabay => "Pixabay",
            ProviderKind::Runware => "Runware",
        }
    }

    /// What the client's `query` field means for this provider
    pub fn query_noun(&self) -> &'static str {
        match self {
            ProviderKind::Runware => "prompt",
            _ => "query",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An upstream API reachable through one `/api/<name>` route
pub trait Upstream: Send + Sync {
    /// Validated form of the client body
    type Request: Send + Sync;

    fn kind(&self) -> ProviderKind;

    /// Validate the client body. Runs before any upstream call.
    fn parse(&self, body: &Value) -> Result<Self::Request, InvalidRequest>;

    /// Build the outbound request (URL, method, payload, credentials)
    fn build(
        &self,
        client: &reqwest::Client,
        request: &Self::Request,
    ) -> ProxyResult<reqwest::RequestBuilder>;

    /// One-line summary for the request log
    fn summary(&self, request: &Self::Request) -> String;
}

/// The three configured provider clients
#[derive(Debug, Clone)]
pub struct Providers {
    pub unsplash: UnsplashClient,
    pub pixabay: PixabayClient,
    pub runware: RunwareClient,
}

impl Providers {
    pub fn from_config(config: &ProvidersConfig) -> ProxyResult<Self> {
        Ok(Self {
            unsplash: UnsplashClient::new(&config.unsplash)?,
            pixabay: PixabayClient::new(&config.pixabay)?,
            runware: RunwareClient::new(&config.runware)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(ProviderKind::Unsplash.name(), "unsplash");
        assert_eq!(ProviderKind::Pixabay.label(), "Pixabay");
        assert_eq!(ProviderKind::Runware.query_noun(), "prompt");
        assert_eq!(ProviderKind::Pixabay.query_noun(), "query");
        assert_eq!(ProviderKind::Runware.to_string(), "runware");
    }

    #[test]
    fn test_providers_from_default_config() {
        let providers = Providers::from_config(&ProvidersConfig::default()).unwrap();
        assert_eq!(providers.unsplash.kind(), ProviderKind::Unsplash);
        assert_eq!(providers.pixabay.kind(), ProviderKind::Pixabay);
        assert_eq!(providers.runware.kind(), ProviderKind::Runware);
    }

    #[test]
    fn test_providers_reject_bad_url() {
        let mut config = ProvidersConfig::default();
        config.runware.url = "::not a url::".to_string();
        assert!(Providers::from_config(&config).is_err());
    }
}
