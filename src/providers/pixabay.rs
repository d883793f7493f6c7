//! Pixabay photo search

use serde_json::Value;
use url::Url;

use super::{ProviderKind, Upstream, PER_PAGE};
use crate::api::{InvalidRequest, SearchRequest};
use crate::config::SearchProviderConfig;
use crate::proxy::{format_request_log, ProxyError, ProxyResult};

#[derive(Debug, Clone)]
pub struct PixabayClient {
    endpoint: Url,
    api_key: Option<String>,
}

impl PixabayClient {
    pub fn new(config: &SearchProviderConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            endpoint: Url::parse(&config.url)?,
            api_key: config.api_key.clone(),
        })
    }

    /// Search URL restricted to photos, always the first page
    pub fn search_url(&self, request: &SearchRequest) -> ProxyResult<Url> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::NotConfigured("PIXABAY_API"))?;

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", api_key)
            .append_pair("q", &request.query)
            .append_pair("image_type", "photo")
            .append_pair("per_page", &PER_PAGE.to_string());
        Ok(url)
    }
}

impl Upstream for PixabayClient {
    type Request = SearchRequest;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Pixabay
    }

    fn parse(&self, body: &Value) -> Result<SearchRequest, InvalidRequest> {
        SearchRequest::from_json_unpaged(body)
    }

    fn build(
        &self,
        client: &reqwest::Client,
        request: &SearchRequest,
    ) -> ProxyResult<reqwest::RequestBuilder> {
        Ok(client.get(self.search_url(request)?))
    }

    fn summary(&self, request: &SearchRequest) -> String {
        format_request_log(self.kind(), &request.query, None)
    }
}
