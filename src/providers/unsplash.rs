//! Unsplash photo search

use serde_json::Value;
use url::Url;

use super::{ProviderKind, Upstream, PER_PAGE};
use crate::api::{InvalidRequest, SearchRequest};
use crate::config::SearchProviderConfig;
use crate::proxy::{format_request_log, ProxyError, ProxyResult};

#[derive(Debug, Clone)]
pub struct UnsplashClient {
    endpoint: Url,
    api_key: Option<String>,
}

impl UnsplashClient {
    pub fn new(config: &SearchProviderConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            endpoint: Url::parse(&config.url)?,
            api_key: config.api_key.clone(),
        })
    }

    /// Search URL carrying the query, the access key, the page and the page size
    pub fn search_url(&self, request: &SearchRequest) -> ProxyResult<Url> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::NotConfigured("UNSPLASH_API"))?;

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", &request.query)
            .append_pair("client_id", api_key)
            .append_pair("page", &request.page.to_string())
            .append_pair("per_page", &PER_PAGE.to_string());
        Ok(url)
    }
}

impl Upstream for UnsplashClient {
    type Request = SearchRequest;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Unsplash
    }

    fn parse(&self, body: &Value) -> Result<SearchRequest, InvalidRequest> {
        SearchRequest::from_json(body)
    }

    fn build(
        &self,
        client: &reqwest::Client,
        request: &SearchRequest,
    ) -> ProxyResult<reqwest::RequestBuilder> {
        Ok(client.get(self.search_url(request)?))
    }

    fn summary(&self, request: &SearchRequest) -> String {
        format_request_log(self.kind(), &request.query, Some(request.page))
    }
}
