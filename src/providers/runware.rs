//! Runware image generation

use serde_json::Value;
use url::Url;
use uuid::Uuid;

use super::{ProviderKind, Upstream};
use crate::api::{inference_payload, GenerationRequest, InvalidRequest, RunwareTask};
use crate::config::RunwareConfig;
use crate::proxy::{format_request_log, ProxyError, ProxyResult};

#[derive(Debug, Clone)]
pub struct RunwareClient {
    endpoint: Url,
    api_key: Option<String>,
    task_uuid: Option<String>,
    model: Option<String>,
}

impl RunwareClient {
    pub fn new(config: &RunwareConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            endpoint: Url::parse(&config.url)?,
            api_key: config.api_key.clone(),
            task_uuid: config.task_uuid.clone(),
            model: config.model.clone(),
        })
    }

    /// Task array for one prompt. Uses the configured task UUID if set,
    /// otherwise a fresh v4 UUID.
    pub fn payload(&self, request: &GenerationRequest) -> ProxyResult<Vec<RunwareTask>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::NotConfigured("RUNWARE_API"))?;
        let model = self
            .model
            .as_deref()
            .ok_or(ProxyError::NotConfigured("RUNWARE_MODEL"))?;
        let task_uuid = match self.task_uuid {
            Some(ref fixed) => fixed.clone(),
            None => Uuid::new_v4().to_string(),
        };

        Ok(inference_payload(api_key, &task_uuid, model, &request.query))
    }
}

impl Upstream for RunwareClient {
    type Request = GenerationRequest;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Runware
    }

    fn parse(&self, body: &Value) -> Result<GenerationRequest, InvalidRequest> {
        GenerationRequest::from_json(body)
    }

    fn build(
        &self,
        client: &reqwest::Client,
        request: &GenerationRequest,
    ) -> ProxyResult<reqwest::RequestBuilder> {
        let payload = self.payload(request)?;
        Ok(client.post(self.endpoint.clone()).json(&payload))
    }

    fn summary(&self, request: &GenerationRequest) -> String {
        format_request_log(self.kind(), &request.query, None)
    }
}
