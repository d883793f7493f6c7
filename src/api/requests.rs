//! Guards for the JSON bodies posted by the browser client
//!
//! Bodies are inspected as raw `serde_json::Value`s so a wrong type, a
//! missing field and an empty string all surface as the same
//! [`InvalidRequest`] instead of a serde error message.

use serde_json::Value;

/// Why a client body was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    /// `query` missing, not a string, or empty
    #[error("query must be a non-empty string")]
    Query,
    /// `page` present but not a positive integer
    #[error("page must be a positive integer")]
    Page,
}

/// Body of `POST /api/unsplash` and `POST /api/pixabay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
}

impl SearchRequest {
    pub const DEFAULT_PAGE: u32 = 1;

    /// Validate a search body, defaulting `page` to 1 when absent or null
    pub fn from_json(body: &Value) -> Result<Self, InvalidRequest> {
        let query = required_query(body)?;
        let page = match body.get("page") {
            None | Some(Value::Null) => Self::DEFAULT_PAGE,
            Some(value) => value
                .as_u64()
                .filter(|p| *p >= 1)
                .and_then(|p| u32::try_from(p).ok())
                .ok_or(InvalidRequest::Page)?,
        };
        Ok(Self { query, page })
    }

    /// Validate a search body for a provider without paging; `page` is ignored
    pub fn from_json_unpaged(body: &Value) -> Result<Self, InvalidRequest> {
        Ok(Self {
            query: required_query(body)?,
            page: Self::DEFAULT_PAGE,
        })
    }
}

/// Body of `POST /api/runware`; `query` is the generation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub query: String,
}

impl GenerationRequest {
    pub fn from_json(body: &Value) -> Result<Self, InvalidRequest> {
        Ok(Self {
            query: required_query(body)?,
        })
    }
}

fn required_query(body: &Value) -> Result<String, InvalidRequest> {
    match body.get("query") {
        Some(Value::String(query)) if !query.is_empty() => Ok(query.clone()),
        _ => Err(InvalidRequest::Query),
    }
}
