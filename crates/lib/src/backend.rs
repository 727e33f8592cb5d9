//! Backend relay client: POST a message and context token to the
//! conversational endpoint, get back the reply text and the token to resume
//! the conversation with.
//!
//! One request per user message, no retries. The client is built once at
//! startup and reuses its connection pool for every call.

use crate::chunker::truncate_chars;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest backend error body carried into an error value.
const ERROR_BODY_MAX_CHARS: usize = 500;

/// Reply text used when the backend answers 200 with no reply field.
pub const EMPTY_RESPONSE_SENTINEL: &str = "(backend returned an empty response)";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend did not respond in time")]
    Timeout,
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result of one relay call.
#[derive(Debug, Clone)]
pub struct RelayReply {
    pub text: String,
    /// Token to pass on the next call for this conversation; may be empty.
    pub context_id: String,
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    message: &'a str,
    context_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    context_id: String,
}

/// The single relay operation; the dispatcher only sees this trait.
#[async_trait]
pub trait RelayBackend: Send + Sync {
    async fn relay(&self, message: &str, context_id: &str) -> Result<RelayReply, BackendError>;
}

/// HTTP client for the backend endpoint.
#[derive(Clone)]
pub struct BackendClient {
    url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn classify(e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout
        } else if e.is_connect() {
            BackendError::Unreachable(e.to_string())
        } else {
            BackendError::Request(e)
        }
    }
}

#[async_trait]
impl RelayBackend for BackendClient {
    async fn relay(&self, message: &str, context_id: &str) -> Result<RelayReply, BackendError> {
        let body = RelayRequest {
            message,
            context_id,
        };
        let res = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::classify)?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status,
                body: truncate_chars(&body, ERROR_BODY_MAX_CHARS).to_string(),
            });
        }
        let data: RelayResponse = res.json().await.map_err(Self::classify)?;
        let text = if data.response.is_empty() {
            EMPTY_RESPONSE_SENTINEL.to_string()
        } else {
            data.response
        };
        Ok(RelayReply {
            text,
            context_id: data.context_id,
        })
    }
}
