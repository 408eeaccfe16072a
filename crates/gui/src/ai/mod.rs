//! HTTP client for an OpenAI-compatible completion API.

pub mod worker;

use shared::{is_success_status, ChatCompletionRequest, ChatCompletionResponse, KeyCheck};

pub use worker::{ApiEvent, ApiJob, ApiWorker, Dispatch};

/// Errors from a single API call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("response did not contain a message")]
    EmptyReply,

    #[error("network worker is not running")]
    NoWorker,
}

/// Thin wrapper over a shared `reqwest::Client` bound to one base URL
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// `GET /models` with the key; any 2xx counts as a valid key.
    pub async fn check_key(&self, api_key: &str) -> Result<KeyCheck, ApiError> {
        let response = self
            .http
            .get(self.url("models"))
            .bearer_auth(api_key)
            .send()
            .await?;
        Ok(KeyCheck::from_status(response.status().as_u16()))
    }

    /// `POST /chat/completions` and return the trimmed text of the first choice.
    pub async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !is_success_status(status) {
            return Err(ApiError::Status(status));
        }

        let body: ChatCompletionResponse = response.json().await?;
        body.first_content()
            .map(str::to_string)
            .ok_or(ApiError::EmptyReply)
    }
}
