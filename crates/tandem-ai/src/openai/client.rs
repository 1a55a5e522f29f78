//! OpenAI API client struct, request plumbing, and run polling.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::thread::Run;
use crate::AiError;

use super::config::OpenAiConfig;

const ASSISTANTS_BETA: &str = "assistants=v2";
const ERROR_BODY_LIMIT: usize = 200;

/// OpenAI Assistants API client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&self.config.api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA);
        if let Some(org) = &self.config.organization {
            request = request.header("OpenAI-Organization", org);
        }
        request
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AiError> {
        debug!(path, "OpenAI GET");
        self.send(self.request(Method::GET, path)).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, AiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(path, "OpenAI POST");
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AiError> {
        let response = request
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!(
                "HTTP {status}: {}",
                truncate_body(&text)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))
    }

    /// Re-fetch `run` until it is no longer queued, in progress or cancelling.
    pub(crate) async fn poll_run(&self, thread_id: &str, mut run: Run) -> Result<Run, AiError> {
        let deadline = Instant::now() + self.config.run_timeout;
        let path = format!("/threads/{thread_id}/runs/{}", run.id);

        while run.status.is_transient() {
            if Instant::now() >= deadline {
                return Err(AiError::Timeout);
            }
            tokio::time::sleep(self.config.poll_interval).await;
            run = self.get(&path).await?;
            debug!(run_id = %run.id, status = %run.status, "Polled run");
        }
        Ok(run)
    }
}

/// Cap error bodies so a proxy's HTML page does not flood the logs.
pub(crate) fn truncate_body(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
