use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{error, warn};
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;

use crate::api::models::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionParams, Message, UpstreamErrorBody,
};
use crate::client_trait::CompletionClientTrait;
use crate::config::Config;
use crate::error::{ClientBuildError, CompletionError};

const MAX_TOKENS_LIMIT: u32 = 500;
const RATE_LIMIT_MESSAGE: &str = "API rate limit exceeded. Please try again later.";

pub struct CompletionClient {
    client: Client,
    config: Config,
    // Caps concurrent upstream calls so a burst of requests cannot
    // trip the upstream rate limiter on its own.
    limiter: Arc<Semaphore>,
}

impl CompletionClient {
    pub fn new(config: Config) -> Result<Self, ClientBuildError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let limiter = Arc::new(Semaphore::new(config.max_concurrent_requests.max(1)));
        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    fn validate_call(
        messages: &[Message],
        params: CompletionParams,
    ) -> Result<(), CompletionError> {
        if messages.is_empty() {
            return Err(CompletionError::InvalidRequest(
                "prompt sequence is empty".to_string(),
            ));
        }
        if params.max_tokens == 0 || params.max_tokens > MAX_TOKENS_LIMIT {
            return Err(CompletionError::InvalidRequest(format!(
                "max_tokens must be in (0, {MAX_TOKENS_LIMIT}], got {}",
                params.max_tokens
            )));
        }
        if !(0.0..=1.0).contains(&params.temperature) {
            return Err(CompletionError::InvalidRequest(format!(
                "temperature must be in [0, 1], got {}",
                params.temperature
            )));
        }
        Ok(())
    }

    fn map_error_status(status: StatusCode, body: String) -> CompletionError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return CompletionError::RateLimited(RATE_LIMIT_MESSAGE.to_string());
        }
        // Carry the upstream-provided message only when the body parses.
        let message = serde_json::from_str::<UpstreamErrorBody>(&body)
            .ok()
            .and_then(|body| body.error)
            .and_then(|detail| detail.message);
        CompletionError::Upstream { message }
    }
}

#[async_trait]
impl CompletionClientTrait for CompletionClient {
    async fn complete(
        &self,
        messages: &[Message],
        params: CompletionParams,
    ) -> Result<String, CompletionError> {
        Self::validate_call(messages, params)?;

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| CompletionError::Upstream { message: None })?;

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        // api_key presence is checked at construction time.
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("upstream request failed: {e}");
                CompletionError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("upstream returned HTTP {status}");
            return Err(Self::map_error_status(status, body));
        }

        let response: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("failed to decode upstream response: {e}");
            CompletionError::Upstream { message: None }
        })?;

        // Never Ok with a missing content field.
        response.into_content().ok_or(CompletionError::EmptyResponse)
    }
}
