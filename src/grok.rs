use crate::error::CompletionError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::error;

/// Something that can answer a sanitized question.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, question: &str) -> Result<String, CompletionError>;
}

pub struct GrokClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    timeout: Duration,
}

impl GrokClient {
    pub fn new(endpoint: &str, api_key: &str, model: &str, system_prompt: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            max_tokens: 150,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Upper bound on the whole request, connect through body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_request(&self, question: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(&self.system_prompt),
                ChatMessage::user(question),
            ],
            max_tokens: self.max_tokens,
        }
    }

    async fn request(&self, question: &str) -> Result<String, CompletionError> {
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&self.build_request(question))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let raw = res.text().await?;
        let body: ChatCompletionResponse = serde_json::from_str(&raw)
            .map_err(|e| CompletionError::Unexpected(format!("malformed completion body: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| CompletionError::Unexpected("completion had no choices".to_string()))
    }
}

#[async_trait]
impl Completer for GrokClient {
    async fn complete(&self, question: &str) -> Result<String, CompletionError> {
        self.request(question).await.map_err(|e| {
            error!("{}", e);
            e
        })
    }
}
