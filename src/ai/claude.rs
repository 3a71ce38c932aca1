use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::ai::types::AiError;
use crate::ai::CompletionClient;

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 2000;

pub struct ClaudeClient {
    client: reqwest::Client,
    auth_headers: header::HeaderMap,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl ClaudeClient {
    pub fn new(api_key: &str, endpoint: Option<&str>, model: Option<&str>) -> Result<Self, String> {
        let mut auth_headers = header::HeaderMap::new();
        auth_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let auth_value = header::HeaderValue::from_str(api_key)
            .map_err(|e| format!("Invalid API key format: {}", e))?;
        auth_headers.insert("x-api-key", auth_value);
        auth_headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static("2023-06-01"),
        );

        Ok(Self {
            client: crate::http::shared_client().clone(),
            auth_headers,
            endpoint: endpoint.unwrap_or(DEFAULT_ENDPOINT).to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            max_tokens: 4096,
        })
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.auth_headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| AiError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::new(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AiError::with_status(message, status.as_u16()));
        }

        let data: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::new(format!("Failed to parse response: {}", e)))?;

        data.content
            .iter()
            .find(|block| block.content_type == "text")
            .and_then(|block| block.text.clone())
            .ok_or_else(|| AiError::new("Response contained no text content"))
    }

    pub async fn generate_text(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, AiError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![RequestMessage {
                role: "user".to_string(),
                content: user_message.to_string(),
            }],
            max_tokens: self.max_tokens,
            system: if system_prompt.is_empty() {
                None
            } else {
                Some(system_prompt.to_string())
            },
        };

        let mut last_error = AiError::new("No completion attempts made");
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_ms = BASE_DELAY_MS * (1 << (attempt - 1));
                log::warn!(
                    "[CLAUDE] Retry attempt {}/{} after {}ms: {}",
                    attempt,
                    MAX_RETRIES,
                    delay_ms,
                    last_error
                );
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            }

            match self.send_once(&request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() => last_error = e,
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl CompletionClient for ClaudeClient {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, AiError> {
        self.generate_text(system_prompt, user_message).await
    }
}
