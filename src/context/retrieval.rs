//! HTTP client for the hosted retrieval service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{format_context, BuiltContext, ContextBuilder, ContextOptions, RetrievedMemory};

pub struct RetrievalClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
    limit: usize,
    min_similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    passages: Vec<RetrievedMemory>,
}

impl RetrievalClient {
    pub fn new(base_url: &str) -> Self {
        RetrievalClient {
            client: crate::http::shared_client().clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ContextBuilder for RetrievalClient {
    async fn build_context(
        &self,
        query: &str,
        options: &ContextOptions,
    ) -> Result<BuiltContext, String> {
        let request = RetrieveRequest {
            query,
            limit: options.limit,
            min_similarity: options.min_similarity,
            source: options.source.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/retrieve", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Retrieval request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Retrieval service returned HTTP {}", status));
        }

        let data: RetrieveResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse retrieval response: {}", e))?;

        Ok(BuiltContext {
            context_string: format_context(&data.passages),
            memories: data.passages,
        })
    }
}
