// file: src/ollama/embeddings.rs
// description: Ollama embeddings API client
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::error::{Result, StudyError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Client for `POST /api/embeddings`. The same model must be used for
/// fragment indexing and query encoding.
#[derive(Clone)]
pub struct OllamaEmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbeddingClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        debug!("Requesting embedding for {} chars", text.len());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudyError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StudyError::Embedding(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| StudyError::Embedding(format!("invalid response body: {}", e)))?;

        if parsed.embedding.is_empty() {
            return Err(StudyError::Embedding(
                "Ollama returned an empty embedding".to_string(),
            ));
        }

        debug!("Received embedding of dimension {}", parsed.embedding.len());
        Ok(parsed.embedding)
    }
}
