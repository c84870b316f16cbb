// file: src/ollama/generate.rs
// description: Ollama text generation API client
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::error::{Result, StudyError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Low temperature keeps answers close to the retrieved context.
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for `POST /api/generate`. One blocking call per request: no
/// retry, no streaming.
#[derive(Clone)]
pub struct OllamaGenerateClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerateClient {
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

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };

        debug!(
            "Requesting generation from {} with a {} char prompt",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudyError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StudyError::Generation(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| StudyError::Generation(format!("invalid response body: {}", e)))?;

        Ok(parsed.response)
    }
}
