// file: src/ollama/health.rs
// description: Ollama capability probe and environment readiness report
// reference: GET /api/tags

use crate::config::Config;
use crate::error::{Result, StudyError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Capability report produced before any pipeline step runs.
#[derive(Debug, Clone)]
pub struct EnvironmentReport {
    pub service_running: bool,
    pub llm_available: bool,
    pub embed_available: bool,
}

impl EnvironmentReport {
    pub fn is_ready(&self) -> bool {
        self.service_running && self.llm_available && self.embed_available
    }
}

pub struct EnvironmentCheck {
    client: Client,
    base_url: String,
    llm_model: String,
    embed_model: String,
}

impl EnvironmentCheck {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.ollama_base_url.clone(),
            llm_model: config.llm_model.clone(),
            embed_model: config.embed_model.clone(),
        }
    }

    /// Probe the Ollama server and report which required models are
    /// installed. Never errors; unreachable service yields an all-false
    /// report.
    pub async fn verify(&self) -> EnvironmentReport {
        let installed = match self.list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!("Ollama probe failed: {}", e);
                return EnvironmentReport {
                    service_running: false,
                    llm_available: false,
                    embed_available: false,
                };
            }
        };

        debug!("Ollama reports {} installed model(s)", installed.len());

        EnvironmentReport {
            service_running: true,
            llm_available: model_installed(&installed, &self.llm_model),
            embed_available: model_installed(&installed, &self.embed_model),
        }
    }

    /// Probe and convert a not-ready report into a blocking error, so no
    /// partial work is attempted against a misconfigured environment.
    pub async fn require_ready(&self) -> Result<()> {
        let report = self.verify().await;

        if !report.service_running {
            return Err(StudyError::ServiceUnavailable(self.base_url.clone()));
        }
        if !report.llm_available {
            return Err(StudyError::ModelNotInstalled(self.llm_model.clone()));
        }
        if !report.embed_available {
            return Err(StudyError::ModelNotInstalled(self.embed_model.clone()));
        }

        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| StudyError::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StudyError::ServiceUnavailable(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| StudyError::ServiceUnavailable(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// A configured model counts as installed when any tag starts with its
/// name, so `llama3.2` matches `llama3.2:latest`.
fn model_installed(installed: &[String], model: &str) -> bool {
    installed.iter().any(|name| name.starts_with(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_ready_requires_all_three() {
        let report = EnvironmentReport {
            service_running: true,
            llm_available: true,
            embed_available: true,
        };
        assert!(report.is_ready());

        let report = EnvironmentReport {
            service_running: true,
            llm_available: true,
            embed_available: false,
        };
        assert!(!report.is_ready());
    }

    #[test]
    fn test_model_installed_matches_tag_prefix() {
        let installed = vec![
            "llama3.2:latest".to_string(),
            "nomic-embed-text:latest".to_string(),
        ];

        assert!(model_installed(&installed, "llama3.2"));
        assert!(model_installed(&installed, "nomic-embed-text"));
        assert!(!model_installed(&installed, "mistral"));
    }

    #[test]
    fn test_tags_response_deserialization() {
        let body = r#"{"models": [{"name": "llama3.2:latest", "size": 123}]}"#;
        let tags: TagsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(tags.models.len(), 1);
        assert_eq!(tags.models[0].name, "llama3.2:latest");
    }

    #[test]
    fn test_tags_response_tolerates_missing_models() {
        let tags: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(tags.models.is_empty());
    }
}
