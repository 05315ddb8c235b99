use super::{endpoint, http_client, CompletionService};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::CompletionConfig;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

pub struct OllamaClient {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl OllamaClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&config)?,
            config,
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens,
            },
        })
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = endpoint(&self.config.base_url, "api/generate");
        debug!("Ollama request to {} (model={})", url, self.config.model);

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ServiceUnavailable(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("Failed to parse JSON: {}", e)))?;

        json["response"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AppError::ServiceUnavailable("Invalid response format".to_string()))
    }
}
