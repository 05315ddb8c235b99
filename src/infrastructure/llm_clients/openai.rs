use super::{endpoint, http_client, CompletionService};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::CompletionConfig;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// Client for OpenAI-compatible `/chat/completions` endpoints (OpenAI, OpenRouter,
/// LM Studio, vLLM). The prompt is sent as a single user message.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: CompletionConfig,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: http_client(&config)?,
            config,
            api_key,
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = endpoint(&self.config.base_url, "chat/completions");
        debug!("Chat completion request to {} (model={})", url, self.config.model);

        let mut request = self.client.post(&url);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
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

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::ServiceUnavailable("Invalid response format".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::CompletionProvider;

    #[test]
    fn test_request_body_sends_prompt_as_user_message() {
        let config = CompletionConfig {
            provider: CompletionProvider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            ..CompletionConfig::default()
        };
        let client = OpenAiClient::new(config, None).unwrap();
        let body = client.request_body("Fixed SQL:");

        assert_eq!(body["model"], json!("gpt-4o-mini"));
        assert_eq!(body["messages"][0]["role"], json!("user"));
        assert_eq!(body["messages"][0]["content"], json!("Fixed SQL:"));
        assert_eq!(body["messages"].as_array().map(|m| m.len()), Some(1));
    }
}
