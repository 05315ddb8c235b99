pub mod command;
pub mod ollama;
pub mod openai;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{CompletionConfig, CompletionProvider};
use async_trait::async_trait;
use command::CommandClient;
use ollama::OllamaClient;
use openai::OpenAiClient;
use std::time::Duration;

/// Text completion: one prompt in, one free-form response out.
///
/// Returns `AppError::ServiceUnavailable` only when the backend cannot serve the
/// request at all. Empty output is a valid response.
#[async_trait]
pub trait CompletionService {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

enum Backend {
    Ollama(OllamaClient),
    OpenAI(OpenAiClient),
    Command(CommandClient),
}

/// Picks the concrete backend named by `CompletionConfig::provider`.
pub struct CompletionRouter {
    backend: Backend,
}

impl CompletionRouter {
    /// `api_key` is the already-resolved secret, if the backend needs one.
    pub fn from_config(config: &CompletionConfig, api_key: Option<String>) -> Result<Self> {
        let backend = match config.provider {
            CompletionProvider::Ollama => Backend::Ollama(OllamaClient::new(config.clone())?),
            CompletionProvider::OpenAI => {
                Backend::OpenAI(OpenAiClient::new(config.clone(), api_key)?)
            }
            CompletionProvider::Command => Backend::Command(CommandClient::new(config.clone())?),
        };
        Ok(Self { backend })
    }
}

#[async_trait]
impl CompletionService for CompletionRouter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match &self.backend {
            Backend::Ollama(client) => client.complete(prompt).await,
            Backend::OpenAI(client) => client.complete(prompt).await,
            Backend::Command(client) => client.complete(prompt).await,
        }
    }
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}

pub(crate) fn http_client(config: &CompletionConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}
