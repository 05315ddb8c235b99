use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProvider {
    /// Ollama HTTP API (`/api/generate`).
    Ollama,
    /// Any OpenAI-compatible `/chat/completions` endpoint.
    #[serde(rename = "openai")]
    OpenAI,
    /// A local executable invoked once per prompt.
    Command,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CompletionConfig {
    pub provider: CompletionProvider,
    #[validate(length(min = 1))]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub model: String,
    /// Literal key or a reference such as `env:NAME` / `keychain:NAME`.
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
    /// Request timeout; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Executable used by the `command` provider.
    pub command: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: CompletionProvider::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:1.5b".to_string(),
            api_key: None,
            max_tokens: Some(512),
            temperature: Some(0.0),
            timeout_secs: Some(120),
            command: Some("ollama".to_string()),
        }
    }
}
