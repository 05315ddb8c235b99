use super::llm_config::CompletionConfig;
use super::schema::{default_examples, FewShotExample, SchemaDescriptor};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const DEFAULT_RULES: &str = "Rules: Use only these tables and columns. Return ONLY valid SQL.";

/// Everything one correction loop instance needs; passed in at construction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AgentConfig {
    /// Attempt budget: completions and validations per question.
    #[validate(range(min = 1, max = 10))]
    pub max_retries: u32,
    #[validate(length(min = 1))]
    pub database_url: String,
    pub query_timeout_secs: Option<u64>,
    /// Extra keywords rejected by the security stage, on top of the built-in ones.
    pub denylist: Vec<String>,
    #[validate(nested)]
    pub schema: SchemaDescriptor,
    #[validate(nested)]
    pub examples: Vec<FewShotExample>,
    pub rules: String,
    #[validate(nested)]
    pub completion: CompletionConfig,
}

pub fn default_denylist() -> Vec<String> {
    [
        "DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "TRUNCATE", "CREATE", "GRANT", "REVOKE",
        "ATTACH", "DETACH", "PRAGMA",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            database_url: "sqlite://ecommerce.db".to_string(),
            query_timeout_secs: Some(30),
            denylist: default_denylist(),
            schema: SchemaDescriptor::default(),
            examples: default_examples(),
            rules: DEFAULT_RULES.to_string(),
            completion: CompletionConfig::default(),
        }
    }
}
