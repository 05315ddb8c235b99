use crate::domain::agent_config::AgentConfig;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::security::keyring::KeyringManager;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::Path;
use tracing::debug;
use validator::Validate;

pub const DEFAULT_CONFIG_FILE: &str = "querygate.toml";
pub const ENV_PREFIX: &str = "QUERYGATE_";
const KEYRING_SERVICE: &str = "querygate";

pub struct ConfigService {
    keyring: KeyringManager,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            keyring: KeyringManager::new(KEYRING_SERVICE),
        }
    }

    /// Defaults, then the TOML file (if present), then `QUERYGATE_*` variables.
    /// Nested keys use `__`, e.g. `QUERYGATE_COMPLETION__MODEL`.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(AgentConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(&self, path: Option<&Path>) -> Result<AgentConfig> {
        Self::extract(Self::figment(path))
    }

    pub fn extract(figment: Figment) -> Result<AgentConfig> {
        let config: AgentConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))?;

        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid configuration: {}", e)))?;

        debug!(
            "Configuration loaded (provider={:?} model={} max_retries={})",
            config.completion.provider, config.completion.model, config.max_retries
        );
        Ok(config)
    }

    /// Resolve an API key reference.
    /// Format: "env:NAME" -> reads the NAME environment variable
    /// Format: "keychain:NAME" -> reads NAME from the OS keychain
    /// Format: "plain:VALUE" -> VALUE as-is
    /// Anything else is treated as the key itself.
    pub fn resolve_api_key(&self, reference: Option<&str>) -> Result<Option<String>> {
        let reference = match reference.map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => return Ok(None),
        };

        let key = if let Some(name) = reference.strip_prefix("env:") {
            std::env::var(name).map_err(|_| {
                AppError::ConfigError(format!("Environment variable '{}' not found for API key", name))
            })?
        } else if let Some(name) = reference.strip_prefix("keychain:") {
            self.keyring.get_secret(name)?
        } else if let Some(value) = reference.strip_prefix("plain:") {
            value.to_string()
        } else {
            reference.to_string()
        };

        Ok(Some(key))
    }

    pub fn save_api_key(&self, name: &str, key: &str) -> Result<()> {
        self.keyring.set_secret(name, key)
    }

    pub fn delete_api_key(&self, name: &str) -> Result<()> {
        self.keyring.delete_secret(name)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
