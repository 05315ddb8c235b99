use crate::application::use_cases::correction_loop::CorrectionController;
use crate::domain::agent_config::AgentConfig;
use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::db::sqlite::SqliteStore;
use crate::infrastructure::llm_clients::CompletionRouter;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loaded configuration plus the services built from it.
pub struct AppState {
    pub config: AgentConfig,
    pub config_service: ConfigService,
}

impl AppState {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_service = ConfigService::new();
        let config = config_service.load(path)?;
        Ok(Self {
            config,
            config_service,
        })
    }

    pub fn store(&self) -> Result<Arc<SqliteStore>> {
        Ok(Arc::new(SqliteStore::new(
            &self.config.database_url,
            self.config.query_timeout_secs,
        )?))
    }

    /// Configuration the loop runs with, optionally using the live database schema.
    pub async fn effective_config(&self, live_schema: bool) -> Result<AgentConfig> {
        let mut config = self.config.clone();
        if live_schema {
            config.schema = self.store()?.describe_schema().await?;
            info!(
                "Using live schema with {} tables from {}",
                config.schema.tables.len(),
                config.database_url
            );
        }
        Ok(config)
    }

    pub async fn controller(&self, live_schema: bool) -> Result<CorrectionController> {
        let config = self.effective_config(live_schema).await?;
        let api_key = self
            .config_service
            .resolve_api_key(config.completion.api_key.as_deref())?;
        let completion = CompletionRouter::from_config(&config.completion, api_key)?;

        info!(
            "Completion backend: {:?} model {}",
            config.completion.provider, config.completion.model
        );
        CorrectionController::new(&config, Arc::new(completion), self.store()?)
    }
}
