use super::sql_validator::ValidatedQuery;
use crate::domain::error::{AppError, Result};
use crate::domain::query::QueryResult;
use crate::infrastructure::db::QueryStore;
use std::sync::Arc;
use tracing::{error, info};

/// Runs validated queries. Failures are reported, never retried here.
pub struct QueryExecutor {
    store: Arc<dyn QueryStore + Send + Sync>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn QueryStore + Send + Sync>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, query: &ValidatedQuery) -> Result<QueryResult> {
        match self.store.run(query.as_str()).await {
            Ok(result) => {
                info!(
                    "Query returned {} rows across {} columns",
                    result.row_count,
                    result.columns.len()
                );
                Ok(result)
            }
            Err(e) => {
                let message = match e {
                    AppError::DatabaseError(message) => message,
                    other => other.to_string(),
                };
                error!("Runtime error during execution: {}", message);
                Err(AppError::ExecutionFailure {
                    candidate: query.as_str().to_string(),
                    message,
                })
            }
        }
    }
}
