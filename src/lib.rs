pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::run;
pub use application::{CorrectionController, EventSink, RecordingEventSink};
pub use domain::agent_config::AgentConfig;
pub use domain::error::{AppError, Result};
pub use domain::query::{QueryAnswer, QueryResult, ValidationResult};
pub use infrastructure::db::sqlite::SqliteStore;
pub use infrastructure::db::QueryStore;
pub use infrastructure::llm_clients::{CompletionRouter, CompletionService};
