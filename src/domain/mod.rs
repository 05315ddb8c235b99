pub mod agent_config;
pub mod error;
pub mod llm_config;
pub mod loop_event;
pub mod query;
pub mod schema;
pub mod sql_text;
