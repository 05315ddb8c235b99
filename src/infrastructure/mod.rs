#[path = "config/mod.rs"]
pub mod config_mod;
pub use config_mod as config;
pub mod db;
pub mod llm_clients;
pub mod response;
pub mod security;
