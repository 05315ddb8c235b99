pub mod args;
pub mod commands;
pub(crate) mod state;

pub use args::Cli;
pub use commands::dispatch;
pub use state::AppState;
