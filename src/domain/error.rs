use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    ConfigError(String),
    SecurityError(String),
    DatabaseError(String),
    IoError(String),
    /// The completion backend could not be reached at all.
    ServiceUnavailable(String),
    /// A candidate passed validation but failed when run against the store.
    ExecutionFailure { candidate: String, message: String },
    /// No candidate passed validation within the attempt budget.
    RetryExhausted {
        attempts: u32,
        last_candidate: String,
        last_error: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::SecurityError(msg) => write!(f, "Security error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::ServiceUnavailable(msg) => {
                write!(f, "Completion service unavailable: {}", msg)
            }
            AppError::ExecutionFailure { candidate, message } => {
                write!(f, "Execution failed for '{}': {}", candidate, message)
            }
            AppError::RetryExhausted {
                attempts,
                last_candidate,
                last_error,
            } => write!(
                f,
                "No valid query after {} attempts. Last candidate: '{}'. Last error: {}",
                attempts, last_candidate, last_error
            ),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
