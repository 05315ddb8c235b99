use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    SecurityViolation,
    SyntaxError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::SecurityViolation => write!(f, "Security Error"),
            FailureKind::SyntaxError => write!(f, "SQL Syntax Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    Valid,
    Invalid { kind: FailureKind, message: String },
}

impl ValidationResult {
    pub fn security(message: impl Into<String>) -> Self {
        Self::Invalid {
            kind: FailureKind::SecurityViolation,
            message: message.into(),
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Invalid {
            kind: FailureKind::SyntaxError,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Valid => None,
            Self::Invalid { kind, .. } => Some(*kind),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { message, .. } => Some(message),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid { kind, message } => write!(f, "{}: {}", kind, message),
        }
    }
}

/// One generate/validate cycle. `index` runs from 1 to the attempt budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub index: u32,
    pub candidate: String,
    pub outcome: ValidationResult,
}

/// Rows are kept in store order; each row is a tuple aligned with `columns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self {
            columns,
            row_count: rows.len(),
            rows,
        }
    }

    /// Value of `column` in every row, in row order.
    pub fn column_values(&self, column: &str) -> Vec<&serde_json::Value> {
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => self.rows.iter().filter_map(|row| row.get(idx)).collect(),
            None => Vec::new(),
        }
    }
}

/// Successful outcome of one question: the executed query, its rows and the attempt trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub question: String,
    pub sql: String,
    pub result: QueryResult,
    pub attempts: Vec<Attempt>,
}
