//! Two-stage validation for generated SQL.
//!
//! 1. Security: whole-word, case-insensitive match against a denylist of mutating
//!    and DDL keywords. A hit rejects the candidate without touching the store.
//! 2. Syntax: the candidate must be one statement (a single trailing `;` is fine),
//!    and the store plans it without running it; any failure (more than one
//!    statement, unknown table or column, malformed SQL) rejects the candidate.
//!
//! Only a candidate that passes both stages becomes a [`ValidatedQuery`], the one
//! type the executor accepts.

use crate::domain::error::{AppError, Result};
use crate::domain::query::ValidationResult;
use crate::domain::sql_text::is_single_statement;
use crate::infrastructure::db::QueryStore;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Applied regardless of configuration.
pub const MANDATORY_DENYLIST: [&str; 7] = [
    "DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "TRUNCATE", "CREATE",
];

/// SQL that passed both validation stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    sql: String,
}

impl ValidatedQuery {
    pub fn as_str(&self) -> &str {
        &self.sql
    }

    pub fn into_string(self) -> String {
        self.sql
    }
}

struct DeniedKeyword {
    keyword: String,
    pattern: Regex,
}

pub struct SqlValidator {
    denylist: Vec<DeniedKeyword>,
    store: Arc<dyn QueryStore + Send + Sync>,
}

impl SqlValidator {
    /// `extra_keywords` are appended after the mandatory ones; duplicates are ignored.
    pub fn new(store: Arc<dyn QueryStore + Send + Sync>, extra_keywords: &[String]) -> Result<Self> {
        let mut denylist: Vec<DeniedKeyword> = Vec::new();

        let keywords = MANDATORY_DENYLIST
            .iter()
            .map(|k| k.to_string())
            .chain(extra_keywords.iter().map(|k| k.trim().to_uppercase()));

        for keyword in keywords {
            if keyword.is_empty() || denylist.iter().any(|d| d.keyword == keyword) {
                continue;
            }
            if !keyword.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(AppError::ConfigError(format!(
                    "Denylist entry '{}' must be a single SQL keyword",
                    keyword
                )));
            }
            let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&keyword)))
                .map_err(|e| AppError::ConfigError(format!("Invalid denylist entry: {}", e)))?;
            denylist.push(DeniedKeyword { keyword, pattern });
        }

        Ok(Self { denylist, store })
    }

    pub fn denied_keywords(&self) -> Vec<&str> {
        self.denylist.iter().map(|d| d.keyword.as_str()).collect()
    }

    /// Stage 1 alone. Returns the first denylisted keyword found, in denylist order.
    pub fn forbidden_keyword(&self, candidate: &str) -> Option<&str> {
        self.denylist
            .iter()
            .find(|d| d.pattern.is_match(candidate))
            .map(|d| d.keyword.as_str())
    }

    pub async fn validate(&self, candidate: &str) -> ValidationResult {
        if let Some(keyword) = self.forbidden_keyword(candidate) {
            debug!("Candidate rejected by denylist: {}", keyword);
            return ValidationResult::security(format!("{} forbidden", keyword));
        }

        if !is_single_statement(candidate) {
            debug!("Candidate holds more than one statement");
            return ValidationResult::syntax("only a single SQL statement is allowed");
        }

        match self.store.plan_check(candidate).await {
            Ok(()) => ValidationResult::Valid,
            Err(AppError::DatabaseError(message)) => ValidationResult::syntax(message),
            Err(other) => ValidationResult::syntax(other.to_string()),
        }
    }

    /// Validate once and, on success, hand back the query in executable form.
    pub async fn admit(&self, candidate: &str) -> std::result::Result<ValidatedQuery, ValidationResult> {
        match self.validate(candidate).await {
            ValidationResult::Valid => Ok(ValidatedQuery {
                sql: candidate.to_string(),
            }),
            invalid => Err(invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::FakeStore;
    use crate::domain::agent_config::default_denylist;
    use crate::domain::query::FailureKind;
    use crate::infrastructure::db::seed::TestDatabase;
    use crate::infrastructure::db::sqlite::SqliteStore;

    fn validator_with(store: Arc<FakeStore>) -> SqlValidator {
        SqlValidator::new(store, &default_denylist()).unwrap()
    }

    #[tokio::test]
    async fn test_denylisted_keywords_rejected_before_plan_check() {
        let store = Arc::new(FakeStore::new());
        let validator = validator_with(store.clone());

        for (candidate, keyword) in [
            ("DROP TABLE users;", "DROP"),
            ("delete from orders;", "DELETE"),
            ("SELECT 1; Update users SET name = 'x';", "UPDATE"),
            ("INSERT INTO users VALUES (9, 'x', 'y', 'z', 'w');", "INSERT"),
            ("ALTER TABLE users ADD COLUMN age INTEGER;", "ALTER"),
            ("TRUNCATE users;", "TRUNCATE"),
            ("create table t (id integer);", "CREATE"),
            ("ATTACH DATABASE 'other.db' AS other;", "ATTACH"),
        ] {
            let result = validator.validate(candidate).await;
            assert_eq!(
                result,
                ValidationResult::security(format!("{} forbidden", keyword)),
                "candidate: {}",
                candidate
            );
        }

        assert_eq!(store.plan_checks(), 0);
    }

    #[tokio::test]
    async fn test_security_wins_over_valid_syntax() {
        let db = TestDatabase::seeded().await;
        let store = Arc::new(SqliteStore::new(&db.url, Some(5)).unwrap());
        let validator = SqlValidator::new(store, &[]).unwrap();

        // Plans fine in SQLite, but must never get that far.
        let result = validator.validate("DELETE FROM orders WHERE order_id = 1001;").await;
        assert_eq!(result.kind(), Some(FailureKind::SecurityViolation));
        assert_eq!(result.message(), Some("DELETE forbidden"));
    }

    #[tokio::test]
    async fn test_keywords_inside_identifiers_pass() {
        let store = Arc::new(FakeStore::new());
        let validator = validator_with(store.clone());

        for candidate in [
            "SELECT updated_at FROM users;",
            "SELECT created_at, dropped_count FROM audit_log;",
            "SELECT deleted_flag FROM users WHERE inserted_by = 1;",
            "SELECT * FROM user_updates;",
        ] {
            assert_eq!(validator.validate(candidate).await, ValidationResult::Valid, "{}", candidate);
        }

        assert_eq!(store.plan_checks(), 4);
    }

    #[tokio::test]
    async fn test_first_denylist_entry_reported() {
        let validator = validator_with(Arc::new(FakeStore::new()));
        let result = validator.validate("DELETE FROM users; DROP TABLE users;").await;
        assert_eq!(result.message(), Some("DROP forbidden"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_syntax_error() {
        let db = TestDatabase::seeded().await;
        let store = Arc::new(SqliteStore::new(&db.url, Some(5)).unwrap());
        let validator = SqlValidator::new(store, &[]).unwrap();

        let result = validator.validate("SELECT * FROM nonexistent_table;").await;
        assert_eq!(result.kind(), Some(FailureKind::SyntaxError));
        assert!(result.message().unwrap_or_default().contains("nonexistent_table"));
    }

    #[tokio::test]
    async fn test_malformed_sql_is_syntax_error() {
        let db = TestDatabase::seeded().await;
        let store = Arc::new(SqliteStore::new(&db.url, Some(5)).unwrap());
        let validator = SqlValidator::new(store, &[]).unwrap();

        let result = validator.validate("SELEC name FRM users;").await;
        assert_eq!(result.kind(), Some(FailureKind::SyntaxError));
    }

    #[tokio::test]
    async fn test_multiple_statements_rejected_before_plan_check() {
        let store = Arc::new(FakeStore::new());
        let validator = validator_with(store.clone());

        let result = validator
            .validate("SELECT name FROM users; SELECT order_id, quantity FROM orders;")
            .await;
        assert_eq!(
            result,
            ValidationResult::syntax("only a single SQL statement is allowed")
        );
        assert_eq!(store.plan_checks(), 0);
    }

    #[tokio::test]
    async fn test_second_statement_never_reaches_the_database() {
        let db = TestDatabase::seeded().await;
        let store = Arc::new(SqliteStore::new(&db.url, Some(5)).unwrap());
        let validator = SqlValidator::new(store, &[]).unwrap();

        let result = validator
            .admit("SELECT name FROM users;\nSELECT * FROM nonexistent_table;")
            .await;
        assert_eq!(
            result.unwrap_err().message(),
            Some("only a single SQL statement is allowed")
        );
    }

    #[tokio::test]
    async fn test_trailing_terminator_and_comment_are_one_statement() {
        let db = TestDatabase::seeded().await;
        let store = Arc::new(SqliteStore::new(&db.url, Some(5)).unwrap());
        let validator = SqlValidator::new(store, &[]).unwrap();

        for candidate in [
            "SELECT name FROM users WHERE name = 'a;b';",
            "SELECT name FROM users; -- all users",
        ] {
            assert_eq!(validator.validate(candidate).await, ValidationResult::Valid, "{}", candidate);
        }
    }

    #[tokio::test]
    async fn test_plan_check_timeout_is_syntax_error() {
        let store = Arc::new(FakeStore::timing_out_plans());
        let validator = validator_with(store.clone());

        let result = validator.validate("SELECT * FROM users;").await;
        assert_eq!(result.kind(), Some(FailureKind::SyntaxError));
        assert_eq!(result.message(), Some("Plan check timed out after 1 seconds"));
        assert_eq!(store.plan_checks(), 1);
    }

    #[tokio::test]
    async fn test_valid_query_is_admitted() {
        let db = TestDatabase::seeded().await;
        let store = Arc::new(SqliteStore::new(&db.url, Some(5)).unwrap());
        let validator = SqlValidator::new(store, &[]).unwrap();

        let admitted = validator
            .admit("SELECT * FROM users WHERE region = 'North';")
            .await
            .unwrap();
        assert_eq!(admitted.as_str(), "SELECT * FROM users WHERE region = 'North';");
    }

    #[test]
    fn test_mandatory_keywords_always_present() {
        let validator = SqlValidator::new(Arc::new(FakeStore::new()), &["grant".to_string()]).unwrap();
        let keywords = validator.denied_keywords();
        assert_eq!(&keywords[..7], &MANDATORY_DENYLIST[..]);
        assert_eq!(keywords[7], "GRANT");
        assert_eq!(keywords.len(), 8);
    }

    #[test]
    fn test_multi_word_denylist_entry_rejected() {
        let result = SqlValidator::new(Arc::new(FakeStore::new()), &["DROP TABLE".to_string()]);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
