//! Candidate extraction
//!
//! Pulls a single SQL statement out of a model's free-form answer. Strategies are
//! tried in order and the first one that matches wins; when none does, the trimmed
//! response is returned unchanged and left for the validator to reject.

use crate::domain::sql_text::first_terminator;
use once_cell::sync::Lazy;
use regex::Regex;

static SQL_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```sql\b\s*(.*?)\s*```").unwrap());

static LEADING_KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSELECT\b").unwrap());

/// A pure function from response text to a candidate, or `None` when it does not apply.
pub type ExtractionStrategy = fn(&str) -> Option<String>;

/// Inner content of the first ```sql fenced block, trimmed.
pub fn fenced_block(text: &str) -> Option<String> {
    SQL_FENCE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Text from the first SELECT up to and including the first terminating `;` after it
/// (one inside a quoted literal does not count), or to the end of the text. Always
/// ends with `;`.
pub fn leading_keyword(text: &str) -> Option<String> {
    let start = LEADING_KEYWORD_PATTERN.find(text)?.start();
    let rest = &text[start..];
    let statement = match first_terminator(rest) {
        Some(end) => &rest[..=end],
        None => rest,
    };

    let mut query = statement.trim().to_string();
    if !query.ends_with(';') {
        query.push(';');
    }
    Some(query)
}

pub struct CandidateExtractor {
    strategies: Vec<ExtractionStrategy>,
}

impl CandidateExtractor {
    pub fn new(strategies: Vec<ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    pub fn extract(&self, response: &str) -> String {
        self.strategies
            .iter()
            .find_map(|strategy| strategy(response))
            .unwrap_or_else(|| response.trim().to_string())
    }
}

impl Default for CandidateExtractor {
    fn default() -> Self {
        Self::new(vec![fenced_block, leading_keyword])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> String {
        CandidateExtractor::default().extract(text)
    }

    #[test]
    fn test_fenced_block_wins() {
        let text = "Sure! Here is the query:\n```sql\nSELECT * FROM users WHERE region = 'North';\n```\nSELECT 1;";
        assert_eq!(extract(text), "SELECT * FROM users WHERE region = 'North';");
    }

    #[test]
    fn test_fence_tag_is_case_insensitive_and_verbatim() {
        let text = "```SQL\n  select name\n  from users\n```";
        assert_eq!(extract(text), "select name\n  from users");
    }

    #[test]
    fn test_keyword_cut_at_terminator() {
        let text = "The answer is SELECT name FROM users; this returns every name.";
        assert_eq!(extract(text), "SELECT name FROM users;");
    }

    #[test]
    fn test_keyword_ignores_semicolon_in_literal() {
        let text = "Try SELECT * FROM users WHERE name = 'a;b'; it filters by name.";
        assert_eq!(extract(text), "SELECT * FROM users WHERE name = 'a;b';");
    }

    #[test]
    fn test_keyword_appends_terminator() {
        let text = "Query: select count(*) from orders";
        assert_eq!(extract(text), "select count(*) from orders;");
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        assert_eq!(leading_keyword("the selected rows"), None);
        assert_eq!(extract("  the selected rows  "), "the selected rows");
    }

    #[test]
    fn test_fallback_returns_trimmed_text() {
        assert_eq!(extract("   I cannot answer that.\n"), "I cannot answer that.");
        assert_eq!(extract("   "), "");
    }

    #[test]
    fn test_extract_is_idempotent_on_clean_queries() {
        for query in [
            "SELECT * FROM users WHERE region = 'North';",
            "SELECT p.product_name, SUM(o.quantity) as total_sold FROM products p JOIN orders o ON p.product_id = o.product_id GROUP BY p.product_id, p.product_name;",
            "select 1;",
        ] {
            let once = extract(query);
            assert_eq!(once, query);
            assert_eq!(extract(&once), once);
        }
    }

    #[test]
    fn test_extract_output_is_stable() {
        for text in [
            "Here you go: SELECT name FROM users",
            "```sql\nSELECT 1;\n```",
            "DROP TABLE users;",
        ] {
            let once = extract(text);
            assert_eq!(extract(&once), once, "input: {:?}", text);
        }
    }

    #[test]
    fn test_custom_strategy_order() {
        let extractor = CandidateExtractor::new(vec![leading_keyword]);
        let text = "```sql\nSELECT 2;\n```";
        assert_eq!(extractor.extract(text), "SELECT 2;");
    }
}
