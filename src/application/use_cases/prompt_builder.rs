//! Prompt construction for SQL generation and correction.
//!
//! Both prompt kinds start with the same schema context, rendered once at
//! construction so it stays byte-identical across attempts.

use crate::domain::schema::{FewShotExample, SchemaDescriptor};

pub struct PromptBuilder {
    context: String,
}

impl PromptBuilder {
    pub fn new(schema: &SchemaDescriptor, examples: &[FewShotExample], rules: &str) -> Self {
        Self {
            context: render_context(schema, examples, rules),
        }
    }

    /// Schema, worked examples and rules, shared by every prompt.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn initial(&self, question: &str) -> String {
        format!("{}\n\nQuestion: {}\nSQL:", self.context, question)
    }

    /// Carries only the most recent candidate and its error.
    pub fn corrective(&self, question: &str, bad_sql: &str, error: &str) -> String {
        format!(
            "{}\n\nThe SQL query below has an error. Fix it.\n\nBad SQL: {}\nError: {}\n\nQuestion: {}\nFixed SQL:",
            self.context, bad_sql, error, question
        )
    }
}

fn render_context(schema: &SchemaDescriptor, examples: &[FewShotExample], rules: &str) -> String {
    let mut context = String::from("Database Schema:\n");
    for table in &schema.tables {
        context.push_str(&format!("{}: {}\n", table.name, table.columns.join(", ")));
    }

    for (idx, example) in examples.iter().enumerate() {
        context.push_str(&format!(
            "\nExample {}:\nQuestion: {}\nSQL: {}\n",
            idx + 1,
            example.question,
            example.sql
        ));
    }

    if !rules.trim().is_empty() {
        context.push('\n');
        context.push_str(rules.trim());
    }

    context.trim_end().to_string()
}
