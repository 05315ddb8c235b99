use super::args::{Cli, Command, KeyAction};
use super::state::AppState;
use crate::application::use_cases::prompt_builder::PromptBuilder;
use crate::domain::error::{AppError, Result};
use crate::domain::query::{QueryAnswer, QueryResult};
use crate::infrastructure::db::seed::provision_demo_database;
use tracing::{error, info};

/// Rows printed per answer; the rest are summarised in a footer.
pub const DISPLAY_ROW_LIMIT: usize = 10;

pub const DEMO_QUESTIONS: [&str; 3] = [
    "Show me all users from the North region",
    "Calculate the total money spent by each user",
    "Show the top 3 products by total revenue with user counts",
];

pub async fn dispatch(cli: Cli) -> Result<()> {
    let state = AppState::load(cli.config.as_deref())?;

    match cli.command {
        Command::Ask { questions } => ask(&state, cli.live_schema, &questions).await,
        Command::Demo { seed } => {
            if seed {
                provision_demo_database(&state.config.database_url).await?;
            }
            let questions: Vec<String> = DEMO_QUESTIONS.iter().map(|q| q.to_string()).collect();
            ask(&state, cli.live_schema, &questions).await
        }
        Command::Seed => {
            provision_demo_database(&state.config.database_url).await?;
            println!("Demo database ready at {}", state.config.database_url);
            Ok(())
        }
        Command::Schema => {
            let config = state.effective_config(cli.live_schema).await?;
            let prompts = PromptBuilder::new(&config.schema, &config.examples, &config.rules);
            println!("{}", prompts.context());
            Ok(())
        }
        Command::Key { action } => match action {
            KeyAction::Set { name, value } => {
                state.config_service.save_api_key(&name, &value)?;
                println!("Stored key '{}'; reference it as keychain:{}", name, name);
                Ok(())
            }
            KeyAction::Delete { name } => {
                state.config_service.delete_api_key(&name)?;
                println!("Deleted key '{}'", name);
                Ok(())
            }
        },
    }
}

async fn ask(state: &AppState, live_schema: bool, questions: &[String]) -> Result<()> {
    let controller = state.controller(live_schema).await?;
    let mut failed = 0;

    for question in questions {
        println!("Question: {}", question);
        match controller.run(question).await {
            Ok(answer) => println!("{}", render_answer(&answer)),
            Err(e) => {
                failed += 1;
                error!("Question failed: {}", e);
                println!("Error: {}\n", e);
            }
        }
    }

    info!("Answered {} of {} questions", questions.len() - failed, questions.len());
    if failed > 0 {
        return Err(AppError::Internal(format!(
            "{} of {} questions could not be answered",
            failed,
            questions.len()
        )));
    }
    Ok(())
}

pub fn render_answer(answer: &QueryAnswer) -> String {
    let mut out = format!(
        "SQL: {}\nAttempts: {}\n{}",
        answer.sql,
        answer.attempts.len(),
        render_result(&answer.result)
    );
    out.push('\n');
    out
}

pub fn render_result(result: &QueryResult) -> String {
    let mut lines = vec![
        format!("Columns: {}", result.columns.join(", ")),
        format!("Rows: {}", result.row_count),
    ];

    for row in result.rows.iter().take(DISPLAY_ROW_LIMIT) {
        let cells: Vec<String> = row.iter().map(render_value).collect();
        lines.push(format!("  {}", cells.join(" | ")));
    }

    if result.row_count > DISPLAY_ROW_LIMIT {
        lines.push(format!(
            "... ({} more rows)",
            result.row_count - DISPLAY_ROW_LIMIT
        ));
    }

    lines.join("\n")
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{Attempt, ValidationResult};
    use serde_json::json;

    #[test]
    fn test_render_small_result() {
        let result = QueryResult::new(
            vec!["name".to_string(), "total".to_string()],
            vec![
                vec![json!("Alice Johnson"), json!(1379.97)],
                vec![json!("Bob Smith"), serde_json::Value::Null],
            ],
        );

        assert_eq!(
            render_result(&result),
            "Columns: name, total\nRows: 2\n  Alice Johnson | 1379.97\n  Bob Smith | NULL"
        );
    }

    #[test]
    fn test_render_truncates_long_results() {
        let rows = (1..=13).map(|n| vec![json!(n)]).collect();
        let rendered = render_result(&QueryResult::new(vec!["n".to_string()], rows));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[1], "Rows: 13");
        assert_eq!(lines.len(), 2 + DISPLAY_ROW_LIMIT + 1);
        assert_eq!(lines[11], "  10");
        assert_eq!(lines[12], "... (3 more rows)");
    }

    #[test]
    fn test_render_exact_limit_has_no_footer() {
        let rows = (1..=10).map(|n| vec![json!(n)]).collect();
        let rendered = render_result(&QueryResult::new(vec!["n".to_string()], rows));
        assert!(!rendered.contains("more rows"));
    }

    #[test]
    fn test_render_answer_header() {
        let answer = QueryAnswer {
            question: "How many users?".to_string(),
            sql: "SELECT COUNT(*) AS n FROM users;".to_string(),
            result: QueryResult::new(vec!["n".to_string()], vec![vec![json!(3)]]),
            attempts: vec![Attempt {
                index: 1,
                candidate: "SELECT COUNT(*) AS n FROM users;".to_string(),
                outcome: ValidationResult::Valid,
            }],
        };

        assert!(render_answer(&answer)
            .starts_with("SQL: SELECT COUNT(*) AS n FROM users;\nAttempts: 1\nColumns: n\nRows: 1\n  3"));
    }
}
