use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// querygate - ask questions of a SQLite database in plain language
#[derive(Parser, Debug)]
#[command(name = "querygate")]
#[command(version)]
#[command(about = "Natural-language questions to validated, read-only SQL", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./querygate.toml, if present)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Read tables and columns from the database instead of the configured schema
    #[arg(long = "live-schema", global = true)]
    pub live_schema: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer one or more questions
    Ask {
        #[arg(required = true, value_name = "QUESTION")]
        questions: Vec<String>,
    },
    /// Run the demonstration questions against the demo database
    Demo {
        /// Recreate the demo database first
        #[arg(long = "seed")]
        seed: bool,
    },
    /// Recreate the demo database (users, products, orders)
    Seed,
    /// Print the schema context sent with every prompt
    Schema,
    /// Manage API keys stored in the OS keychain
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Store a key, referenced from config as `keychain:<NAME>`
    Set { name: String, value: String },
    Delete { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_collects_every_question() {
        let cli = Cli::try_parse_from([
            "querygate",
            "--config",
            "custom.toml",
            "ask",
            "How many users?",
            "Top products",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(!cli.live_schema);
        match cli.command {
            Command::Ask { questions } => {
                assert_eq!(questions, vec!["How many users?", "Top products"])
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_ask_requires_a_question() {
        assert!(Cli::try_parse_from(["querygate", "ask"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["querygate", "demo", "--seed", "--live-schema"]).unwrap();
        assert!(cli.live_schema);
        assert!(matches!(cli.command, Command::Demo { seed: true }));
    }
}
