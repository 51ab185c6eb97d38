//! Command implementations for the sxp CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod filter;
pub mod parse;

use std::env;

use crate::cli::Cli;
use crate::matcher::MatchError;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The query is not a valid search expression.
    #[error("{0}")]
    Parse(#[from] search_expression_parser::ParseError),

    /// A record could not be matched against the query.
    #[error("filter error: {0}")]
    Match(#[from] MatchError),

    /// The record input is not usable.
    #[error("invalid input: {0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Colors are disabled by `--no-color`, by `output.color = false` in the
    /// config, or by a non-empty `NO_COLOR` environment variable.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !no_color_env && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_context_from_flags() {
        let cli = Cli::try_parse_from(["sxp", "--json", "--no-color", "-v", "parse", "a"]).unwrap();
        let ctx = CommandContext::from_cli(&cli, &Config::default());
        assert!(ctx.json_output);
        assert!(!ctx.use_colors);
        assert!(!ctx.quiet);
    }

    #[test]
    fn test_context_color_disabled_by_config() {
        let cli = Cli::try_parse_from(["sxp", "-q", "parse", "a"]).unwrap();
        let mut config = Config::default();
        config.output.color = Some(false);

        let ctx = CommandContext::from_cli(&cli, &config);
        assert!(!ctx.use_colors);
        assert!(ctx.quiet);
        assert!(!ctx.json_output);
    }
}
