use clap::Parser;
use std::io;
use std::process::ExitCode;

mod cli;
mod commands;
mod matcher;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{get_config_path, load_config, Config};
use commands::filter::FilterOptions;
use commands::{CommandContext, CommandError};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `--verbose` and `--quiet`. Records from
/// the parser library arrive through the `log` bridge.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Ignore failure: a subscriber may already be installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let config_path = get_config_path(cli.config.as_deref())?;

    // Commands that must work even when the config file is broken
    let config = match &cli.command {
        Commands::Completions { .. }
        | Commands::Config {
            command: Some(ConfigCommands::Path | ConfigCommands::Init { .. }),
        } => Config::default(),
        _ => load_config(Some(&config_path))?,
    };

    let ctx = CommandContext::from_cli(cli, &config);
    tracing::debug!(config = %config_path.display(), "dispatching {:?}", cli.command);

    match &cli.command {
        Commands::Parse { query } => commands::parse::execute(&ctx, query),
        Commands::Filter {
            query,
            input,
            mode,
            case_sensitive,
            ignore_case,
            limit,
            count,
        } => {
            let opts = FilterOptions {
                query: query.clone(),
                input: input.clone(),
                mode: *mode,
                case_sensitive: Cli::case_sensitivity(*case_sensitive, *ignore_case),
                limit: *limit,
                count: *count,
            };
            commands::filter::execute(&ctx, &opts, &config.filter)
        }
        Commands::Config { command } => match command {
            None | Some(ConfigCommands::Show) => {
                commands::config::execute_show(&ctx, &config, &config_path)
            }
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx, &config_path),
            Some(ConfigCommands::Init { force }) => {
                commands::config::execute_init(&ctx, &config_path, *force)
            }
        },
        Commands::Completions { shell } => Ok(commands::completions::execute(*shell)?),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Parse(_) => "PARSE_ERROR",
        CommandError::Match(_) => "MATCH_ERROR",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Parse(_) => ExitCode::from(1),
        CommandError::Match(_) => ExitCode::from(2),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Input(_) => ExitCode::from(4),
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Json(_) => ExitCode::from(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchError;

    #[test]
    fn test_error_codes() {
        let parse = CommandError::Parse(search_expression_parser::ParseError);
        let input = CommandError::Input("bad".to_string());
        let matching = CommandError::Match(MatchError::BareValueNotAllowed {
            value: "x".to_string(),
        });

        assert_eq!(error_code(&parse), "PARSE_ERROR");
        assert_eq!(error_code(&input), "INPUT_ERROR");
        assert_eq!(error_code(&matching), "MATCH_ERROR");
        assert_eq!(error_exit_code(&parse), ExitCode::from(1));
        assert_eq!(error_exit_code(&matching), ExitCode::from(2));
        assert_eq!(error_exit_code(&input), ExitCode::from(4));
    }

    #[test]
    fn test_config_error_exit_code() {
        let err = CommandError::Config("broken".to_string());
        assert_eq!(error_code(&err), "CONFIG_ERROR");
        assert_eq!(error_exit_code(&err), ExitCode::from(5));
    }
}
