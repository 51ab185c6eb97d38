//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sxp CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::matcher::MatchMode;

/// sxp - Parse search expressions and filter JSON records with them
#[derive(Parser, Debug)]
#[command(name = "sxp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use (default: ~/.config/sxp/config.toml)
    #[arg(long, global = true, env = "SXP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a search expression and show its syntax tree
    #[command(alias = "p")]
    Parse {
        /// Search expression (e.g., 'name:john OR NOT status:inactive')
        query: String,
    },

    /// Filter a JSON array of records with a search expression
    #[command(alias = "f")]
    Filter {
        /// Search expression (e.g., 'status:active age:50')
        query: String,

        /// File containing a JSON array of records (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// How values are compared with record fields
        #[arg(short, long, value_enum)]
        mode: Option<MatchMode>,

        /// Compare case-sensitively
        #[arg(long, conflicts_with = "ignore_case")]
        case_sensitive: bool,

        /// Compare case-insensitively
        #[arg(long)]
        ignore_case: bool,

        /// Maximum number of records to output
        #[arg(long)]
        limit: Option<usize>,

        /// Only print the number of matching records
        #[arg(long)]
        count: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Returns the case sensitivity requested on the command line, if any.
    pub fn case_sensitivity(case_sensitive: bool, ignore_case: bool) -> Option<bool> {
        match (case_sensitive, ignore_case) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
