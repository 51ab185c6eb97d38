//! Filter command implementation.
//!
//! Reads a JSON array of records and prints the records matching a search
//! expression.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use search_expression_parser::{filter, parse};
use serde_json::Value;

use super::config::FilterConfig;
use super::{CommandContext, CommandError, Result};
use crate::matcher::{MatchMode, RecordMatcher};
use crate::output::format_records;

/// Options for the filter command.
#[derive(Debug, Default)]
pub struct FilterOptions {
    /// Search expression.
    pub query: String,
    /// Input file (stdin if `None`).
    pub input: Option<PathBuf>,
    /// Match mode override.
    pub mode: Option<MatchMode>,
    /// Case sensitivity override.
    pub case_sensitive: Option<bool>,
    /// Limit results.
    pub limit: Option<usize>,
    /// Only print the count.
    pub count: bool,
}

/// Executes the filter command.
///
/// # Errors
///
/// Returns an error if the query does not parse, the input is not a JSON
/// array, or a record cannot be matched (e.g. an unknown key).
pub fn execute(ctx: &CommandContext, opts: &FilterOptions, config: &FilterConfig) -> Result<()> {
    // Parse first so a bad query fails before stdin is read
    let tree = parse(&opts.query)?;

    let content = read_input(opts.input.as_deref())?;
    let records = parse_records(&content)?;

    let options = config.match_options(opts.mode, opts.case_sensitive);
    let matcher = RecordMatcher::new(options, &records);
    tracing::debug!(records = records.len(), ?options, "filtering records");

    let mut matched = filter(records, &tree, |leaf, record| matcher.matches(leaf, record))?;
    tracing::debug!(matched = matched.len(), "filter complete");

    if let Some(limit) = opts.limit {
        matched.truncate(limit);
    }

    if opts.count {
        if ctx.json_output {
            println!("{}", serde_json::json!({ "count": matched.len() }));
        } else {
            println!("{}", matched.len());
        }
        return Ok(());
    }

    print!("{}", format_records(&matched, ctx.json_output)?);
    if ctx.json_output {
        println!();
    }

    Ok(())
}

/// Reads the input file, or stdin if no path is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CommandError::Input(format!("Failed to read {}: {}", path.display(), e))
        }),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// Parses the input as a JSON array of records.
fn parse_records(content: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| CommandError::Input(format!("Failed to parse JSON: {}", e)))?;

    match value {
        Value::Array(records) => Ok(records),
        other => Err(CommandError::Input(format!(
            "expected a JSON array of records, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_records_array() {
        let records = parse_records(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_records_rejects_object() {
        let err = parse_records(r#"{"a": 1}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: expected a JSON array of records, got an object"
        );
    }

    #[test]
    fn test_parse_records_rejects_invalid_json() {
        assert!(matches!(parse_records("[1,"), Err(CommandError::Input(_))));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "[]").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "[]");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_input(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, CommandError::Input(_)));
    }

    #[test]
    fn test_execute_rejects_bad_query_before_reading_input() {
        let ctx = CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
        };
        let opts = FilterOptions {
            query: "a AND".to_string(),
            input: Some(PathBuf::from("/nonexistent/records.json")),
            ..FilterOptions::default()
        };
        let err = execute(&ctx, &opts, &FilterConfig::default()).unwrap_err();
        assert!(matches!(err, CommandError::Parse(_)));
    }
}
