//! Output formatting utilities for the sxp CLI.
//!
//! - [`tree`] - Syntax tree rendering for `sxp parse`
//! - record formatting for `sxp filter` (JSON array or JSON lines)

mod tree;

pub use tree::format_tree;

use serde_json::Value;

/// Formats matched records: a pretty JSON array, or one compact JSON
/// document per line.
pub fn format_records(records: &[Value], json_output: bool) -> serde_json::Result<String> {
    if json_output {
        return serde_json::to_string_pretty(records);
    }

    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}
