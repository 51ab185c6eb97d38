//! Parse command implementation.
//!
//! Parses a search expression and prints its syntax tree.

use search_expression_parser::parse;

use super::{CommandContext, Result};
use crate::output::format_tree;

/// Executes the parse command.
///
/// # Errors
///
/// Returns an error if the query is not a valid search expression.
pub fn execute(ctx: &CommandContext, query: &str) -> Result<()> {
    let tree = parse(query)?;
    tracing::debug!(
        depth = tree.depth(),
        leaves = tree.leaves().len(),
        "parsed search expression"
    );

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else if !ctx.quiet {
        print!("{}", format_tree(&tree, query, ctx.use_colors));
    }

    Ok(())
}
