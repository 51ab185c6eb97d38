//! Syntax tree rendering.

use owo_colors::OwoColorize;
use search_expression_parser::{ExpressionNode, LiteralValue, Range};

/// Indentation per tree level.
const INDENT: &str = "  ";

/// Renders a parsed tree, one node per line, children indented below their
/// parent.
///
/// Operator nodes show the source text they cover; leaves show their
/// literals.
///
/// ```text
/// OR [0, 21] name:john OR name:bob
///   KEY-VALUE [0, 9] name = john
///   KEY-VALUE [13, 21] name = bob
/// ```
pub fn format_tree(tree: &ExpressionNode, query: &str, use_colors: bool) -> String {
    let mut output = String::new();
    write_node(&mut output, tree, query, 0, use_colors);
    output
}

fn write_node(
    output: &mut String,
    node: &ExpressionNode,
    query: &str,
    depth: usize,
    use_colors: bool,
) {
    let (kind, detail) = match node {
        ExpressionNode::And(_) => ("AND", node.range().slice(query)),
        ExpressionNode::Or(_) => ("OR", node.range().slice(query)),
        ExpressionNode::Not(_) => ("NOT", node.range().slice(query)),
        ExpressionNode::KeyValue(leaf) => (
            "KEY-VALUE",
            format!("{} = {}", format_literal(&leaf.key), format_literal(&leaf.value)),
        ),
        ExpressionNode::Value(leaf) => ("VALUE", format_literal(&leaf.value)),
    };

    output.push_str(&INDENT.repeat(depth));
    output.push_str(&format_kind(kind, node.as_leaf().is_some(), use_colors));
    output.push(' ');
    output.push_str(&format_range(node.range(), use_colors));
    output.push(' ');
    output.push_str(&detail);
    output.push('\n');

    match node {
        ExpressionNode::And(inner) => {
            write_node(output, &inner.left_child, query, depth + 1, use_colors);
            write_node(output, &inner.right_child, query, depth + 1, use_colors);
        }
        ExpressionNode::Or(inner) => {
            write_node(output, &inner.left_child, query, depth + 1, use_colors);
            write_node(output, &inner.right_child, query, depth + 1, use_colors);
        }
        ExpressionNode::Not(inner) => {
            write_node(output, &inner.child, query, depth + 1, use_colors);
        }
        ExpressionNode::KeyValue(_) | ExpressionNode::Value(_) => {}
    }
}

fn format_kind(kind: &str, is_leaf: bool, use_colors: bool) -> String {
    match (use_colors, is_leaf) {
        (false, _) => kind.to_string(),
        (true, true) => kind.cyan().to_string(),
        (true, false) => kind.yellow().bold().to_string(),
    }
}

fn format_range(range: Range, use_colors: bool) -> String {
    let text = format!("[{}, {}]", range.start, range.end);
    if use_colors {
        text.dimmed().to_string()
    } else {
        text
    }
}

/// Formats a literal: quoted literals keep their quotes, empty ones are
/// spelled out.
fn format_literal(literal: &LiteralValue) -> String {
    if literal.has_quotes() {
        format!("\"{}\"", literal.content)
    } else if literal.content.is_empty() {
        "(empty)".to_string()
    } else {
        literal.content.clone()
    }
}
