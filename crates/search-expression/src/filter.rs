//! Evaluation of parsed search expressions against arbitrary items.
//!
//! The tree walker only knows how to combine results: AND, OR and NOT are
//! handled here, while the meaning of each leaf (`name:john`, `john`) is
//! supplied by the caller as a predicate.
//!
//! # Example
//!
//! ```
//! use search_expression_parser::{filter, parse, LeafNode};
//!
//! let tree = parse("num:2 OR num:4").unwrap();
//!
//! let matched = filter(vec![1, 2, 3, 4], &tree, |leaf, item: &i32| match leaf {
//!     LeafNode::KeyValue(node) if node.key.as_str() == "num" => {
//!         Ok(node.value.as_str() == item.to_string())
//!     }
//!     _ => Err("only num:<value> is supported"),
//! });
//!
//! assert_eq!(matched, Ok(vec![2, 4]));
//! ```

use super::ast::{ExpressionNode, LeafNode};

/// Returns the items for which `tree` matches, in their original order.
///
/// `predicate` is called for the leaves the evaluation reaches: `Ok(true)`
/// means the leaf matches the item, `Ok(false)` that it does not. AND and OR
/// short-circuit, so a predicate is not invoked for the right operand once the
/// left operand decides the result.
///
/// # Errors
///
/// The first error returned by `predicate` aborts the whole call and is
/// returned unchanged. Items matched before the failure are discarded.
pub fn filter<I, T, E, F>(items: I, tree: &ExpressionNode, mut predicate: F) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = T>,
    F: FnMut(LeafNode<'_>, &T) -> Result<bool, E>,
{
    let mut matched = Vec::new();
    for item in items {
        if evaluate(tree, &item, &mut predicate)? {
            matched.push(item);
        }
    }
    Ok(matched)
}

/// Evaluates `tree` against a single item.
///
/// # Errors
///
/// Returns the first error produced by `predicate`.
pub fn matches<T, E, F>(tree: &ExpressionNode, item: &T, mut predicate: F) -> Result<bool, E>
where
    F: FnMut(LeafNode<'_>, &T) -> Result<bool, E>,
{
    evaluate(tree, item, &mut predicate)
}

fn evaluate<T, E, F>(node: &ExpressionNode, item: &T, predicate: &mut F) -> Result<bool, E>
where
    F: FnMut(LeafNode<'_>, &T) -> Result<bool, E>,
{
    match node {
        ExpressionNode::And(node) => {
            // Short-circuit: a non-matching left side decides the result
            if !evaluate(&node.left_child, item, predicate)? {
                return Ok(false);
            }
            evaluate(&node.right_child, item, predicate)
        }
        ExpressionNode::Or(node) => {
            if evaluate(&node.left_child, item, predicate)? {
                return Ok(true);
            }
            evaluate(&node.right_child, item, predicate)
        }
        ExpressionNode::Not(node) => Ok(!evaluate(&node.child, item, predicate)?),
        ExpressionNode::KeyValue(node) => predicate(LeafNode::KeyValue(node), item),
        ExpressionNode::Value(node) => predicate(LeafNode::Value(node), item),
    }
}
