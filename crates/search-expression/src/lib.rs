//! Parser and evaluator for boolean search expressions.
//!
//! This crate turns queries such as `name:john AND NOT status:inactive` into a
//! typed syntax tree annotated with source ranges, and offers a helper that
//! filters collections with such a tree.
//!
//! # Supported Syntax
//!
//! ## Terms
//! - `key:value` - Key/value pair (no whitespace around the colon)
//! - `key:` - Key with an empty value
//! - `value` - Bare value
//! - `"a value"` - Quoted literal, may contain whitespace, `:` and parentheses
//!
//! ## Boolean Operators
//! - `AND` - Conjunction; two terms separated by whitespace are joined by an
//!   implicit AND
//! - `OR` - Disjunction
//! - `NOT` - Negation of the following term
//! - `()` - Grouping
//!
//! Operator keywords are case-insensitive. A bare value may not be exactly
//! `AND`, `OR` or `NOT`, but words like `ANDROID` or `notes` are fine.
//!
//! # Example
//!
//! ```
//! use search_expression_parser::{filter, parse, ExpressionNode, LeafNode};
//!
//! // Parse a search expression
//! let tree = parse("name:john OR name:bob").unwrap();
//! assert!(matches!(tree, ExpressionNode::Or(_)));
//!
//! // Filter items with a leaf predicate
//! let names = ["john", "alice", "bob"];
//! let result: Result<Vec<_>, String> = filter(names, &tree, |leaf, name| match leaf {
//!     LeafNode::KeyValue(node) => Ok(node.value.as_str() == *name),
//!     LeafNode::Value(node) => Err(format!("unsupported term {}", node.value.as_str())),
//! });
//! assert_eq!(result.unwrap(), vec!["john", "bob"]);
//! ```

mod ast;
mod error;
mod filter;
mod lexer;
mod parser;

pub use ast::{
    AndNode, ExpressionNode, KeyValueNode, LeafNode, LiteralValue, NotNode, OrNode, Range,
    ValueNode,
};
pub use error::{ParseError, ParseResult};
pub use filter::{filter, matches};
pub use parser::{parse, MAX_NESTING_DEPTH, MAX_TERMS};
