//! Abstract Syntax Tree (AST) for search expressions.
//!
//! Every node records the [`Range`] of the input it was parsed from, so callers
//! can highlight or re-slice the original query.

use std::mem;

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` span of character offsets into the parsed input.
///
/// Offsets count `char`s (Unicode scalar values), not bytes. The range is
/// serialized as a two-element array, e.g. `[0, 4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Range {
    /// The first character offset covered by the range.
    pub start: usize,
    /// The character offset one past the end of the range.
    pub end: usize,
}

impl Range {
    /// Creates a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the number of characters covered by the range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `other` lies entirely within this range.
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the text of `input` covered by this range.
    ///
    /// # Example
    ///
    /// ```
    /// use search_expression_parser::Range;
    ///
    /// assert_eq!(Range::new(5, 9).slice("name:john"), "john");
    /// ```
    pub fn slice(&self, input: &str) -> String {
        input.chars().skip(self.start).take(self.len()).collect()
    }
}

impl From<(usize, usize)> for Range {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<Range> for (usize, usize) {
    fn from(range: Range) -> Self {
        (range.start, range.end)
    }
}

/// A literal token: a key, a key's value, or a bare value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LiteralRepr", into = "LiteralRepr")]
pub struct LiteralValue {
    /// The span of the literal, including quotes if present.
    pub range: Range,
    /// The literal text, without surrounding quotes.
    pub content: String,
    /// For quoted literals, the span strictly inside the quotes.
    pub range_without_quotes: Option<Range>,
}

impl LiteralValue {
    /// Creates an unquoted literal.
    pub fn unquoted(range: Range, content: impl Into<String>) -> Self {
        Self {
            range,
            content: content.into(),
            range_without_quotes: None,
        }
    }

    /// Creates a literal that was enclosed in double quotes.
    pub fn quoted(range: Range, inner: Range, content: impl Into<String>) -> Self {
        Self {
            range,
            content: content.into(),
            range_without_quotes: Some(inner),
        }
    }

    /// Returns `true` if the literal was written inside double quotes.
    pub fn has_quotes(&self) -> bool {
        self.range_without_quotes.is_some()
    }

    /// Returns the literal text.
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

/// Wire shape of a literal: `hasQuotes` and `rangeWithoutQuotes` are kept
/// consistent on the way in.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiteralRepr {
    range: Range,
    content: String,
    has_quotes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range_without_quotes: Option<Range>,
}

impl TryFrom<LiteralRepr> for LiteralValue {
    type Error = String;

    fn try_from(repr: LiteralRepr) -> Result<Self, Self::Error> {
        match (repr.has_quotes, repr.range_without_quotes) {
            (true, None) => Err("quoted literal is missing rangeWithoutQuotes".to_string()),
            (false, Some(_)) => Err("unquoted literal must not have rangeWithoutQuotes".to_string()),
            (_, range_without_quotes) => Ok(Self {
                range: repr.range,
                content: repr.content,
                range_without_quotes,
            }),
        }
    }
}

impl From<LiteralValue> for LiteralRepr {
    fn from(literal: LiteralValue) -> Self {
        Self {
            range: literal.range,
            has_quotes: literal.has_quotes(),
            content: literal.content,
            range_without_quotes: literal.range_without_quotes,
        }
    }
}

/// A bare term such as `john` or `"john doe"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueNode {
    pub range: Range,
    pub value: LiteralValue,
}

/// A `key:value` pair. The value may be empty (`name:`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueNode {
    pub range: Range,
    pub key: LiteralValue,
    pub value: LiteralValue,
}

/// Conjunction of two expressions, written `a AND b` or `a b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndNode {
    pub range: Range,
    pub left_child: Box<ExpressionNode>,
    pub right_child: Box<ExpressionNode>,
}

/// Disjunction of two expressions, written `a OR b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrNode {
    pub range: Range,
    pub left_child: Box<ExpressionNode>,
    pub right_child: Box<ExpressionNode>,
}

/// Negation of an expression, written `NOT a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotNode {
    pub range: Range,
    pub child: Box<ExpressionNode>,
}

/// Represents a parsed search expression.
///
/// Serialized with a `type` tag (`"AND"`, `"OR"`, `"NOT"`, `"KEY-VALUE"`,
/// `"VALUE"`) next to the node's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExpressionNode {
    /// Logical AND of two expressions.
    #[serde(rename = "AND")]
    And(AndNode),

    /// Logical OR of two expressions.
    #[serde(rename = "OR")]
    Or(OrNode),

    /// Logical NOT of an expression.
    #[serde(rename = "NOT")]
    Not(NotNode),

    /// A `key:value` leaf.
    #[serde(rename = "KEY-VALUE")]
    KeyValue(KeyValueNode),

    /// A bare value leaf.
    #[serde(rename = "VALUE")]
    Value(ValueNode),
}

impl ExpressionNode {
    /// Creates an AND node spanning `range`.
    pub fn and(range: Range, left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::And(AndNode {
            range,
            left_child: Box::new(left),
            right_child: Box::new(right),
        })
    }

    /// Creates an OR node spanning `range`.
    pub fn or(range: Range, left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::Or(OrNode {
            range,
            left_child: Box::new(left),
            right_child: Box::new(right),
        })
    }

    /// Creates a NOT node spanning `range`.
    pub fn negate(range: Range, child: ExpressionNode) -> Self {
        ExpressionNode::Not(NotNode {
            range,
            child: Box::new(child),
        })
    }

    /// Creates a key/value leaf spanning both literals.
    pub fn key_value(key: LiteralValue, value: LiteralValue) -> Self {
        ExpressionNode::KeyValue(KeyValueNode {
            range: Range::new(key.range.start, value.range.end),
            key,
            value,
        })
    }

    /// Creates a bare value leaf spanning the literal.
    pub fn value(value: LiteralValue) -> Self {
        ExpressionNode::Value(ValueNode {
            range: value.range,
            value,
        })
    }

    /// Returns the source range of this node.
    pub fn range(&self) -> Range {
        match self {
            ExpressionNode::And(node) => node.range,
            ExpressionNode::Or(node) => node.range,
            ExpressionNode::Not(node) => node.range,
            ExpressionNode::KeyValue(node) => node.range,
            ExpressionNode::Value(node) => node.range,
        }
    }

    /// Returns this node as a leaf, if it is one.
    pub fn as_leaf(&self) -> Option<LeafNode<'_>> {
        match self {
            ExpressionNode::KeyValue(node) => Some(LeafNode::KeyValue(node)),
            ExpressionNode::Value(node) => Some(LeafNode::Value(node)),
            _ => None,
        }
    }

    /// Returns all leaves of the tree in source order.
    ///
    /// Useful for validating every key of a query up front, before any item
    /// is filtered.
    pub fn leaves(&self) -> Vec<LeafNode<'_>> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                ExpressionNode::And(AndNode {
                    left_child,
                    right_child,
                    ..
                })
                | ExpressionNode::Or(OrNode {
                    left_child,
                    right_child,
                    ..
                }) => {
                    pending.push(&**right_child);
                    pending.push(&**left_child);
                }
                ExpressionNode::Not(node) => pending.push(&*node.child),
                ExpressionNode::KeyValue(node) => leaves.push(LeafNode::KeyValue(node)),
                ExpressionNode::Value(node) => leaves.push(LeafNode::Value(node)),
            }
        }
        leaves
    }

    /// Returns the height of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            max_depth = max_depth.max(depth);
            match node {
                ExpressionNode::And(AndNode {
                    left_child,
                    right_child,
                    ..
                })
                | ExpressionNode::Or(OrNode {
                    left_child,
                    right_child,
                    ..
                }) => {
                    pending.push((&**left_child, depth + 1));
                    pending.push((&**right_child, depth + 1));
                }
                ExpressionNode::Not(node) => pending.push((&*node.child, depth + 1)),
                ExpressionNode::KeyValue(_) | ExpressionNode::Value(_) => {}
            }
        }
        max_depth
    }

    /// Moves the operator children of `node` onto `pending`, leaving empty
    /// leaves in their place.
    fn detach_children(node: &mut ExpressionNode, pending: &mut Vec<ExpressionNode>) {
        let children: [&mut ExpressionNode; 2] = match node {
            ExpressionNode::And(AndNode {
                left_child,
                right_child,
                ..
            })
            | ExpressionNode::Or(OrNode {
                left_child,
                right_child,
                ..
            }) => [&mut **left_child, &mut **right_child],
            ExpressionNode::Not(node) => {
                if node.child.as_leaf().is_none() {
                    pending.push(mem::replace(&mut *node.child, ExpressionNode::empty()));
                }
                return;
            }
            ExpressionNode::KeyValue(_) | ExpressionNode::Value(_) => return,
        };
        for child in children {
            if child.as_leaf().is_none() {
                pending.push(mem::replace(child, ExpressionNode::empty()));
            }
        }
    }

    /// A leaf that owns no heap memory, used as a placeholder while dropping.
    fn empty() -> Self {
        ExpressionNode::value(LiteralValue::unquoted(Range::default(), String::new()))
    }
}

/// Drops operator children from a work list rather than recursively, so
/// long left-deep chains do not exhaust the stack.
impl Drop for ExpressionNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        ExpressionNode::detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            ExpressionNode::detach_children(&mut node, &mut pending);
        }
    }
}

/// A borrowed leaf of the tree, as handed to filter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafNode<'a> {
    /// A `key:value` leaf.
    KeyValue(&'a KeyValueNode),
    /// A bare value leaf.
    Value(&'a ValueNode),
}

impl<'a> LeafNode<'a> {
    /// Returns the source range of the leaf.
    pub fn range(&self) -> Range {
        match self {
            LeafNode::KeyValue(node) => node.range,
            LeafNode::Value(node) => node.range,
        }
    }

    /// Returns the key literal, or `None` for bare values.
    pub fn key(&self) -> Option<&'a LiteralValue> {
        match self {
            LeafNode::KeyValue(node) => Some(&node.key),
            LeafNode::Value(_) => None,
        }
    }

    /// Returns the value literal.
    pub fn value(&self) -> &'a LiteralValue {
        match self {
            LeafNode::KeyValue(node) => &node.value,
            LeafNode::Value(node) => &node.value,
        }
    }
}
