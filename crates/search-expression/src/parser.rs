//! Recursive descent parser for search expressions.

use super::ast::{ExpressionNode, Range};
use super::error::{ParseError, ParseResult};
use super::lexer::{Keyword, Lexer};

/// Maximum number of nested parentheses accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Maximum number of terms (key/value pairs and bare values) in one query.
///
/// Bounds the height of the tree, which evaluation and serialization walk
/// recursively.
pub const MAX_TERMS: usize = 1024;

/// Parses a search expression into an [`ExpressionNode`].
///
/// # Grammar
///
/// ```text
/// expression ::= ws* or_expr ws*
/// or_expr    ::= and_expr (ws+ "OR" ws+ and_expr)*
/// and_expr   ::= not_expr ((ws+ "AND" ws+ | ws+) not_expr)*
/// not_expr   ::= "NOT" ws+ single | single
/// single     ::= "(" ws* expression ws* ")" | key ":" value | bare_value
/// key        ::= quoted | unquoted
/// value      ::= quoted | unquoted?
/// bare_value ::= unquoted_not_keyword | quoted
/// ```
///
/// Keywords are ASCII case-insensitive. Two terms separated only by
/// whitespace are joined by an implicit AND. Whitespace means ASCII space and
/// the control characters below it. Unquoted literals are runs of anything
/// except `"`, `(`, `)`, `:` and whitespace.
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `NOT` - unary
/// 2. `AND` (explicit or implicit) - binary, left-associative
/// 3. `OR` - binary, left-associative
///
/// # Errors
///
/// Returns [`ParseError`] if the input is empty, an operator is missing an
/// operand, parentheses are unbalanced or empty, a quote is unterminated, or
/// parentheses nest deeper than [`MAX_NESTING_DEPTH`], or the query has more
/// than [`MAX_TERMS`] terms.
///
/// # Example
///
/// ```
/// use search_expression_parser::{parse, ExpressionNode, Range};
///
/// let tree = parse("name:john OR name:bob").unwrap();
/// assert!(matches!(tree, ExpressionNode::Or(_)));
/// assert_eq!(tree.range(), Range::new(0, 21));
///
/// assert!(parse("name:john AND").is_err());
/// ```
pub fn parse(query: &str) -> ParseResult<ExpressionNode> {
    let mut parser = Parser::new(query);

    let tree = parser.parse_expression();
    if parser.terms > MAX_TERMS {
        log::debug!("search expression rejected: more than {MAX_TERMS} terms");
        return Err(ParseError);
    }

    let Some(tree) = tree else {
        log::debug!(
            "search expression rejected: no expression at offset {}",
            parser.lexer.position()
        );
        return Err(ParseError);
    };

    // Check that we consumed all input
    if !parser.lexer.is_at_end() {
        log::debug!(
            "search expression rejected: unexpected input at offset {}",
            parser.lexer.position()
        );
        return Err(ParseError);
    }

    log::trace!("parsed search expression {query:?} into {tree:?}");
    Ok(tree)
}

/// Each `parse_*` method either returns a node and leaves the lexer after it,
/// or returns `None`. Callers trying alternatives rewind the lexer themselves.
struct Parser {
    lexer: Lexer,
    /// Current parenthesis nesting depth.
    depth: usize,
    /// Number of leaves built so far.
    terms: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            depth: 0,
            terms: 0,
        }
    }

    /// Parses `ws* or_expr ws*`.
    fn parse_expression(&mut self) -> Option<ExpressionNode> {
        self.lexer.skip_whitespace();
        let tree = self.parse_or_expr()?;
        self.lexer.skip_whitespace();
        Some(tree)
    }

    /// Parses OR expressions: `and_expr (ws+ "OR" ws+ and_expr)*`
    fn parse_or_expr(&mut self) -> Option<ExpressionNode> {
        let start = self.lexer.position();
        let mut left = self.parse_and_expr()?;

        loop {
            let checkpoint = self.lexer.position();
            let Some(right) = self.parse_operator(Keyword::Or, Self::parse_and_expr) else {
                self.lexer.reset(checkpoint);
                break;
            };
            left = ExpressionNode::or(self.range_from(start), left, right);
        }

        Some(left)
    }

    /// Parses AND expressions: `not_expr ((ws+ "AND" ws+ | ws+) not_expr)*`
    ///
    /// The explicit form is tried first, so `a AND b` never reads `AND` as
    /// the start of an implicitly joined term.
    fn parse_and_expr(&mut self) -> Option<ExpressionNode> {
        let start = self.lexer.position();
        let mut left = self.parse_not_expr()?;

        loop {
            let checkpoint = self.lexer.position();
            let right = match self.parse_operator(Keyword::And, Self::parse_not_expr) {
                Some(right) => right,
                None => {
                    self.lexer.reset(checkpoint);
                    match self.parse_implicit_and_operand() {
                        Some(right) => right,
                        None => {
                            self.lexer.reset(checkpoint);
                            break;
                        }
                    }
                }
            };
            left = ExpressionNode::and(self.range_from(start), left, right);
        }

        Some(left)
    }

    /// Parses `ws+ not_expr`, the right operand of an implicit AND.
    fn parse_implicit_and_operand(&mut self) -> Option<ExpressionNode> {
        if !self.lexer.eat_whitespace() {
            return None;
        }
        self.parse_not_expr()
    }

    /// Parses `ws+ keyword ws+ operand`, the right half of a binary operator.
    fn parse_operator(
        &mut self,
        keyword: Keyword,
        operand: fn(&mut Self) -> Option<ExpressionNode>,
    ) -> Option<ExpressionNode> {
        if !(self.lexer.eat_whitespace()
            && self.lexer.eat_keyword(keyword)
            && self.lexer.eat_whitespace())
        {
            return None;
        }
        operand(self)
    }

    /// Parses NOT expressions: `"NOT" ws+ single | single`
    ///
    /// NOT applies to a single term, so `NOT NOT a` is rejected; use
    /// `NOT (NOT a)` instead.
    fn parse_not_expr(&mut self) -> Option<ExpressionNode> {
        let start = self.lexer.position();

        if self.lexer.eat_keyword(Keyword::Not) && self.lexer.eat_whitespace() {
            if let Some(child) = self.parse_single_expr() {
                return Some(ExpressionNode::negate(self.range_from(start), child));
            }
        }

        self.lexer.reset(start);
        self.parse_single_expr()
    }

    /// Parses a parenthesized expression, a key/value pair or a bare value.
    fn parse_single_expr(&mut self) -> Option<ExpressionNode> {
        if self.lexer.eat('(') {
            return self.parse_parenthesized();
        }

        let start = self.lexer.position();
        if let Some(pair) = self.parse_key_value() {
            return self.count_term(pair);
        }
        self.lexer.reset(start);

        let value = self
            .lexer
            .read_unreserved_literal()
            .or_else(|| self.lexer.read_quoted_literal())?;
        self.count_term(ExpressionNode::value(value))
    }

    /// Counts a newly built leaf, failing once there are more than
    /// [`MAX_TERMS`].
    fn count_term(&mut self, leaf: ExpressionNode) -> Option<ExpressionNode> {
        self.terms += 1;
        (self.terms <= MAX_TERMS).then_some(leaf)
    }

    /// Parses the rest of `"(" ws* expression ws* ")"` after the opening
    /// parenthesis. The inner node is returned as is; its range does not
    /// include the parentheses.
    fn parse_parenthesized(&mut self) -> Option<ExpressionNode> {
        if self.depth >= MAX_NESTING_DEPTH {
            return None;
        }

        self.depth += 1;
        let inner = self.parse_expression();
        self.depth -= 1;

        let inner = inner?;
        self.lexer.eat(')').then_some(inner)
    }

    /// Parses `key ":" value` with no whitespace around the colon.
    ///
    /// The value may be empty, so `name:` is a complete pair.
    fn parse_key_value(&mut self) -> Option<ExpressionNode> {
        let key = self
            .lexer
            .read_unquoted_literal(false)
            .or_else(|| self.lexer.read_quoted_literal())?;
        if !self.lexer.eat(':') {
            return None;
        }

        let value = self
            .lexer
            .read_quoted_literal()
            .or_else(|| self.lexer.read_unquoted_literal(true))?;
        Some(ExpressionNode::key_value(key, value))
    }

    /// Returns the range from `start` to the current position.
    fn range_from(&self, start: usize) -> Range {
        Range::new(start, self.lexer.position())
    }
}
