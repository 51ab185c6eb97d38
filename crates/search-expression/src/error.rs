//! Error types for the search expression parser.

use thiserror::Error;

/// A specialized Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// The query is not a well-formed search expression.
///
/// Parsing reports success or failure only: there is no position or
/// expected-token detail. Empty input, a missing operand, unbalanced or empty
/// parentheses and unterminated quotes all produce this same error.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Default)]
#[error("invalid search expression")]
pub struct ParseError;
