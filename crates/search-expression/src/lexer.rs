//! Lexer (character cursor) for search expressions.
//!
//! The grammar is scannerless: the parser asks the lexer for a specific kind
//! of token at the current position and rewinds it when an alternative does
//! not match. All positions are character offsets.

use super::ast::{LiteralValue, Range};

/// An operator keyword. Matched ASCII case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    And,
    Or,
    Not,
}

impl Keyword {
    /// All keywords that may not appear as an unquoted bare value.
    pub(crate) const RESERVED: [Keyword; 3] = [Keyword::And, Keyword::Or, Keyword::Not];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
        }
    }

    /// Returns `true` if `word` is exactly this keyword, ignoring ASCII case.
    pub(crate) fn matches(self, word: &str) -> bool {
        word.eq_ignore_ascii_case(self.as_str())
    }

    /// Returns `true` if `word` is exactly one of the reserved keywords.
    pub(crate) fn is_reserved(word: &str) -> bool {
        Self::RESERVED.iter().any(|keyword| keyword.matches(word))
    }
}

/// Returns `true` if `c` separates terms: ASCII space and every control
/// character below it. Other Unicode spaces are ordinary literal characters.
pub(crate) fn is_space(c: char) -> bool {
    c <= ' '
}

/// Returns `true` if `c` may appear in an unquoted literal.
pub(crate) fn is_literal_char(c: char) -> bool {
    !matches!(c, '"' | '(' | ')' | ':') && !is_space(c)
}

/// Cursor over the characters of a search expression.
#[derive(Debug, Clone)]
pub(crate) struct Lexer {
    chars: Vec<char>,
    /// Current character offset.
    position: usize,
}

impl Lexer {
    /// Creates a new lexer positioned at the start of `input`.
    pub(crate) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Rewinds (or advances) the cursor to `position`.
    pub(crate) fn reset(&mut self, position: usize) {
        self.position = position;
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Consumes `expected` if it is the next character.
    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Skips whitespace and returns how many characters were skipped.
    pub(crate) fn skip_whitespace(&mut self) -> usize {
        let start = self.position;
        while self.peek().is_some_and(is_space) {
            self.position += 1;
        }
        self.position - start
    }

    /// Consumes one or more whitespace characters, or nothing at all.
    pub(crate) fn eat_whitespace(&mut self) -> bool {
        self.skip_whitespace() > 0
    }

    /// Consumes `keyword` (any ASCII case) if it is next.
    ///
    /// Only the keyword's letters are consumed. Whether a word boundary
    /// follows is up to the grammar rule using it.
    pub(crate) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let word = keyword.as_str();
        let end = self.position + word.len();
        if end > self.chars.len() {
            return false;
        }

        let matches = self.chars[self.position..end]
            .iter()
            .zip(word.chars())
            .all(|(c, k)| c.eq_ignore_ascii_case(&k));
        if matches {
            self.position = end;
        }
        matches
    }

    fn text(&self, range: Range) -> String {
        self.chars[range.start..range.end].iter().collect()
    }

    /// Reads a literal enclosed in double quotes.
    ///
    /// There are no escape sequences: the literal ends at the next `"`.
    /// Leaves the cursor untouched if no quoted literal starts here or the
    /// closing quote is missing.
    pub(crate) fn read_quoted_literal(&mut self) -> Option<LiteralValue> {
        let start = self.position;
        if !self.eat('"') {
            return None;
        }

        let inner_start = self.position;
        let Some(offset) = self.chars[inner_start..].iter().position(|&c| c == '"') else {
            self.position = start;
            return None;
        };
        let inner = Range::new(inner_start, inner_start + offset);
        self.position = inner.end + 1;

        Some(LiteralValue::quoted(
            Range::new(start, self.position),
            inner,
            self.text(inner),
        ))
    }

    /// Reads the longest run of unquoted literal characters.
    ///
    /// With `allow_empty`, an empty literal at the current position is a
    /// valid result; otherwise at least one character is required.
    pub(crate) fn read_unquoted_literal(&mut self, allow_empty: bool) -> Option<LiteralValue> {
        let start = self.position;
        while self.peek().is_some_and(is_literal_char) {
            self.position += 1;
        }

        let range = Range::new(start, self.position);
        if range.is_empty() && !allow_empty {
            return None;
        }
        Some(LiteralValue::unquoted(range, self.text(range)))
    }

    /// Reads a non-empty unquoted literal that is not a reserved keyword.
    ///
    /// `ANDROID` is fine, `and` on its own is not.
    pub(crate) fn read_unreserved_literal(&mut self) -> Option<LiteralValue> {
        let start = self.position;
        let literal = self.read_unquoted_literal(false)?;
        if Keyword::is_reserved(&literal.content) {
            self.position = start;
            return None;
        }
        Some(literal)
    }
}
