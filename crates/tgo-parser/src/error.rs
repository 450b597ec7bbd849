//! Error types for tgo parsing.

use source_map::Span;
use std::fmt;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred during scanning or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The span where the error occurred.
    pub span: Span,
    /// The error code.
    pub code: ErrorCode,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// Create an unexpected token error.
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(
            format!("expected {}, found {}", expected, found),
            span,
            ErrorCode::UnexpectedToken,
        )
    }

    /// Create an unterminated literal or comment error.
    pub fn unterminated(what: &str, span: Span) -> Self {
        Self::new(
            format!("{} not terminated", what),
            span,
            ErrorCode::Unterminated,
        )
    }

    /// Create an invalid character error.
    pub fn invalid_character(c: char, span: Span) -> Self {
        Self::new(
            format!("invalid character {:?}", c),
            span,
            ErrorCode::InvalidCharacter,
        )
    }

    /// Create an invalid escape sequence error.
    pub fn invalid_escape(span: Span) -> Self {
        Self::new("unknown escape sequence", span, ErrorCode::InvalidEscape)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Error codes for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unexpected token encountered.
    UnexpectedToken,
    /// String, rune, template literal or comment without its terminator.
    Unterminated,
    /// Character that cannot start any token.
    InvalidCharacter,
    /// Malformed escape sequence inside a literal.
    InvalidEscape,
    /// Syntax error.
    SyntaxError,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "unexpected-token",
            ErrorCode::Unterminated => "unterminated",
            ErrorCode::InvalidCharacter => "invalid-character",
            ErrorCode::InvalidEscape => "invalid-escape",
            ErrorCode::SyntaxError => "syntax-error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
