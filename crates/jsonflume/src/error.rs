//! Error taxonomy for the parser and generator sessions.

use alloc::string::String;
use thiserror::Error;

/// What went wrong while parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// The input contained a malformed UTF-8 sequence. Only raised when
    /// [`check_utf8`](crate::ParserOptions::check_utf8) is enabled.
    #[error("malformed UTF-8 sequence")]
    Encoding,
    /// A token appeared where the grammar does not allow it.
    #[error("unexpected {found}, expected {expected}")]
    Syntax {
        /// Description of the token class the parser was expecting.
        expected: &'static str,
        /// Description of what was found instead.
        found: String,
    },
    /// The session was finalized while a value was still incomplete, or
    /// before any value was supplied at all.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// Non-whitespace content followed the completed root value.
    #[error("trailing data after the root value")]
    TrailingData,
    /// An operation was attempted on a session that already failed. The
    /// original error was returned by the call that failed, and is returned
    /// again by [`Parser::finish`](crate::Parser::finish).
    #[error("parser session already failed")]
    SessionFailed,
}

/// A terminal parse failure with source coordinates.
///
/// `offset` counts characters of decoded input for lexical and structural
/// errors, and raw input bytes for [`ParseErrorKind::Encoding`]. `line` and
/// `column` are 1-based. Errors point at or before the offending input,
/// never past it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at line {line}, column {column} (offset {offset})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// What went wrong while generating.
///
/// Generator errors are raised before any output for the failing call is
/// written, so the accumulator always holds a coherent prefix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// A value was supplied where an object key was expected. JSON object
    /// keys must be strings.
    #[error("object key must be a string, found {found}")]
    InvalidKeyType {
        /// The type of the offending value.
        found: &'static str,
    },
    /// A host type outside the closed [`Value`](crate::Value) variant set was
    /// handed to an adapter. Carries the name of the offending type.
    #[error("unsupported value type: {0}")]
    UnsupportedType(&'static str),
    /// NaN and infinities have no JSON representation.
    #[error("number {0} has no JSON representation")]
    UnrepresentableNumber(f64),
    /// Discrete structural calls did not nest correctly.
    #[error("unbalanced structure: {reason}")]
    UnbalancedStructure {
        /// Which balance rule was violated.
        reason: &'static str,
    },
}
