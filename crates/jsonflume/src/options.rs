//! Session configuration.
//!
//! Options are consumed when a session is constructed and cannot change for
//! the lifetime of that session: the session owns its copy, so mid-session
//! reconfiguration is unrepresentable rather than rejected at runtime.

use alloc::string::String;

/// Configuration for a [`Parser`](crate::Parser) session.
///
/// # Examples
///
/// ```rust
/// use jsonflume::ParserOptions;
///
/// let options = ParserOptions {
///     allow_comments: true,
///     ..ParserOptions::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to accept `//` line comments and `/* */` block comments
    /// between tokens. Comments are discarded; they never appear in the
    /// parsed value.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether to validate multi-byte UTF-8 sequences in byte input.
    ///
    /// When enabled, malformed sequences fail with
    /// [`ParseErrorKind::Encoding`](crate::ParseErrorKind::Encoding) carrying
    /// the byte offset of the bad sequence. When disabled, input is treated
    /// as trusted: malformed sequences are substituted with U+FFFD and the
    /// resulting value is unspecified. Disabling the check never "repairs"
    /// input; it only skips the safety net.
    ///
    /// # Default
    ///
    /// `true`
    pub check_utf8: bool,

    /// Whether to accept a comma before a closing `]` or `}`.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_commas: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_comments: false,
            check_utf8: true,
            allow_trailing_commas: false,
        }
    }
}

/// Configuration for a [`Generator`](crate::Generator) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Whether to pretty-print: one indent unit per structural level, a
    /// newline between siblings, and a single space after `:`. When `false`
    /// the output is maximally compact.
    ///
    /// # Default
    ///
    /// `false`
    pub beautify: bool,

    /// The indent unit used when [`beautify`](Self::beautify) is enabled.
    ///
    /// # Default
    ///
    /// Two spaces.
    pub indent: String,

    /// Whether to escape non-ASCII characters as `\uXXXX` (surrogate pairs
    /// above the basic multilingual plane). By default non-ASCII characters
    /// pass through as raw UTF-8.
    ///
    /// # Default
    ///
    /// `false`
    pub escape_non_ascii: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            beautify: false,
            indent: String::from("  "),
            escape_non_ascii: false,
        }
    }
}
