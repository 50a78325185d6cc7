//! The lexical tokenizer.
//!
//! Consumes decoded characters from the [`CharRing`] and produces structural
//! punctuators, strings with escapes resolved, numbers, and keyword
//! literals. All intermediate token state lives in the lexer itself, so a
//! chunk boundary can fall anywhere: inside a number, a string body, an
//! escape sequence (including the two halves of a surrogate pair), a
//! keyword, or a comment. Nothing is ever rescanned.

use alloc::{
    format,
    string::{String, ToString},
};
use core::mem;

use crate::{
    buffer::CharRing,
    error::{ParseError, ParseErrorKind},
    escape_buffer::{EscapeError, EscapeStep, UnicodeEscapeBuffer},
    literal_buffer::{LiteralMatcher, LiteralStep},
};

/// A numeric literal, classified by the lexer.
///
/// A literal with no fraction and no exponent that fits a 64-bit signed
/// integer is [`Integer`]; everything else is [`Double`].
///
/// [`Integer`]: Number::Integer
/// [`Double`]: Number::Double
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Integer(i64),
    Double(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// One of `{` `}` `[` `]` `:` `,`.
    Punct(u8),
    Str(String),
    Num(Number),
    Bool(bool),
    Null,
}

impl Token {
    /// Short description for syntax error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Punct(p) => format!("'{}'", *p as char),
            Token::Str(_) => "a string".to_string(),
            Token::Num(Number::Integer(i)) => format!("number {i}"),
            Token::Num(Number::Double(d)) => format!("number {d}"),
            Token::Bool(b) => format!("'{b}'"),
            Token::Null => "'null'".to_string(),
        }
    }
}

/// Cursor coordinates into the decoded input stream. `offset` counts
/// characters; `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Literal,
    NumSign,
    NumZero,
    NumInt,
    NumFracStart,
    NumFrac,
    NumExpStart,
    NumExpSign,
    NumExp,
    Str,
    StrEscape,
    StrUnicode,
    StrSurrogateSlash,
    StrSurrogateU,
    CommentStart,
    LineComment,
    BlockComment,
    BlockCommentStar,
}

#[derive(Debug)]
pub(crate) struct Lexer {
    ring: CharRing,
    state: LexState,
    /// Scratch for the token under construction: decoded string content or
    /// the raw text of a number.
    scratch: String,
    num_is_double: bool,
    unicode: UnicodeEscapeBuffer,
    literal: Option<LiteralMatcher>,
    allow_comments: bool,
    offset: usize,
    line: usize,
    column: usize,
    token_start: Position,
}

impl Lexer {
    pub(crate) fn new(allow_comments: bool) -> Self {
        let origin = Position {
            offset: 0,
            line: 1,
            column: 1,
        };
        Self {
            ring: CharRing::new(),
            state: LexState::Default,
            scratch: String::new(),
            num_is_double: false,
            unicode: UnicodeEscapeBuffer::new(),
            literal: None,
            allow_comments,
            offset: 0,
            line: 1,
            column: 1,
            token_start: origin,
        }
    }

    /// Queues decoded text for tokenization.
    pub(crate) fn push(&mut self, text: &str) {
        self.ring.push_str(text);
    }

    /// Current cursor position.
    pub(crate) fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Position of the first character of the most recent token.
    pub(crate) fn token_start(&self) -> Position {
        self.token_start
    }

    /// `true` when no token is in flight (a safe place for input to end).
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self.state, LexState::Default)
    }

    /// `true` while inside a comment. A comment cut off by end of input is
    /// truncation, not trailing data.
    pub(crate) fn in_comment(&self) -> bool {
        matches!(
            self.state,
            LexState::CommentStart
                | LexState::LineComment
                | LexState::BlockComment
                | LexState::BlockCommentStar
        )
    }

    /// Produces the next complete token, or `None` when the pending input is
    /// exhausted. With `end_of_input` set, a trailing number is finalized
    /// and a trailing line comment is closed; any other in-flight token
    /// leaves the lexer non-idle for the caller to report.
    pub(crate) fn next_token(&mut self, end_of_input: bool) -> Result<Option<Token>, ParseError> {
        loop {
            let Some(c) = self.ring.peek() else {
                return self.exhausted(end_of_input);
            };

            match self.state {
                LexState::Default => match c {
                    ' ' | '\t' | '\n' | '\r' => {
                        self.bump();
                    }
                    '{' | '}' | '[' | ']' | ':' | ',' => {
                        self.mark_token_start();
                        self.bump();
                        return Ok(Some(Token::Punct(c as u8)));
                    }
                    '"' => {
                        self.mark_token_start();
                        self.bump();
                        self.scratch.clear();
                        self.state = LexState::Str;
                    }
                    '-' | '0'..='9' => {
                        self.mark_token_start();
                        self.bump();
                        self.scratch.clear();
                        self.scratch.push(c);
                        self.num_is_double = false;
                        self.state = match c {
                            '-' => LexState::NumSign,
                            '0' => LexState::NumZero,
                            _ => LexState::NumInt,
                        };
                    }
                    't' | 'f' | 'n' => {
                        self.mark_token_start();
                        self.bump();
                        self.literal = LiteralMatcher::start(c);
                        self.state = LexState::Literal;
                    }
                    '/' if self.allow_comments => {
                        self.bump();
                        self.state = LexState::CommentStart;
                    }
                    c => return Err(self.unexpected(c, "a JSON token")),
                },

                LexState::Literal => {
                    let Some(matcher) = self.literal.as_mut() else {
                        return Err(self.unexpected(c, "a literal"));
                    };
                    match matcher.step(c) {
                        LiteralStep::More => {
                            self.bump();
                        }
                        LiteralStep::Done(token) => {
                            self.bump();
                            self.literal = None;
                            self.state = LexState::Default;
                            return Ok(Some(token));
                        }
                        LiteralStep::Mismatch => {
                            return Err(self.unexpected(c, "the remainder of a literal"));
                        }
                    }
                }

                // ---------------------------- numbers ----------------------------
                LexState::NumSign => match c {
                    '0' => {
                        self.bump();
                        self.scratch.push(c);
                        self.state = LexState::NumZero;
                    }
                    '1'..='9' => {
                        self.bump();
                        self.scratch.push(c);
                        self.state = LexState::NumInt;
                    }
                    c => return Err(self.unexpected(c, "a digit")),
                },

                LexState::NumZero => match c {
                    '.' => {
                        self.bump();
                        self.scratch.push(c);
                        self.num_is_double = true;
                        self.state = LexState::NumFracStart;
                    }
                    'e' | 'E' => {
                        self.bump();
                        self.scratch.push(c);
                        self.num_is_double = true;
                        self.state = LexState::NumExpStart;
                    }
                    // JSON forbids leading zeros.
                    '0'..='9' => return Err(self.unexpected(c, "'.', an exponent, or a delimiter")),
                    _ => return Ok(Some(self.finish_number()?)),
                },

                LexState::NumInt => match c {
                    '0'..='9' => {
                        self.take_digits();
                    }
                    '.' => {
                        self.bump();
                        self.scratch.push(c);
                        self.num_is_double = true;
                        self.state = LexState::NumFracStart;
                    }
                    'e' | 'E' => {
                        self.bump();
                        self.scratch.push(c);
                        self.num_is_double = true;
                        self.state = LexState::NumExpStart;
                    }
                    _ => return Ok(Some(self.finish_number()?)),
                },

                LexState::NumFracStart => match c {
                    '0'..='9' => {
                        self.take_digits();
                        self.state = LexState::NumFrac;
                    }
                    c => return Err(self.unexpected(c, "a digit")),
                },

                LexState::NumFrac => match c {
                    '0'..='9' => {
                        self.take_digits();
                    }
                    'e' | 'E' => {
                        self.bump();
                        self.scratch.push(c);
                        self.state = LexState::NumExpStart;
                    }
                    _ => return Ok(Some(self.finish_number()?)),
                },

                LexState::NumExpStart => match c {
                    '+' | '-' => {
                        self.bump();
                        self.scratch.push(c);
                        self.state = LexState::NumExpSign;
                    }
                    '0'..='9' => {
                        self.take_digits();
                        self.state = LexState::NumExp;
                    }
                    c => return Err(self.unexpected(c, "a digit or a sign")),
                },

                LexState::NumExpSign => match c {
                    '0'..='9' => {
                        self.take_digits();
                        self.state = LexState::NumExp;
                    }
                    c => return Err(self.unexpected(c, "a digit")),
                },

                LexState::NumExp => match c {
                    '0'..='9' => {
                        self.take_digits();
                    }
                    _ => return Ok(Some(self.finish_number()?)),
                },

                // ---------------------------- strings ----------------------------
                LexState::Str => match c {
                    '"' => {
                        self.bump();
                        self.state = LexState::Default;
                        return Ok(Some(Token::Str(mem::take(&mut self.scratch))));
                    }
                    '\\' => {
                        self.bump();
                        self.state = LexState::StrEscape;
                    }
                    c if (c as u32) < 0x20 => {
                        return Err(self.unexpected(c, "a string character"));
                    }
                    _ => {
                        // Bulk-copy the plain run. The predicate rejects
                        // control characters, so no newline bookkeeping is
                        // needed here.
                        let copied = self.ring.take_while_into(&mut self.scratch, |ch| {
                            ch != '"' && ch != '\\' && (ch as u32) >= 0x20
                        });
                        self.offset += copied;
                        self.column += copied;
                    }
                },

                LexState::StrEscape => match c {
                    '"' | '\\' | '/' => {
                        self.bump();
                        self.scratch.push(c);
                        self.state = LexState::Str;
                    }
                    'b' => {
                        self.bump();
                        self.scratch.push('\u{0008}');
                        self.state = LexState::Str;
                    }
                    'f' => {
                        self.bump();
                        self.scratch.push('\u{000C}');
                        self.state = LexState::Str;
                    }
                    'n' => {
                        self.bump();
                        self.scratch.push('\n');
                        self.state = LexState::Str;
                    }
                    'r' => {
                        self.bump();
                        self.scratch.push('\r');
                        self.state = LexState::Str;
                    }
                    't' => {
                        self.bump();
                        self.scratch.push('\t');
                        self.state = LexState::Str;
                    }
                    'u' => {
                        self.bump();
                        self.unicode.begin();
                        self.state = LexState::StrUnicode;
                    }
                    c => return Err(self.unexpected(c, "an escape character")),
                },

                LexState::StrUnicode => match self.unicode.feed(c) {
                    Ok(step) => {
                        self.bump();
                        match step {
                            EscapeStep::Pending => {}
                            EscapeStep::Scalar(ch) => {
                                self.scratch.push(ch);
                                self.state = LexState::Str;
                            }
                            EscapeStep::AwaitLowSurrogate => {
                                self.state = LexState::StrSurrogateSlash;
                            }
                        }
                    }
                    Err(e) => return Err(self.escape_error(e)),
                },

                LexState::StrSurrogateSlash => match c {
                    '\\' => {
                        self.bump();
                        self.state = LexState::StrSurrogateU;
                    }
                    _ => {
                        let high = self.unicode.pending_high().unwrap_or(0);
                        return Err(self.escape_error(EscapeError::UnpairedHighSurrogate(high)));
                    }
                },

                LexState::StrSurrogateU => match c {
                    'u' => {
                        self.bump();
                        self.unicode.begin();
                        self.state = LexState::StrUnicode;
                    }
                    _ => {
                        let high = self.unicode.pending_high().unwrap_or(0);
                        return Err(self.escape_error(EscapeError::UnpairedHighSurrogate(high)));
                    }
                },

                // ---------------------------- comments ----------------------------
                LexState::CommentStart => match c {
                    '/' => {
                        self.bump();
                        self.state = LexState::LineComment;
                    }
                    '*' => {
                        self.bump();
                        self.state = LexState::BlockComment;
                    }
                    c => return Err(self.unexpected(c, "'/' or '*'")),
                },

                LexState::LineComment => {
                    let skipped = self.ring.skip_while(|ch| ch != '\n');
                    self.offset += skipped;
                    self.column += skipped;
                    if self.ring.peek().is_some() {
                        self.bump();
                        self.state = LexState::Default;
                    }
                }

                LexState::BlockComment => {
                    self.bump();
                    if c == '*' {
                        self.state = LexState::BlockCommentStar;
                    }
                }

                LexState::BlockCommentStar => {
                    self.bump();
                    match c {
                        '/' => self.state = LexState::Default,
                        '*' => {}
                        _ => self.state = LexState::BlockComment,
                    }
                }
            }
        }
    }

    fn exhausted(&mut self, end_of_input: bool) -> Result<Option<Token>, ParseError> {
        if !end_of_input {
            return Ok(None);
        }
        match self.state {
            LexState::NumZero | LexState::NumInt | LexState::NumFrac | LexState::NumExp => {
                Ok(Some(self.finish_number()?))
            }
            // A line comment may be terminated by end of input.
            LexState::LineComment => {
                self.state = LexState::Default;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    #[inline]
    fn bump(&mut self) {
        if let Some(c) = self.ring.next() {
            self.offset += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn mark_token_start(&mut self) {
        self.token_start = self.position();
    }

    /// Bulk-consumes consecutive digits into the scratch.
    fn take_digits(&mut self) {
        let copied = self
            .ring
            .take_while_into(&mut self.scratch, |d| d.is_ascii_digit());
        self.offset += copied;
        self.column += copied;
    }

    fn finish_number(&mut self) -> Result<Token, ParseError> {
        self.state = LexState::Default;
        let number = if self.num_is_double {
            match self.scratch.parse::<f64>() {
                Ok(d) => Number::Double(d),
                Err(_) => return Err(self.malformed_number()),
            }
        } else {
            match self.scratch.parse::<i64>() {
                Ok(i) => Number::Integer(i),
                // Magnitude beyond i64: fall back to a double.
                Err(_) => match self.scratch.parse::<f64>() {
                    Ok(d) => Number::Double(d),
                    Err(_) => return Err(self.malformed_number()),
                },
            }
        };
        self.scratch.clear();
        Ok(Token::Num(number))
    }

    fn unexpected(&self, c: char, expected: &'static str) -> ParseError {
        self.error_here(ParseErrorKind::Syntax {
            expected,
            found: format_char(c),
        })
    }

    fn escape_error(&self, e: EscapeError) -> ParseError {
        self.error_here(ParseErrorKind::Syntax {
            expected: "a valid \\uXXXX escape",
            found: e.to_string(),
        })
    }

    fn malformed_number(&self) -> ParseError {
        ParseError {
            kind: ParseErrorKind::Syntax {
                expected: "a number",
                found: format!("'{}'", self.scratch),
            },
            offset: self.token_start.offset,
            line: self.token_start.line,
            column: self.token_start.column,
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }
}

/// Renders a character for error messages, escaping anything unprintable.
fn format_char(c: char) -> String {
    match c {
        '"' => "'\\\"'".to_string(),
        '\\' => "'\\\\'".to_string(),
        '\n' => "'\\n'".to_string(),
        '\r' => "'\\r'".to_string(),
        '\t' => "'\\t'".to_string(),
        c if c.is_control() => format!("'\\u{:04X}'", c as u32),
        c => format!("'{c}'"),
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec, vec::Vec};

    use super::{Lexer, Number, Token};

    fn lex_all(text: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(false);
        lexer.push(text);
        let mut tokens = vec![];
        while let Some(tok) = lexer.next_token(true).unwrap() {
            tokens.push(tok);
        }
        tokens
    }

    #[test]
    fn punctuation_and_literals() {
        assert_eq!(
            lex_all("[true, false, null]"),
            vec![
                Token::Punct(b'['),
                Token::Bool(true),
                Token::Punct(b','),
                Token::Bool(false),
                Token::Punct(b','),
                Token::Null,
                Token::Punct(b']'),
            ]
        );
    }

    #[test]
    fn integers_and_doubles_are_distinguished() {
        assert_eq!(lex_all("1"), vec![Token::Num(Number::Integer(1))]);
        assert_eq!(lex_all("-42"), vec![Token::Num(Number::Integer(-42))]);
        assert_eq!(lex_all("2.5"), vec![Token::Num(Number::Double(2.5))]);
        assert_eq!(lex_all("1e2"), vec![Token::Num(Number::Double(100.0))]);
        assert_eq!(
            lex_all("9223372036854775807"),
            vec![Token::Num(Number::Integer(i64::MAX))]
        );
        // One past i64::MAX overflows into a double.
        assert_eq!(
            lex_all("9223372036854775808"),
            vec![Token::Num(Number::Double(9.223372036854776e18))]
        );
    }

    #[test]
    fn string_escapes_resolve() {
        assert_eq!(
            lex_all(r#""a\nbA\\""#),
            vec![Token::Str("a\nbA\\".to_string())]
        );
    }

    #[test]
    fn surrogate_pair_escape() {
        assert_eq!(
            lex_all("\"\\uD83D\\uDE00\""),
            vec![Token::Str("\u{1F600}".to_string())]
        );
    }

    #[test]
    fn token_split_across_pushes() {
        let mut lexer = Lexer::new(false);
        lexer.push("\"ca");
        assert_eq!(lexer.next_token(false).unwrap(), None);
        lexer.push("fe\"");
        assert_eq!(
            lexer.next_token(false).unwrap(),
            Some(Token::Str("cafe".to_string()))
        );
    }

    #[test]
    fn escape_split_across_pushes() {
        let mut lexer = Lexer::new(false);
        lexer.push("\"\\u00");
        assert_eq!(lexer.next_token(false).unwrap(), None);
        lexer.push("e9\"");
        assert_eq!(
            lexer.next_token(false).unwrap(),
            Some(Token::Str("é".to_string()))
        );
    }

    #[test]
    fn number_split_across_pushes() {
        let mut lexer = Lexer::new(false);
        lexer.push("12");
        assert_eq!(lexer.next_token(false).unwrap(), None);
        lexer.push("3.5 ");
        assert_eq!(
            lexer.next_token(false).unwrap(),
            Some(Token::Num(Number::Double(123.5)))
        );
    }

    #[test]
    fn trailing_number_finalized_at_end_of_input() {
        let mut lexer = Lexer::new(false);
        lexer.push("123");
        assert_eq!(lexer.next_token(false).unwrap(), None);
        assert_eq!(
            lexer.next_token(true).unwrap(),
            Some(Token::Num(Number::Integer(123)))
        );
    }

    #[test]
    fn leading_zero_rejected() {
        let mut lexer = Lexer::new(false);
        lexer.push("01");
        assert!(lexer.next_token(true).is_err());
    }

    #[test]
    fn lone_low_surrogate_rejected() {
        let mut lexer = Lexer::new(false);
        lexer.push(r#""\uDC00""#);
        assert!(lexer.next_token(true).is_err());
    }

    #[test]
    fn comments_skipped_when_enabled() {
        let mut lexer = Lexer::new(true);
        lexer.push("// note\n/* block\n */ 7 ");
        assert_eq!(
            lexer.next_token(true).unwrap(),
            Some(Token::Num(Number::Integer(7)))
        );
    }

    #[test]
    fn comment_rejected_when_disabled() {
        let mut lexer = Lexer::new(false);
        lexer.push("// note");
        assert!(lexer.next_token(true).is_err());
    }

    #[test]
    fn comment_split_across_pushes() {
        let mut lexer = Lexer::new(true);
        lexer.push("/* half");
        assert_eq!(lexer.next_token(false).unwrap(), None);
        lexer.push(" rest */ true");
        assert_eq!(lexer.next_token(true).unwrap(), Some(Token::Bool(true)));
    }

    #[test]
    fn positions_track_lines() {
        let mut lexer = Lexer::new(false);
        lexer.push("\n\n  \"x");
        let _ = lexer.next_token(false);
        assert_eq!(lexer.position().line, 3);
    }

    #[test]
    fn control_character_in_string_rejected() {
        let mut lexer = Lexer::new(false);
        lexer.push("\"a\u{1}b\"");
        assert!(lexer.next_token(true).is_err());
    }
}
