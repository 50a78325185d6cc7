//! The streaming parser session.
//!
//! A [`Parser`] accepts input in arbitrarily sliced chunks, runs them through
//! the UTF-8 decoder and the tokenizer, and folds the resulting tokens into a
//! value tree via an explicit construction stack. Feeding chunk-by-chunk and
//! feeding the concatenated input produce the same value or the same error.

use alloc::{string::String, vec::Vec};

use crate::{
    decoder::Utf8Decoder,
    error::{ParseError, ParseErrorKind},
    event::ParseEvent,
    lexer::{Lexer, Number, Token},
    options::ParserOptions,
    value::{Map, Value},
};

/// Grammar position between tokens.
///
/// There is no `Failed` variant: failure is tracked separately so the
/// original error survives for replay at [`Parser::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    ExpectValue,
    ExpectMapKeyOrEnd,
    ExpectColon,
    ExpectMapValue,
    ExpectCommaOrMapEnd,
    ExpectArrayValueOrEnd,
    ExpectCommaOrArrayEnd,
    Complete,
}

/// One open container on the construction stack.
#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Map {
        entries: Map,
        /// Key parsed but value not yet attached.
        pending_key: Option<String>,
    },
}

/// An incremental JSON parser.
///
/// Feed input with [`feed`](Self::feed) or [`feed_str`](Self::feed_str) as it
/// arrives, then call [`finish`](Self::finish) to retrieve the root value.
/// Errors are terminal: after a failed call, further feeding reports
/// [`ParseErrorKind::SessionFailed`] and `finish` returns the original error.
///
/// # Examples
///
/// ```rust
/// use jsonflume::{Parser, ParserOptions, Value};
///
/// let mut parser = Parser::new(ParserOptions::default());
/// parser.feed(b"[1, 2, ")?;
/// parser.feed(b"3]")?;
/// assert_eq!(parser.finish()?[1], Value::Integer(2));
/// # Ok::<(), jsonflume::ParseError>(())
/// ```
#[derive(Debug)]
pub struct Parser {
    options: ParserOptions,
    decoder: Utf8Decoder,
    lexer: Lexer,
    state: ParserState,
    frames: Vec<Frame>,
    root: Option<Value>,
    failed: Option<ParseError>,
    /// Set when the previous token was a comma inside a container, for
    /// trailing comma detection.
    after_comma: bool,
}

impl Parser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            decoder: Utf8Decoder::new(options.check_utf8),
            lexer: Lexer::new(options.allow_comments),
            state: ParserState::ExpectValue,
            frames: Vec::new(),
            root: None,
            failed: None,
            after_comma: false,
        }
    }

    /// The options this session was constructed with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// `true` once a complete root value has been parsed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == ParserState::Complete
    }

    /// Feeds a chunk of raw bytes. The chunk may end anywhere, including in
    /// the middle of a multi-byte UTF-8 sequence, a token, or an escape.
    ///
    /// # Errors
    ///
    /// Fails on malformed UTF-8 (strict mode), on a syntax error, or on
    /// non-whitespace input after the root value completed. The session is
    /// unusable afterwards.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ParseError> {
        self.check_live()?;
        let mut text = String::new();
        if let Err(byte_offset) = self.decoder.decode(chunk, &mut text) {
            let error = self.encoding_error(byte_offset);
            self.failed = Some(error.clone());
            return Err(error);
        }
        self.lexer.push(&text);
        self.run(false)
    }

    /// Feeds a chunk of text.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`feed`](Self::feed), except encoding errors
    /// cannot occur from the chunk itself.
    pub fn feed_str(&mut self, chunk: &str) -> Result<(), ParseError> {
        // Routed through the byte path so stream offsets stay consistent
        // when byte and text chunks are mixed.
        self.feed(chunk.as_bytes())
    }

    /// Declares end of input and returns the root value.
    ///
    /// # Errors
    ///
    /// Returns the original error if the session already failed,
    /// [`ParseErrorKind::UnexpectedEndOfInput`] if no complete root value was
    /// parsed, or [`ParseErrorKind::TrailingData`] if extra content started
    /// after the root but never completed a token.
    pub fn finish(mut self) -> Result<Value, ParseError> {
        if let Some(error) = self.failed {
            return Err(error);
        }
        if let Err(byte_offset) = self.decoder.finish() {
            return Err(self.encoding_error(byte_offset));
        }
        self.pump(true)?;

        if self.state != ParserState::Complete {
            return Err(self.position_error(ParseErrorKind::UnexpectedEndOfInput));
        }
        if !self.lexer.is_idle() {
            // An unfinished comment after the root is truncated input; only
            // a partial token counts as trailing data.
            if self.lexer.in_comment() {
                return Err(self.position_error(ParseErrorKind::UnexpectedEndOfInput));
            }
            let at = self.lexer.token_start();
            return Err(ParseError {
                kind: ParseErrorKind::TrailingData,
                offset: at.offset,
                line: at.line,
                column: at.column,
            });
        }
        match self.root {
            Some(root) => Ok(root),
            None => Err(self.position_error(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    fn check_live(&self) -> Result<(), ParseError> {
        match &self.failed {
            Some(original) => Err(ParseError {
                kind: ParseErrorKind::SessionFailed,
                offset: original.offset,
                line: original.line,
                column: original.column,
            }),
            None => Ok(()),
        }
    }

    fn run(&mut self, end_of_input: bool) -> Result<(), ParseError> {
        match self.pump(end_of_input) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.failed = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Drains every complete token out of the lexer.
    fn pump(&mut self, end_of_input: bool) -> Result<(), ParseError> {
        while let Some(token) = self.lexer.next_token(end_of_input)? {
            self.dispatch(token)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, token: Token) -> Result<(), ParseError> {
        match self.state {
            ParserState::ExpectValue | ParserState::ExpectMapValue => {
                let event = self.value_event(token, "a JSON value")?;
                self.apply(event)
            }

            ParserState::ExpectMapKeyOrEnd => match token {
                Token::Str(key) => self.apply(ParseEvent::MapKey(key)),
                Token::Punct(b'}') => {
                    if self.after_comma && !self.options.allow_trailing_commas {
                        return Err(self.syntax(&Token::Punct(b'}'), "an object key"));
                    }
                    self.apply(ParseEvent::MapEnd)
                }
                token => Err(self.syntax(&token, "an object key or '}'")),
            },

            ParserState::ExpectColon => match token {
                Token::Punct(b':') => {
                    self.state = ParserState::ExpectMapValue;
                    Ok(())
                }
                token => Err(self.syntax(&token, "':'")),
            },

            ParserState::ExpectCommaOrMapEnd => match token {
                Token::Punct(b',') => {
                    self.after_comma = true;
                    self.state = ParserState::ExpectMapKeyOrEnd;
                    Ok(())
                }
                Token::Punct(b'}') => self.apply(ParseEvent::MapEnd),
                token => Err(self.syntax(&token, "',' or '}'")),
            },

            ParserState::ExpectArrayValueOrEnd => match token {
                Token::Punct(b']') => {
                    if self.after_comma && !self.options.allow_trailing_commas {
                        return Err(self.syntax(&Token::Punct(b']'), "a JSON value"));
                    }
                    self.apply(ParseEvent::ArrayEnd)
                }
                token => {
                    let event = self.value_event(token, "a JSON value or ']'")?;
                    self.apply(event)
                }
            },

            ParserState::ExpectCommaOrArrayEnd => match token {
                Token::Punct(b',') => {
                    self.after_comma = true;
                    self.state = ParserState::ExpectArrayValueOrEnd;
                    Ok(())
                }
                Token::Punct(b']') => self.apply(ParseEvent::ArrayEnd),
                token => Err(self.syntax(&token, "',' or ']'")),
            },

            ParserState::Complete => {
                let at = self.lexer.token_start();
                Err(ParseError {
                    kind: ParseErrorKind::TrailingData,
                    offset: at.offset,
                    line: at.line,
                    column: at.column,
                })
            }
        }
    }

    /// Translates a value-starting token into its event, or reports a syntax
    /// error for anything else.
    fn value_event(&self, token: Token, expected: &'static str) -> Result<ParseEvent, ParseError> {
        Ok(match token {
            Token::Punct(b'{') => ParseEvent::MapStart,
            Token::Punct(b'[') => ParseEvent::ArrayStart,
            Token::Str(s) => ParseEvent::Str(s),
            Token::Num(Number::Integer(i)) => ParseEvent::Integer(i),
            Token::Num(Number::Double(d)) => ParseEvent::Double(d),
            Token::Bool(b) => ParseEvent::Boolean(b),
            Token::Null => ParseEvent::Null,
            token => return Err(self.syntax(&token, expected)),
        })
    }

    fn apply(&mut self, event: ParseEvent) -> Result<(), ParseError> {
        self.after_comma = false;
        match event {
            ParseEvent::MapStart => {
                self.frames.push(Frame::Map {
                    entries: Map::new(),
                    pending_key: None,
                });
                self.state = ParserState::ExpectMapKeyOrEnd;
                Ok(())
            }
            ParseEvent::ArrayStart => {
                self.frames.push(Frame::Array(Vec::new()));
                self.state = ParserState::ExpectArrayValueOrEnd;
                Ok(())
            }
            ParseEvent::MapKey(key) => match self.frames.last_mut() {
                Some(Frame::Map { pending_key, .. }) => {
                    *pending_key = Some(key);
                    self.state = ParserState::ExpectColon;
                    Ok(())
                }
                _ => Err(self.desync("an open object")),
            },
            ParseEvent::MapEnd => match self.frames.pop() {
                Some(Frame::Map {
                    entries,
                    pending_key: None,
                }) => self.attach(Value::Object(entries)),
                _ => Err(self.desync("an open object")),
            },
            ParseEvent::ArrayEnd => match self.frames.pop() {
                Some(Frame::Array(items)) => self.attach(Value::Array(items)),
                _ => Err(self.desync("an open array")),
            },
            ParseEvent::Integer(i) => self.attach(Value::Integer(i)),
            ParseEvent::Double(d) => self.attach(Value::Double(d)),
            ParseEvent::Str(s) => self.attach(Value::String(s)),
            ParseEvent::Boolean(b) => self.attach(Value::Boolean(b)),
            ParseEvent::Null => self.attach(Value::Null),
        }
    }

    /// Hands a finished value to its parent container, or crowns it the root.
    fn attach(&mut self, value: Value) -> Result<(), ParseError> {
        match self.frames.last_mut() {
            Some(Frame::Array(items)) => {
                items.push(value);
                self.state = ParserState::ExpectCommaOrArrayEnd;
                Ok(())
            }
            Some(Frame::Map {
                entries,
                pending_key,
            }) => {
                let Some(key) = pending_key.take() else {
                    return Err(self.desync("a pending object key"));
                };
                // Duplicate keys: the last occurrence wins, at the first
                // occurrence's position.
                entries.insert(key, value);
                self.state = ParserState::ExpectCommaOrMapEnd;
                Ok(())
            }
            None => {
                self.root = Some(value);
                self.state = ParserState::Complete;
                Ok(())
            }
        }
    }

    fn syntax(&self, token: &Token, expected: &'static str) -> ParseError {
        let at = self.lexer.token_start();
        ParseError {
            kind: ParseErrorKind::Syntax {
                expected,
                found: token.describe(),
            },
            offset: at.offset,
            line: at.line,
            column: at.column,
        }
    }

    /// Construction stack inconsistency. Unreachable when dispatch and the
    /// stack agree; surfaced as a syntax error rather than a panic.
    fn desync(&self, expected: &'static str) -> ParseError {
        self.syntax(&Token::Punct(b'?'), expected)
    }

    fn position_error(&self, kind: ParseErrorKind) -> ParseError {
        let at = self.lexer.position();
        ParseError {
            kind,
            offset: at.offset,
            line: at.line,
            column: at.column,
        }
    }

    fn encoding_error(&self, byte_offset: usize) -> ParseError {
        let at = self.lexer.position();
        ParseError {
            kind: ParseErrorKind::Encoding,
            offset: byte_offset,
            line: at.line,
            column: at.column,
        }
    }
}

/// Parses a complete text in one call.
///
/// # Errors
///
/// Fails as [`Parser::feed_str`] and [`Parser::finish`] would.
///
/// # Examples
///
/// ```rust
/// use jsonflume::{parse, ParserOptions, Value};
///
/// let value = parse("{\"on\": true}", ParserOptions::default())?;
/// assert_eq!(value["on"], Value::Boolean(true));
/// # Ok::<(), jsonflume::ParseError>(())
/// ```
pub fn parse(text: &str, options: ParserOptions) -> Result<Value, ParseError> {
    let mut parser = Parser::new(options);
    parser.feed_str(text)?;
    parser.finish()
}

/// Parses a complete byte buffer in one call.
///
/// # Errors
///
/// Fails as [`Parser::feed`] and [`Parser::finish`] would.
pub fn parse_bytes(bytes: &[u8], options: ParserOptions) -> Result<Value, ParseError> {
    let mut parser = Parser::new(options);
    parser.feed(bytes)?;
    parser.finish()
}
