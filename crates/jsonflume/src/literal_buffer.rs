//! Matcher for the `true`, `false` and `null` keywords.
//!
//! The tail of a keyword is matched one character at a time so that a chunk
//! boundary can fall anywhere inside it.

use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    True,
    False,
    Null,
}

/// What happened after feeding one character to the matcher.
#[derive(Debug, PartialEq)]
pub(crate) enum LiteralStep {
    /// Character matched; the keyword is not finished yet.
    More,
    /// Character matched and completed the keyword.
    Done(Token),
    /// Character did not match the expected one.
    Mismatch,
}

/// Matches the remainder of a keyword after its first character.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LiteralMatcher {
    rest: &'static str,
    keyword: Keyword,
}

impl LiteralMatcher {
    /// Starts matching from the keyword's first character, or `None` if `c`
    /// does not begin a keyword.
    pub(crate) fn start(c: char) -> Option<Self> {
        let (rest, keyword) = match c {
            't' => ("rue", Keyword::True),
            'f' => ("alse", Keyword::False),
            'n' => ("ull", Keyword::Null),
            _ => return None,
        };
        Some(Self { rest, keyword })
    }

    pub(crate) fn step(&mut self, c: char) -> LiteralStep {
        let mut chars = self.rest.chars();
        if chars.next() != Some(c) {
            return LiteralStep::Mismatch;
        }
        self.rest = chars.as_str();
        if self.rest.is_empty() {
            LiteralStep::Done(match self.keyword {
                Keyword::True => Token::Bool(true),
                Keyword::False => Token::Bool(false),
                Keyword::Null => Token::Null,
            })
        } else {
            LiteralStep::More
        }
    }
}
