//! Ring of decoded-but-unlexed characters.
//!
//! The parser decodes each input chunk and pushes the text here; the lexer
//! consumes it one character at a time, leaving whatever a partial token
//! could not use for the next chunk.

use alloc::{collections::VecDeque, string::String};

#[derive(Debug, Default)]
pub(crate) struct CharRing {
    data: VecDeque<char>,
}

impl CharRing {
    pub(crate) fn new() -> Self {
        Self {
            data: VecDeque::new(),
        }
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        // Byte length is an upper bound on the number of characters.
        self.data.reserve(text.len());
        self.data.extend(text.chars());
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<char> {
        self.data.front().copied()
    }

    #[inline]
    pub(crate) fn next(&mut self) -> Option<char> {
        self.data.pop_front()
    }

    /// Moves the longest prefix matching `predicate` into `dst`, returning
    /// the number of characters moved.
    pub(crate) fn take_while_into<F>(&mut self, dst: &mut String, mut predicate: F) -> usize
    where
        F: FnMut(char) -> bool,
    {
        let mut taken = 0;
        while let Some(&c) = self.data.front() {
            if !predicate(c) {
                break;
            }
            dst.push(c);
            self.data.pop_front();
            taken += 1;
        }
        taken
    }

    /// Drops the longest prefix matching `predicate`, returning the number
    /// of characters dropped.
    pub(crate) fn skip_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(char) -> bool,
    {
        let mut skipped = 0;
        while let Some(&c) = self.data.front() {
            if !predicate(c) {
                break;
            }
            self.data.pop_front();
            skipped += 1;
        }
        skipped
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::CharRing;

    #[test]
    fn push_peek_next() {
        let mut ring = CharRing::new();
        ring.push_str("ab");
        assert_eq!(ring.peek(), Some('a'));
        assert_eq!(ring.peek(), Some('a'));
        assert_eq!(ring.next(), Some('a'));
        assert_eq!(ring.next(), Some('b'));
        assert_eq!(ring.next(), None);
    }

    #[test]
    fn take_while_into_stops_at_predicate() {
        let mut ring = CharRing::new();
        ring.push_str("abc,def");
        let mut dst = String::new();
        assert_eq!(ring.take_while_into(&mut dst, |c| c != ','), 3);
        assert_eq!(dst, "abc");
        assert_eq!(ring.peek(), Some(','));
    }

    #[test]
    fn skip_while_drops_prefix() {
        let mut ring = CharRing::new();
        ring.push_str("   x");
        assert_eq!(ring.skip_while(|c| c == ' '), 3);
        assert_eq!(ring.peek(), Some('x'));
    }

    #[test]
    fn survives_multibyte_text() {
        let mut ring = CharRing::new();
        ring.push_str("åβ👍");
        assert_eq!(ring.next(), Some('å'));
        assert_eq!(ring.next(), Some('β'));
        assert_eq!(ring.next(), Some('👍'));
    }
}
