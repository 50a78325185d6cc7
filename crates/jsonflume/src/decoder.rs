//! Incremental UTF-8 decoding with carry-over across chunk boundaries.
//!
//! Byte chunks may split a multi-byte sequence anywhere. The decoder keeps
//! the incomplete trailing bytes of each chunk (at most three) and completes
//! the code point from the next chunk, so callers can slice input wherever
//! their transport happens to.
//!
//! Two modes, selected once per session by
//! [`check_utf8`](crate::ParserOptions::check_utf8):
//!
//! - strict (default): malformed sequences fail with the byte offset of the
//!   first bad byte;
//! - trusted-input: malformed sequences are substituted with U+FFFD and the
//!   result is unspecified. This mode skips the safety net, it does not
//!   repair input.

use alloc::string::String;

/// Expected encoded length for a leading byte. Invalid leads report 1 so the
/// validation step flags them.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

fn is_continuation(byte: u8) -> bool {
    (byte & 0xC0) == 0x80
}

#[derive(Debug)]
pub(crate) struct Utf8Decoder {
    carry: [u8; 4],
    carry_len: u8,
    /// Byte offset where the carried sequence started.
    carry_offset: usize,
    /// Total bytes accepted so far, across all chunks.
    bytes_seen: usize,
    check_utf8: bool,
}

impl Utf8Decoder {
    pub(crate) fn new(check_utf8: bool) -> Self {
        Self {
            carry: [0; 4],
            carry_len: 0,
            carry_offset: 0,
            bytes_seen: 0,
            check_utf8,
        }
    }

    /// Appends the decoded text of `chunk` to `out`. On a malformed sequence
    /// in strict mode, returns the byte offset of the bad sequence within
    /// the whole input stream.
    pub(crate) fn decode(&mut self, chunk: &[u8], out: &mut String) -> Result<(), usize> {
        let base = self.bytes_seen;
        self.bytes_seen += chunk.len();

        let mut idx = self.complete_carry(chunk, out)?;

        while idx < chunk.len() {
            let rest = &chunk[idx..];
            if self.check_utf8 {
                match core::str::from_utf8(rest) {
                    Ok(text) => {
                        out.push_str(text);
                        idx = chunk.len();
                    }
                    Err(e) => {
                        let valid = e.valid_up_to();
                        if let Ok(prefix) = core::str::from_utf8(&rest[..valid]) {
                            out.push_str(prefix);
                        }
                        idx += valid;
                        match e.error_len() {
                            // A valid prefix of a multi-byte sequence at the
                            // end of the chunk: carry it for the next one.
                            None => {
                                self.stash(&chunk[idx..], base + idx);
                                idx = chunk.len();
                            }
                            Some(_) => return Err(base + idx),
                        }
                    }
                }
            } else {
                let (ch, len) = bstr::decode_utf8(rest);
                match ch {
                    Some(c) => {
                        out.push(c);
                        idx += len;
                    }
                    None if idx + len == chunk.len() && sequence_len(rest[0]) > len => {
                        // Truncated at the chunk boundary, not invalid.
                        self.stash(&chunk[idx..], base + idx);
                        idx = chunk.len();
                    }
                    None => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        idx += len.max(1);
                    }
                }
            }
        }

        Ok(())
    }

    /// Reports a dangling partial sequence once the input stream ends.
    pub(crate) fn finish(&self) -> Result<(), usize> {
        if self.carry_len > 0 && self.check_utf8 {
            return Err(self.carry_offset);
        }
        Ok(())
    }

    fn stash(&mut self, tail: &[u8], offset: usize) {
        self.carry[..tail.len()].copy_from_slice(tail);
        self.carry_len = tail.len() as u8;
        self.carry_offset = offset;
    }

    /// Completes a code point carried from the previous chunk. Returns how
    /// many bytes of `chunk` were consumed doing so.
    fn complete_carry(&mut self, chunk: &[u8], out: &mut String) -> Result<usize, usize> {
        if self.carry_len == 0 {
            return Ok(0);
        }

        let need = sequence_len(self.carry[0]);
        let mut idx = 0;
        while usize::from(self.carry_len) < need && idx < chunk.len() && is_continuation(chunk[idx])
        {
            self.carry[usize::from(self.carry_len)] = chunk[idx];
            self.carry_len += 1;
            idx += 1;
        }

        if usize::from(self.carry_len) < need {
            if idx == chunk.len() {
                // Chunk exhausted, keep waiting.
                return Ok(idx);
            }
            // The next byte is not a continuation byte: the carried sequence
            // was truncated mid-stream.
            if self.check_utf8 {
                return Err(self.carry_offset);
            }
            out.push(char::REPLACEMENT_CHARACTER);
            self.carry_len = 0;
            return Ok(idx);
        }

        match core::str::from_utf8(&self.carry[..need]) {
            Ok(text) => out.push_str(text),
            Err(_) if self.check_utf8 => return Err(self.carry_offset),
            Err(_) => out.push(char::REPLACEMENT_CHARACTER),
        }
        self.carry_len = 0;
        Ok(idx)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Utf8Decoder;

    fn decode_chunks(chunks: &[&[u8]], check: bool) -> Result<String, usize> {
        let mut decoder = Utf8Decoder::new(check);
        let mut out = String::new();
        for chunk in chunks {
            decoder.decode(chunk, &mut out)?;
        }
        decoder.finish().map(|()| out)
    }

    #[test]
    fn ascii_passthrough() {
        assert_eq!(decode_chunks(&[b"hello"], true).unwrap(), "hello");
    }

    #[test]
    fn split_two_byte_sequence() {
        // "é" = 0xC3 0xA9 split across chunks
        assert_eq!(
            decode_chunks(&[b"caf\xC3", b"\xA9"], true).unwrap(),
            "café"
        );
    }

    #[test]
    fn split_four_byte_sequence_three_ways() {
        // "👍" = F0 9F 91 8D
        assert_eq!(
            decode_chunks(&[b"\xF0", b"\x9F\x91", b"\x8D"], true).unwrap(),
            "👍"
        );
    }

    #[test]
    fn invalid_sequence_reports_byte_offset() {
        assert_eq!(decode_chunks(&[b"ab\xFFcd"], true), Err(2));
    }

    #[test]
    fn truncated_carry_reports_start_offset() {
        // 0xC3 at offset 1 is followed by ASCII, not a continuation byte.
        assert_eq!(decode_chunks(&[b"a\xC3", b"z"], true), Err(1));
    }

    #[test]
    fn dangling_carry_fails_at_finish() {
        assert_eq!(decode_chunks(&[b"ab\xC3"], true), Err(2));
    }

    #[test]
    fn unchecked_mode_substitutes() {
        assert_eq!(decode_chunks(&[b"a\xFFb"], false).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn unchecked_mode_still_handles_boundary_splits() {
        assert_eq!(
            decode_chunks(&[b"caf\xC3", b"\xA9"], false).unwrap(),
            "café"
        );
    }
}
