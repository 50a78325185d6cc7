//! Accumulator for `\uXXXX` escape sequences, including surrogate pairs.
//!
//! Four hexadecimal digits are collected one at a time, so a chunk boundary
//! may fall between any two of them. A high surrogate is held until the
//! following `\uXXXX` escape supplies the low half; the lexer feeds the
//! intervening `\` and `u` through its own states.

use thiserror::Error;

/// Outcome of feeding one hex digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeStep {
    /// More digits are required.
    Pending,
    /// The escape resolved to a scalar value.
    Scalar(char),
    /// The four digits were a high surrogate; the next escape must supply
    /// the low half.
    AwaitLowSurrogate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum EscapeError {
    #[error("'{0}' is not a hexadecimal digit")]
    NotHex(char),
    #[error("low surrogate \\u{0:04X} without a preceding high surrogate")]
    UnexpectedLowSurrogate(u16),
    #[error("high surrogate \\u{0:04X} not followed by a low surrogate")]
    UnpairedHighSurrogate(u16),
}

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    code: u16,
    digits: u8,
    pending_high: Option<u16>,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Begins a fresh `\uXXXX` escape. A held high surrogate survives so the
    /// following escape can complete the pair.
    pub(crate) fn begin(&mut self) {
        self.code = 0;
        self.digits = 0;
    }

    /// Feeds one digit. Returns [`EscapeStep::Scalar`] once four digits
    /// resolve to a scalar value (combining a surrogate pair if one is in
    /// flight).
    pub(crate) fn feed(&mut self, c: char) -> Result<EscapeStep, EscapeError> {
        let Some(digit) = c.to_digit(16) else {
            return Err(EscapeError::NotHex(c));
        };

        self.code = (self.code << 4) | digit as u16;
        self.digits += 1;
        if self.digits < 4 {
            return Ok(EscapeStep::Pending);
        }

        let code = self.code;
        self.begin();
        match (code, self.pending_high.take()) {
            (0xD800..=0xDBFF, None) => {
                self.pending_high = Some(code);
                Ok(EscapeStep::AwaitLowSurrogate)
            }
            (0xD800..=0xDBFF, Some(high)) => Err(EscapeError::UnpairedHighSurrogate(high)),
            (0xDC00..=0xDFFF, Some(high)) => {
                let scalar = 0x10000
                    + (u32::from(high) - 0xD800) * 0x400
                    + (u32::from(code) - 0xDC00);
                char::from_u32(scalar)
                    .map(EscapeStep::Scalar)
                    .ok_or(EscapeError::UnexpectedLowSurrogate(code))
            }
            (0xDC00..=0xDFFF, None) => Err(EscapeError::UnexpectedLowSurrogate(code)),
            (_, Some(high)) => Err(EscapeError::UnpairedHighSurrogate(high)),
            (_, None) => {
                // Any non-surrogate u16 is a valid scalar value.
                char::from_u32(u32::from(code))
                    .map(EscapeStep::Scalar)
                    .ok_or(EscapeError::UnexpectedLowSurrogate(code))
            }
        }
    }

    /// The surrogate held in flight, for error reporting.
    pub(crate) fn pending_high(&self) -> Option<u16> {
        self.pending_high
    }
}
