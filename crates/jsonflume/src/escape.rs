//! JSON string escaping, shared by the generator and `Display for Value`.

use alloc::string::String;

/// Appends `src` to `out` with JSON escaping applied.
///
/// Quote, backslash and control characters are always escaped (`\n`, `\r`,
/// `\t`, `\b`, `\f`, else `\u00XX`), as are the Unicode line separators
/// U+2028/U+2029 which pre-2019 JavaScript parsers mishandle. Non-ASCII
/// characters pass through as UTF-8 unless `escape_non_ascii` is set, in
/// which case they are written as `\uXXXX` (a surrogate pair above the
/// basic multilingual plane).
pub(crate) fn write_escaped_string(src: &str, out: &mut String, escape_non_ascii: bool) {
    for c in src.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{2028}' || c == '\u{2029}' => {
                push_unicode_escape(out, c as u32);
            }
            c if escape_non_ascii && !c.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    push_unicode_escape(out, u32::from(*unit));
                }
            }
            c => out.push(c),
        }
    }
}

fn push_unicode_escape(out: &mut String, code: u32) {
    out.push_str("\\u");
    for shift in [12u32, 8, 4, 0] {
        let digit = (code >> shift) & 0xF;
        out.push(char::from_digit(digit, 16).unwrap_or('0').to_ascii_uppercase());
    }
}
