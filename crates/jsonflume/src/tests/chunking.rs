//! Chunk-split invariance: feeding a document in pieces must produce the
//! same value (or the same error) as feeding it whole, no matter where the
//! boundaries fall.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::QuickCheck;
use rstest::rstest;

use crate::{Parser, ParserOptions, Value, parse, parse_bytes};

/// Parses `bytes` split into two feeds at every possible byte boundary and
/// checks each result against the whole-input parse.
fn assert_split_invariant(bytes: &[u8], options: ParserOptions) {
    let whole = parse_bytes(bytes, options);
    for split in 0..=bytes.len() {
        let mut parser = Parser::new(options);
        let chunked = parser
            .feed(&bytes[..split])
            .and_then(|()| parser.feed(&bytes[split..]))
            .and_then(|()| parser.finish());
        match (&whole, &chunked) {
            (Ok(a), Ok(b)) => assert_eq!(a, b, "split at {split}"),
            (Err(a), Err(b)) => assert_eq!(a.kind, b.kind, "split at {split}"),
            _ => panic!("split at {split}: whole={whole:?} chunked={chunked:?}"),
        }
    }
}

#[rstest]
#[case(r#"{"a": 1, "b": [true, null, 2.5]}"#)]
#[case(r#""line\nbreak and é and 😀""#)]
#[case("\"caf\u{e9} \u{1F44D}\"")]
#[case("[-12.5e-3, 0, 9223372036854775807]")]
#[case("[true, false, null]")]
#[case("  [ 1 ,\n 2 ]  ")]
#[case("[01]")]
#[case("{\"a\": }")]
fn every_two_way_byte_split(#[case] text: &str) {
    assert_split_invariant(text.as_bytes(), ParserOptions::default());
}

#[test]
fn every_split_with_comments() {
    let options = ParserOptions {
        allow_comments: true,
        ..ParserOptions::default()
    };
    assert_split_invariant(b"[1, // x\n 2 /* y */]", options);
}

#[test]
fn multibyte_character_split_mid_sequence() {
    let mut parser = Parser::new(ParserOptions::default());
    // "é" is C3 A9; the boundary falls between the two bytes.
    parser.feed(b"\"caf\xC3").unwrap();
    parser.feed(b"\xA9\"").unwrap();
    assert_eq!(
        parser.finish().unwrap(),
        Value::String("café".to_string())
    );
}

#[test]
fn four_byte_character_split_three_ways() {
    let mut parser = Parser::new(ParserOptions::default());
    parser.feed(b"\"\xF0").unwrap();
    parser.feed(b"\x9F\x91").unwrap();
    parser.feed(b"\x8D\"").unwrap();
    assert_eq!(
        parser.finish().unwrap(),
        Value::String("\u{1F44D}".to_string())
    );
}

#[test]
fn surrogate_pair_escape_split_between_halves() {
    let mut parser = Parser::new(ParserOptions::default());
    parser.feed(br#""\uD83D"#).unwrap();
    parser.feed(br#"\uDE00""#).unwrap();
    assert_eq!(
        parser.finish().unwrap(),
        Value::String("\u{1F600}".to_string())
    );
}

#[test]
fn keyword_split() {
    let mut parser = Parser::new(ParserOptions::default());
    parser.feed(b"[tr").unwrap();
    parser.feed(b"ue, nul").unwrap();
    parser.feed(b"l]").unwrap();
    assert_eq!(
        parser.finish().unwrap(),
        Value::Array(alloc::vec![Value::Boolean(true), Value::Null])
    );
}

#[test]
fn number_split_keeps_one_token() {
    let mut parser = Parser::new(ParserOptions::default());
    parser.feed(b"[12").unwrap();
    parser.feed(b"3, 4").unwrap();
    parser.feed(b"5.5]").unwrap();
    assert_eq!(
        parser.finish().unwrap(),
        Value::Array(alloc::vec![Value::Integer(123), Value::Double(45.5)])
    );
}

#[test]
fn one_byte_at_a_time() {
    let text = r#"{"k": [1, {"n": -2.5e1}, "sA"]}"#;
    let mut parser = Parser::new(ParserOptions::default());
    for byte in text.as_bytes() {
        parser.feed(core::slice::from_ref(byte)).unwrap();
    }
    let root = parser.finish().unwrap();
    assert_eq!(root["k"][1]["n"], Value::Double(-25.0));
    assert_eq!(root["k"][2], Value::String("sA".to_string()));
}

/// Property: feeding in arbitrarily sized byte chunks yields the value the
/// whole-input parse yields.
#[test]
fn partition_quickcheck() {
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let src = value.to_string();
        let bytes = src.as_bytes();
        let whole = parse(&src, ParserOptions::default()).unwrap();

        let mut parser = Parser::new(ParserOptions::default());
        let mut idx = 0;
        for s in splits {
            let remaining = bytes.len() - idx;
            if remaining == 0 {
                break;
            }
            let size = 1 + (s % remaining);
            parser.feed(&bytes[idx..idx + size]).unwrap();
            idx += size;
        }
        parser.feed(&bytes[idx..]).unwrap();
        parser.finish().unwrap() == whole
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}

/// Property: text chunks at char boundaries behave identically to byte
/// chunks.
#[test]
fn text_partition_quickcheck() {
    fn prop(value: Value, split: usize) -> bool {
        let src = value.to_string();
        let chars: Vec<char> = src.chars().collect();
        let cut = if chars.is_empty() { 0 } else { split % chars.len() };
        let head: String = chars[..cut].iter().collect();
        let tail: String = chars[cut..].iter().collect();

        let mut parser = Parser::new(ParserOptions::default());
        parser.feed_str(&head).unwrap();
        parser.feed_str(&tail).unwrap();
        parser.finish().unwrap() == value
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Value, usize) -> bool);
}
