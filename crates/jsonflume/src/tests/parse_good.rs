use alloc::{string::ToString, vec};

use rstest::rstest;

use crate::{Parser, ParserOptions, Value, parse, parse_bytes};

fn parse_default(text: &str) -> Value {
    parse(text, ParserOptions::default()).unwrap()
}

#[rstest]
#[case("null", Value::Null)]
#[case("true", Value::Boolean(true))]
#[case("false", Value::Boolean(false))]
#[case("0", Value::Integer(0))]
#[case("42", Value::Integer(42))]
#[case("-7", Value::Integer(-7))]
#[case("9223372036854775807", Value::Integer(i64::MAX))]
#[case("-9223372036854775808", Value::Integer(i64::MIN))]
#[case("2.5", Value::Double(2.5))]
#[case("-0.5", Value::Double(-0.5))]
#[case("1e2", Value::Double(100.0))]
#[case("1.5E-3", Value::Double(0.0015))]
#[case("0.0", Value::Double(0.0))]
#[case("\"\"", Value::String("".to_string()))]
#[case("\"hi\"", Value::String("hi".to_string()))]
fn scalar_roots(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(parse_default(text), expected);
}

#[test]
fn integer_overflow_becomes_double() {
    assert_eq!(
        parse_default("9223372036854775808"),
        Value::Double(9.223372036854776e18)
    );
}

#[rstest]
#[case(r#""a\"b""#, "a\"b")]
#[case(r#""a\\b""#, "a\\b")]
#[case(r#""a\/b""#, "a/b")]
#[case(r#""\b\f\n\r\t""#, "\u{8}\u{c}\n\r\t")]
#[case(r#""A""#, "A")]
#[case(r#""é""#, "é")]
#[case(r#""😀""#, "\u{1F600}")]
#[case("\"café 日本\"", "café 日本")]
fn string_escapes(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(parse_default(text), Value::String(expected.to_string()));
}

#[test]
fn nested_document() {
    let root = parse_default(r#"{"a": 1, "b": [true, null, 2.5], "c": {"d": "x"}}"#);
    assert_eq!(root["a"], Value::Integer(1));
    assert_eq!(root["b"][0], Value::Boolean(true));
    assert_eq!(root["b"][1], Value::Null);
    assert_eq!(root["b"][2], Value::Double(2.5));
    assert_eq!(root["c"]["d"], Value::String("x".to_string()));
}

#[test]
fn empty_containers() {
    assert_eq!(parse_default("[]"), Value::Array(vec![]));
    assert_eq!(parse_default("{}"), Value::Object(crate::Map::new()));
}

#[test]
fn object_preserves_insertion_order() {
    let root = parse_default(r#"{"z": 1, "a": 2, "m": 3}"#);
    let Value::Object(map) = root else {
        panic!("expected an object");
    };
    let keys: vec::Vec<_> = map.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn duplicate_keys_last_wins_at_first_position() {
    let root = parse_default(r#"{"a": 1, "b": 2, "a": 3}"#);
    let Value::Object(map) = root else {
        panic!("expected an object");
    };
    let keys: vec::Vec<_> = map.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(map["a"], Value::Integer(3));
}

#[test]
fn whitespace_everywhere() {
    let root = parse_default(" \t\r\n{ \"a\" :\n[ 1 , 2 ]\t} \n");
    assert_eq!(root["a"][1], Value::Integer(2));
}

#[test]
fn comments_accepted_when_enabled() {
    let options = ParserOptions {
        allow_comments: true,
        ..ParserOptions::default()
    };
    let text = "// leading\n[1, /* mid */ 2] // trailing";
    assert_eq!(
        parse(text, options).unwrap(),
        Value::Array(vec![Value::Integer(1), Value::Integer(2)])
    );
}

#[test]
fn trailing_commas_accepted_when_enabled() {
    let options = ParserOptions {
        allow_trailing_commas: true,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse("[1, 2,]", options).unwrap(),
        Value::Array(vec![Value::Integer(1), Value::Integer(2)])
    );
    let root = parse(r#"{"a": 1,}"#, options).unwrap();
    assert_eq!(root["a"], Value::Integer(1));
}

#[test]
fn unchecked_utf8_substitutes_replacement_character() {
    let options = ParserOptions {
        check_utf8: false,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse_bytes(b"\"a\xFFb\"", options).unwrap(),
        Value::String("a\u{FFFD}b".to_string())
    );
}

#[test]
fn deeply_nested_arrays() {
    let mut text = alloc::string::String::new();
    for _ in 0..200 {
        text.push('[');
    }
    text.push('0');
    for _ in 0..200 {
        text.push(']');
    }
    let mut value = &parse_default(&text);
    for _ in 0..200 {
        let Value::Array(items) = value else {
            panic!("expected an array");
        };
        value = &items[0];
    }
    assert_eq!(*value, Value::Integer(0));
}

#[test]
fn is_complete_tracks_root() {
    let mut parser = Parser::new(ParserOptions::default());
    parser.feed(b"[1").unwrap();
    assert!(!parser.is_complete());
    parser.feed(b"]").unwrap();
    assert!(parser.is_complete());
}

#[test]
fn mixed_byte_and_text_feeding() {
    let mut parser = Parser::new(ParserOptions::default());
    parser.feed(b"[\"caf").unwrap();
    parser.feed_str("\u{e9}\"]").unwrap();
    assert_eq!(
        parser.finish().unwrap(),
        Value::Array(vec![Value::String("café".to_string())])
    );
}
