//! `Arbitrary` for [`Value`], used by the property tests.
//!
//! Doubles are constrained to finite values, since non-finite doubles have
//! no JSON representation and are rejected by the generator.

use alloc::string::String;

use quickcheck::{Arbitrary, Gen};

use crate::{Map, Value};

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_at_depth(g, 3)
    }
}

fn arbitrary_at_depth(g: &mut Gen, depth: usize) -> Value {
    // Containers only while depth remains, so trees stay small.
    let variants = if depth == 0 { 5 } else { 7 };
    match u32::arbitrary(g) % variants {
        0 => Value::Null,
        1 => Value::Boolean(bool::arbitrary(g)),
        2 => Value::Integer(i64::arbitrary(g)),
        3 => {
            let d = f64::arbitrary(g);
            Value::Double(if d.is_finite() { d } else { 0.5 })
        }
        4 => Value::String(String::arbitrary(g)),
        5 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| arbitrary_at_depth(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), arbitrary_at_depth(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}
