//! An incremental JSON codec: a chunk-fed streaming parser that assembles a
//! native value tree, and a generator that serializes one back to JSON text.
//!
//! The parser accepts input as raw byte chunks (UTF-8 sequences may be split
//! anywhere, including mid-character) or as pre-decoded text, and produces a
//! single root [`Value`] once the caller signals end of input:
//!
//! ```rust
//! use jsonflume::{Parser, ParserOptions, Value};
//!
//! let mut parser = Parser::new(ParserOptions::default());
//! parser.feed(br#"{"a":1,"#).unwrap();
//! parser.feed(br#""b":[true,null,2.5]}"#).unwrap();
//! let root = parser.finish().unwrap();
//! assert_eq!(root["a"], Value::Integer(1));
//! ```
//!
//! The generator walks a [`Value`] (or accepts discrete structural calls) and
//! accumulates JSON text, compact by default or beautified on request:
//!
//! ```rust
//! use jsonflume::{Generator, GeneratorOptions, Value};
//!
//! let mut generator = Generator::new(GeneratorOptions::default());
//! generator.write_value(&Value::Boolean(true)).unwrap();
//! assert_eq!(generator.finish().unwrap(), "true");
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod decoder;
mod escape;
mod escape_buffer;
mod event;
mod lexer;
mod literal_buffer;
mod value;

mod error;
mod generator;
mod options;
mod parser;

#[cfg(test)]
mod tests;

pub use error::{GenerateError, ParseError, ParseErrorKind};
pub use generator::{Generator, ToJson};
pub use options::{GeneratorOptions, ParserOptions};
pub use parser::{Parser, parse, parse_bytes};
pub use value::{Array, Map, Value};
