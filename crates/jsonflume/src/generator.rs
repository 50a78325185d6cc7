//! The generating session.
//!
//! A [`Generator`] accumulates output text in an owned buffer. Values are
//! supplied either as discrete events mirroring the parser's vocabulary
//! ([`map_open`], [`key`], [`integer`], ...) or wholesale with
//! [`write_value`]. Every error is raised before any output for the failing
//! call is written, so the buffer always holds a coherent prefix.
//!
//! [`map_open`]: Generator::map_open
//! [`key`]: Generator::key
//! [`integer`]: Generator::integer
//! [`write_value`]: Generator::write_value

use alloc::{string::String, vec::Vec};

use crate::{
    error::GenerateError,
    escape::write_escaped_string,
    options::GeneratorOptions,
    value::Value,
};

/// One open container during discrete generation.
#[derive(Debug, Clone, Copy)]
enum GenFrame {
    Array {
        len: usize,
    },
    Map {
        len: usize,
        /// A key has been written and its value has not.
        awaiting_value: bool,
    },
}

/// An incremental JSON generator.
///
/// The session is consumed by [`finish`](Self::finish); a fresh session is
/// required for each document.
///
/// # Examples
///
/// ```rust
/// use jsonflume::{Generator, GeneratorOptions};
///
/// let mut generator = Generator::new(GeneratorOptions::default());
/// generator.map_open()?;
/// generator.key("id")?;
/// generator.integer(7)?;
/// generator.map_close()?;
/// assert_eq!(generator.finish()?, "{\"id\":7}");
/// # Ok::<(), jsonflume::GenerateError>(())
/// ```
#[derive(Debug)]
pub struct Generator {
    options: GeneratorOptions,
    out: String,
    frames: Vec<GenFrame>,
    root_done: bool,
}

impl Generator {
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            out: String::new(),
            frames: Vec::new(),
            root_done: false,
        }
    }

    /// The output accumulated so far. Valid to call at any point; mid-session
    /// the text is a prefix of the final document.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.out
    }

    /// Opens an object.
    ///
    /// # Errors
    ///
    /// Fails like any value would: [`GenerateError::UnbalancedStructure`] as
    /// a second root, [`GenerateError::InvalidKeyType`] in key position.
    pub fn map_open(&mut self) -> Result<(), GenerateError> {
        self.begin_value("object")?;
        self.out.push('{');
        self.frames.push(GenFrame::Map {
            len: 0,
            awaiting_value: false,
        });
        Ok(())
    }

    /// Closes the innermost object.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnbalancedStructure`] if the innermost open container
    /// is not an object or a key is still waiting for its value.
    pub fn map_close(&mut self) -> Result<(), GenerateError> {
        match self.frames.last() {
            Some(GenFrame::Map {
                awaiting_value: false,
                len,
            }) => {
                let len = *len;
                self.frames.pop();
                if self.options.beautify && len > 0 {
                    self.push_newline_indent(self.frames.len());
                }
                self.out.push('}');
                self.end_value();
                Ok(())
            }
            Some(GenFrame::Map { .. }) => Err(GenerateError::UnbalancedStructure {
                reason: "object closed while a key awaits its value",
            }),
            _ => Err(GenerateError::UnbalancedStructure {
                reason: "'}' without a matching '{'",
            }),
        }
    }

    /// Opens an array.
    ///
    /// # Errors
    ///
    /// Fails like any value would: [`GenerateError::UnbalancedStructure`] as
    /// a second root, [`GenerateError::InvalidKeyType`] in key position.
    pub fn array_open(&mut self) -> Result<(), GenerateError> {
        self.begin_value("array")?;
        self.out.push('[');
        self.frames.push(GenFrame::Array { len: 0 });
        Ok(())
    }

    /// Closes the innermost array.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnbalancedStructure`] if the innermost open container
    /// is not an array.
    pub fn array_close(&mut self) -> Result<(), GenerateError> {
        match self.frames.last() {
            Some(GenFrame::Array { len }) => {
                let len = *len;
                self.frames.pop();
                if self.options.beautify && len > 0 {
                    self.push_newline_indent(self.frames.len());
                }
                self.out.push(']');
                self.end_value();
                Ok(())
            }
            _ => Err(GenerateError::UnbalancedStructure {
                reason: "']' without a matching '['",
            }),
        }
    }

    /// Writes an object key. The next call must supply its value.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnbalancedStructure`] outside an object or when the
    /// previous key has no value yet.
    pub fn key(&mut self, key: &str) -> Result<(), GenerateError> {
        let first = match self.frames.last_mut() {
            Some(GenFrame::Map {
                len,
                awaiting_value,
            }) => {
                if *awaiting_value {
                    return Err(GenerateError::UnbalancedStructure {
                        reason: "key supplied where a value was expected",
                    });
                }
                let first = *len == 0;
                *len += 1;
                *awaiting_value = true;
                first
            }
            _ => {
                return Err(GenerateError::UnbalancedStructure {
                    reason: "key outside an object",
                });
            }
        };

        if !first {
            self.out.push(',');
        }
        if self.options.beautify {
            self.push_newline_indent(self.frames.len());
        }
        self.push_quoted(key);
        self.out.push(':');
        if self.options.beautify {
            self.out.push(' ');
        }
        Ok(())
    }

    /// Writes a string value.
    ///
    /// # Errors
    ///
    /// See [`map_open`](Self::map_open) for the placement failure modes.
    pub fn string(&mut self, s: &str) -> Result<(), GenerateError> {
        self.begin_value("string")?;
        self.push_quoted(s);
        self.end_value();
        Ok(())
    }

    /// Writes an integer value.
    ///
    /// # Errors
    ///
    /// See [`map_open`](Self::map_open) for the placement failure modes.
    pub fn integer(&mut self, i: i64) -> Result<(), GenerateError> {
        self.begin_value("integer")?;
        let mut digits = itoa::Buffer::new();
        self.out.push_str(digits.format(i));
        self.end_value();
        Ok(())
    }

    /// Writes a double value. Doubles always carry a fraction or an exponent
    /// (`3.0`, not `3`), so they re-parse as doubles.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnrepresentableNumber`] for NaN and infinities, plus
    /// the placement failure modes of [`map_open`](Self::map_open). Nothing
    /// is written on failure.
    pub fn double(&mut self, d: f64) -> Result<(), GenerateError> {
        if !d.is_finite() {
            return Err(GenerateError::UnrepresentableNumber(d));
        }
        self.begin_value("double")?;
        let mut digits = ryu::Buffer::new();
        self.out.push_str(digits.format_finite(d));
        self.end_value();
        Ok(())
    }

    /// Writes a boolean value.
    ///
    /// # Errors
    ///
    /// See [`map_open`](Self::map_open) for the placement failure modes.
    pub fn boolean(&mut self, b: bool) -> Result<(), GenerateError> {
        self.begin_value("boolean")?;
        self.out.push_str(if b { "true" } else { "false" });
        self.end_value();
        Ok(())
    }

    /// Writes a null value.
    ///
    /// # Errors
    ///
    /// See [`map_open`](Self::map_open) for the placement failure modes.
    pub fn null(&mut self) -> Result<(), GenerateError> {
        self.begin_value("null")?;
        self.out.push_str("null");
        self.end_value();
        Ok(())
    }

    /// Serializes a whole value tree.
    ///
    /// The subtree is validated up front, so a failure leaves the buffer
    /// exactly as it was before the call. The input is never mutated.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnrepresentableNumber`] if the tree contains a
    /// non-finite double anywhere, plus the placement failure modes of
    /// [`map_open`](Self::map_open).
    pub fn write_value(&mut self, value: &Value) -> Result<(), GenerateError> {
        check_representable(value)?;
        self.begin_value(value.type_name())?;
        self.emit(value, self.frames.len());
        self.end_value();
        Ok(())
    }

    /// Serializes any type that can map itself into a [`Value`].
    ///
    /// # Errors
    ///
    /// Whatever the type's [`ToJson::to_json`] reports, plus the failure
    /// modes of [`write_value`](Self::write_value).
    pub fn write(&mut self, value: &impl ToJson) -> Result<(), GenerateError> {
        let value = value.to_json()?;
        self.write_value(&value)
    }

    /// Validates balance and returns the finished document.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnbalancedStructure`] if any container is still open.
    pub fn finish(self) -> Result<String, GenerateError> {
        if !self.frames.is_empty() {
            return Err(GenerateError::UnbalancedStructure {
                reason: "unclosed container at end of session",
            });
        }
        Ok(self.out)
    }

    /// Validates placement and writes any separator owed before a value.
    fn begin_value(&mut self, found: &'static str) -> Result<(), GenerateError> {
        match self.frames.last() {
            None => {
                if self.root_done {
                    return Err(GenerateError::UnbalancedStructure {
                        reason: "root value already written",
                    });
                }
            }
            Some(GenFrame::Map {
                awaiting_value: false,
                ..
            }) => {
                return Err(GenerateError::InvalidKeyType { found });
            }
            // Separator and indent were written by `key`.
            Some(GenFrame::Map { .. }) => {}
            Some(GenFrame::Array { len }) => {
                let first = *len == 0;
                if !first {
                    self.out.push(',');
                }
                if self.options.beautify {
                    self.push_newline_indent(self.frames.len());
                }
            }
        }
        Ok(())
    }

    /// Commits a finished value into its parent's bookkeeping.
    fn end_value(&mut self) {
        match self.frames.last_mut() {
            None => self.root_done = true,
            Some(GenFrame::Array { len }) => *len += 1,
            Some(GenFrame::Map { awaiting_value, .. }) => *awaiting_value = false,
        }
    }

    /// Recursively emits a pre-validated tree. `depth` is the structural
    /// depth of `value` itself, for beautified indentation.
    fn emit(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => {
                let mut digits = itoa::Buffer::new();
                self.out.push_str(digits.format(*i));
            }
            Value::Double(d) => {
                let mut digits = ryu::Buffer::new();
                self.out.push_str(digits.format_finite(*d));
            }
            Value::String(s) => self.push_quoted(s),
            Value::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    if self.options.beautify {
                        self.push_newline_indent(depth + 1);
                    }
                    self.emit(item, depth + 1);
                }
                if self.options.beautify && !items.is_empty() {
                    self.push_newline_indent(depth);
                }
                self.out.push(']');
            }
            Value::Object(entries) => {
                self.out.push('{');
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    if self.options.beautify {
                        self.push_newline_indent(depth + 1);
                    }
                    self.push_quoted(key);
                    self.out.push(':');
                    if self.options.beautify {
                        self.out.push(' ');
                    }
                    self.emit(item, depth + 1);
                }
                if self.options.beautify && !entries.is_empty() {
                    self.push_newline_indent(depth);
                }
                self.out.push('}');
            }
        }
    }

    fn push_quoted(&mut self, s: &str) {
        self.out.push('"');
        write_escaped_string(s, &mut self.out, self.options.escape_non_ascii);
        self.out.push('"');
    }

    fn push_newline_indent(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(&self.options.indent);
        }
    }
}

/// Rejects trees containing non-finite doubles before anything is written.
fn check_representable(value: &Value) -> Result<(), GenerateError> {
    match value {
        Value::Double(d) if !d.is_finite() => Err(GenerateError::UnrepresentableNumber(*d)),
        Value::Array(items) => items.iter().try_for_each(check_representable),
        Value::Object(entries) => entries.values().try_for_each(check_representable),
        _ => Ok(()),
    }
}

/// Conversion seam for serializing host types.
///
/// Types map themselves into the closed [`Value`] variant set; anything that
/// cannot be represented reports [`GenerateError::UnsupportedType`] with the
/// offending type's name.
///
/// # Examples
///
/// ```rust
/// use jsonflume::{GenerateError, Generator, GeneratorOptions, ToJson, Value};
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl ToJson for Point {
///     fn to_json(&self) -> Result<Value, GenerateError> {
///         let mut map = jsonflume::Map::new();
///         map.insert("x".into(), Value::Integer(self.x));
///         map.insert("y".into(), Value::Integer(self.y));
///         Ok(Value::Object(map))
///     }
/// }
///
/// let mut generator = Generator::new(GeneratorOptions::default());
/// generator.write(&Point { x: 1, y: 2 })?;
/// assert_eq!(generator.finish()?, "{\"x\":1,\"y\":2}");
/// # Ok::<(), GenerateError>(())
/// ```
pub trait ToJson {
    /// Maps `self` into a JSON value tree.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnsupportedType`] when `self` has no JSON
    /// representation.
    fn to_json(&self) -> Result<Value, GenerateError>;
}

impl ToJson for Value {
    fn to_json(&self) -> Result<Value, GenerateError> {
        Ok(self.clone())
    }
}
