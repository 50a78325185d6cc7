//! Internal parse event vocabulary.
//!
//! The state machine translates lexical tokens into these events, and the
//! construction stack consumes them to assemble the root value. The event
//! stream is an implementation detail: the public parser surface exposes
//! only the aggregate root.

use alloc::string::String;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParseEvent {
    MapStart,
    MapKey(String),
    MapEnd,
    ArrayStart,
    ArrayEnd,
    Integer(i64),
    Double(f64),
    Str(String),
    Boolean(bool),
    Null,
}
