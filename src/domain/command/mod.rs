//! Command parsing
//!
//! Reverse-engineers a workflow's request shape from a raw command-line
//! HTTP invocation copied out of a provider's documentation.

pub mod extract;
mod inference;
mod parser;

pub use inference::{infer_input_field, DEFAULT_INPUT_FIELD_PRIORITY};
pub use parser::{CommandParser, ParseResult, ParserConfig};
