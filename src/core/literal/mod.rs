//! core::literal
//!
//! Textual literal codec for stored tables.
//!
//! # Modules
//!
//! - [`dump`] - Serializer (value → literal text)
//! - [`parse`] - Literal-only reader (literal text → value)
//!
//! # Invariants
//!
//! For any table built from strings, integers, finite floats, booleans and
//! nested tables, `parse_file(dump_file(t)) == t`.

pub mod dump;
pub mod parse;

pub use dump::{dump, dump_file, quote, DumpError};
pub use parse::{parse, parse_file, ParseError, Position, MAX_DEPTH};
