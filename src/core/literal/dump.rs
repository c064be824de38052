//! core::literal::dump
//!
//! Serializer: renders a [`Value`] as a table-constructor literal.
//!
//! # Format
//!
//! ```text
//! return {
//!   ["name"] = "fireball",
//!   ["tags"] = {
//!     "fire",
//!     "ranged",
//!   },
//!   [7] = true,
//! }
//! ```
//!
//! A table whose keys are exactly `1..=n` is written as a list; anything
//! else is written as `[key] = value` pairs. Every entry ends with `,`.
//! Indentation is two spaces per level and carries no meaning. Tables
//! nested deeper than the parser accepts are refused, so a dumped literal
//! always reads back.

use std::fmt::Write;

use thiserror::Error;

use super::parse::MAX_DEPTH;
use crate::core::value::{is_sequence, Key, Table, Value};

/// Indentation unit.
const INDENT: &str = "  ";

/// Errors from serialization.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DumpError {
    /// A float with no literal form (NaN or infinity).
    #[error("cannot serialize non-finite number {value} at '{location}'")]
    NonFinite { value: f64, location: String },

    /// Tables nested past the parser's limit.
    #[error("tables nested deeper than {max} levels at '{location}'")]
    TooDeep { max: usize, location: String },
}

/// Render a value as a literal.
///
/// # Errors
///
/// Returns `DumpError` if any nested value has no literal form.
pub fn dump(value: &Value) -> Result<String, DumpError> {
    let mut out = String::new();
    let mut location = Vec::new();
    write_value(&mut out, value, 0, &mut location)?;
    Ok(out)
}

/// Render a root table in the persisted file format: `return <literal>\n`.
pub fn dump_file(root: &Table) -> Result<String, DumpError> {
    let mut out = String::from("return ");
    let mut location = Vec::new();
    write_table(&mut out, root, 0, &mut location)?;
    out.push('\n');
    Ok(out)
}

fn write_value(
    out: &mut String,
    value: &Value,
    depth: usize,
    location: &mut Vec<String>,
) -> Result<(), DumpError> {
    match value {
        Value::Str(s) => out.push_str(&quote(s)),
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Float(f) => out.push_str(&format_float(*f, location)?),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Table(t) => write_table(out, t, depth, location)?,
    }
    Ok(())
}

fn write_table(
    out: &mut String,
    table: &Table,
    depth: usize,
    location: &mut Vec<String>,
) -> Result<(), DumpError> {
    if depth >= MAX_DEPTH {
        return Err(DumpError::TooDeep {
            max: MAX_DEPTH,
            location: location_name(location),
        });
    }
    if table.is_empty() {
        out.push_str("{}");
        return Ok(());
    }

    let inner = INDENT.repeat(depth + 1);
    let sequence = is_sequence(table);

    out.push_str("{\n");
    for (key, value) in table {
        out.push_str(&inner);
        if !sequence {
            out.push_str(&format_key(key));
            out.push_str(" = ");
        }
        location.push(key.to_string());
        write_value(out, value, depth + 1, location)?;
        location.pop();
        out.push_str(",\n");
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
    Ok(())
}

fn format_key(key: &Key) -> String {
    match key {
        Key::Index(i) => format!("[{}]", i),
        Key::Name(name) => format!("[{}]", quote(name)),
    }
}

/// Shortest round-trip form, always marked as a float.
fn format_float(f: f64, location: &[String]) -> Result<String, DumpError> {
    if !f.is_finite() {
        return Err(DumpError::NonFinite {
            value: f,
            location: location_name(location),
        });
    }
    // Debug output of a finite f64 always contains '.' or 'e'.
    Ok(format!("{:?}", f))
}

fn location_name(location: &[String]) -> String {
    if location.is_empty() {
        "<root>".to_string()
    } else {
        location.join(".")
    }
}

/// Quote a string so that the parser reads back exactly the same bytes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\{:03}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::list;

    fn table(entries: Vec<(Key, Value)>) -> Table {
        entries.into_iter().collect()
    }

    #[test]
    fn scalars() {
        assert_eq!(dump(&Value::Int(-42)).unwrap(), "-42");
        assert_eq!(dump(&Value::Float(1.0)).unwrap(), "1.0");
        assert_eq!(dump(&Value::Float(0.25)).unwrap(), "0.25");
        assert_eq!(dump(&Value::Bool(false)).unwrap(), "false");
        assert_eq!(dump(&Value::from("hi")).unwrap(), "\"hi\"");
    }

    #[test]
    fn empty_table_is_empty_block() {
        assert_eq!(dump(&Value::table()).unwrap(), "{}");
        assert_eq!(dump_file(&Table::new()).unwrap(), "return {}\n");
    }

    #[test]
    fn dense_table_is_a_list() {
        let out = dump(&Value::Table(list(["a", "b", "c"]))).unwrap();
        assert_eq!(out, "{\n  \"a\",\n  \"b\",\n  \"c\",\n}");
    }

    #[test]
    fn sparse_table_is_keyed() {
        let t = table(vec![
            (Key::Index(1), Value::from("a")),
            (Key::Index(3), Value::from("c")),
        ]);
        let out = dump(&Value::Table(t)).unwrap();
        assert_eq!(out, "{\n  [1] = \"a\",\n  [3] = \"c\",\n}");
    }

    #[test]
    fn string_keys_are_quoted() {
        let t = table(vec![(Key::from("odd \"key\""), Value::Bool(true))]);
        let out = dump(&Value::Table(t)).unwrap();
        assert_eq!(out, "{\n  [\"odd \\\"key\\\"\"] = true,\n}");
    }

    #[test]
    fn nesting_indents() {
        let inner = table(vec![(Key::from("c"), Value::Int(5))]);
        let outer = table(vec![(Key::from("b"), Value::Table(inner))]);
        let out = dump_file(&outer).unwrap();
        assert_eq!(
            out,
            "return {\n  [\"b\"] = {\n    [\"c\"] = 5,\n  },\n}\n"
        );
    }

    #[test]
    fn quote_escapes_controls() {
        assert_eq!(quote("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(quote("line\nnext\ttab\r"), r#""line\nnext\ttab\r""#);
        assert_eq!(quote("\u{1b}[0m"), r#""\027[0m""#);
        assert_eq!(quote("\u{7f}"), r#""\127""#);
        assert_eq!(quote("héllo"), "\"héllo\"");
    }

    #[test]
    fn non_finite_fails_with_location() {
        let inner = table(vec![(Key::from("rate"), Value::Float(f64::NAN))]);
        let outer = table(vec![(Key::from("stats"), Value::Table(inner))]);

        let err = dump_file(&outer).unwrap_err();
        match err {
            DumpError::NonFinite { location, .. } => assert_eq!(location, "stats.rate"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn nested(levels: usize) -> Table {
        let mut table = Table::new();
        for _ in 1..levels {
            let mut outer = Table::new();
            outer.insert(Key::from("a"), Value::Table(table));
            table = outer;
        }
        table
    }

    #[test]
    fn nesting_at_parser_limit_reads_back() {
        let root = nested(MAX_DEPTH);
        let text = dump_file(&root).unwrap();
        assert_eq!(crate::core::literal::parse_file(&text).unwrap(), root);
    }

    #[test]
    fn nesting_past_parser_limit_fails() {
        let err = dump_file(&nested(MAX_DEPTH + 1)).unwrap_err();
        match err {
            DumpError::TooDeep { max, location } => {
                assert_eq!(max, MAX_DEPTH);
                assert_eq!(location.split('.').count(), MAX_DEPTH);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(dump(&Value::Table(nested(MAX_DEPTH + 1))).is_err());
    }

    #[test]
    fn non_finite_root_scalar() {
        let err = dump(&Value::Float(f64::INFINITY)).unwrap_err();
        assert!(err.to_string().contains("<root>"));
    }
}
