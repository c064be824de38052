//! core::literal::parse
//!
//! Literal-only reader for the serialized format.
//!
//! Saved files are read as data, never executed. The accepted grammar is
//! the table-constructor subset produced by [`super::dump`], plus the
//! hand-editing conveniences a person would reasonably type:
//!
//! - `name = value` fields and positional values alongside `[key] = value`
//! - `,` or `;` separators, trailing separator allowed
//! - single-quoted strings and long brackets (`[[...]]`, `[==[...]==]`)
//! - hex integers, exponents, unary minus
//! - `--` line comments and `--[[ ... ]]` block comments
//!
//! `nil`, function calls, operators other than unary minus, and any other
//! expression are rejected. Nesting is capped at [`MAX_DEPTH`].

use std::fmt;

use thiserror::Error;

use crate::core::value::{Key, Table, Value};

/// Maximum table nesting accepted by the parser.
pub const MAX_DEPTH: usize = 128;

/// A 1-based line/column position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors from parsing a literal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input at {at}, expected {expected}")]
    UnexpectedEof { expected: &'static str, at: Position },

    #[error("unexpected {found} at {at}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        at: Position,
    },

    #[error("unterminated {what} starting at {at}")]
    Unterminated { what: &'static str, at: Position },

    #[error("invalid escape sequence at {at}: {reason}")]
    InvalidEscape { reason: String, at: Position },

    #[error("malformed number '{text}' at {at}")]
    InvalidNumber { text: String, at: Position },

    #[error("unsupported {what} at {at}")]
    Unsupported { what: String, at: Position },

    #[error("string is not valid UTF-8 at {at}")]
    InvalidUtf8 { at: Position },

    #[error("tables nested deeper than {max} levels at {at}")]
    TooDeep { max: usize, at: Position },
}

/// Parse a single literal value.
///
/// # Example
///
/// ```
/// use dotdb::core::literal::parse;
/// use dotdb::core::value::Value;
///
/// assert_eq!(parse("42").unwrap(), Value::Int(42));
/// assert_eq!(parse("'hi'").unwrap(), Value::from("hi"));
/// assert!(parse("os.exit()").is_err());
/// ```
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(input);
    parser.skip_trivia()?;
    let value = parser.value(0)?;
    parser.expect_end()?;
    Ok(value)
}

/// Parse a persisted store file: an optional `return` followed by a table.
pub fn parse_file(input: &str) -> Result<Table, ParseError> {
    let mut parser = Parser::new(input);
    parser.skip_trivia()?;
    if parser.eat_keyword("return") {
        parser.skip_trivia()?;
    }
    let start = parser.pos;
    match parser.peek() {
        Some(b'{') => {}
        Some(_) => {
            return Err(parser.unexpected_here("table"));
        }
        None => {
            return Err(ParseError::UnexpectedEof {
                expected: "table",
                at: parser.position_at(start),
            })
        }
    }
    let table = parser.table(1)?;
    parser.skip_trivia()?;
    if parser.peek() == Some(b';') {
        parser.pos += 1;
    }
    parser.expect_end()?;
    Ok(table)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            src: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn position_at(&self, pos: usize) -> Position {
        let before = &self.src[..pos.min(self.src.len())];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
        Position { line, column }
    }

    fn here(&self) -> Position {
        self.position_at(self.pos)
    }

    fn unexpected_here(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            None => ParseError::UnexpectedEof {
                expected,
                at: self.here(),
            },
            Some(_) => {
                let found = self.src[self.pos..]
                    .iter()
                    .take_while(|b| !b.is_ascii_whitespace())
                    .take(16)
                    .copied()
                    .collect::<Vec<u8>>();
                ParseError::Unexpected {
                    found: format!("'{}'", String::from_utf8_lossy(&found)),
                    expected,
                    at: self.here(),
                }
            }
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.skip_trivia()?;
        if self.pos < self.src.len() {
            return Err(self.unexpected_here("end of input"));
        }
        Ok(())
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), ParseError> {
        self.skip_trivia()?;
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected_here(expected))
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'-') {
                let start = self.pos;
                self.pos += 2;
                if let Some(level) = self.long_bracket_level() {
                    self.long_bracket_body(level, start, "comment")?;
                } else {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                continue;
            }
            return Ok(());
        }
    }

    /// If positioned at `[`, `[=`, `[==`... followed by `[`, return the level.
    fn long_bracket_level(&self) -> Option<usize> {
        if self.peek() != Some(b'[') {
            return None;
        }
        let mut level = 0;
        while self.peek_at(1 + level) == Some(b'=') {
            level += 1;
        }
        (self.peek_at(1 + level) == Some(b'[')).then_some(level)
    }

    /// Consume a long bracket whose opener starts at `self.pos`.
    fn long_bracket_body(
        &mut self,
        level: usize,
        start: usize,
        what: &'static str,
    ) -> Result<&'a [u8], ParseError> {
        self.pos += level + 2;
        // A newline right after the opener is not part of the content.
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        let src = self.src;
        let body_start = self.pos;
        let mut closer = Vec::with_capacity(level + 2);
        closer.push(b']');
        closer.extend(std::iter::repeat(b'=').take(level));
        closer.push(b']');

        while self.pos < self.src.len() {
            if src[self.pos..].starts_with(&closer) {
                let body = &src[body_start..self.pos];
                self.pos += closer.len();
                return Ok(body);
            }
            self.pos += 1;
        }
        Err(ParseError::Unterminated {
            what,
            at: self.position_at(start),
        })
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        let end = self.pos + word.len();
        if self.src.get(self.pos..end) == Some(word.as_bytes())
            && !matches!(self.src.get(end), Some(b) if is_ident_byte(*b))
        {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let src = self.src;
        let start = self.pos;
        if !matches!(self.peek(), Some(b) if b.is_ascii_alphabetic() || b == b'_') {
            return None;
        }
        while matches!(self.peek(), Some(b) if is_ident_byte(b)) {
            self.pos += 1;
        }
        std::str::from_utf8(&src[start..self.pos]).ok()
    }

    fn value(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            None => Err(self.unexpected_here("value")),
            Some(b'{') => Ok(Value::Table(self.table(depth + 1)?)),
            Some(b'"') | Some(b'\'') => Ok(Value::Str(self.quoted_string()?)),
            Some(b'[') => match self.long_bracket_level() {
                Some(level) => {
                    let start = self.pos;
                    let body = self.long_bracket_body(level, start, "long string")?;
                    let text = String::from_utf8(body.to_vec()).map_err(|_| {
                        ParseError::InvalidUtf8 {
                            at: self.position_at(start),
                        }
                    })?;
                    Ok(Value::Str(text))
                }
                None => Err(self.unexpected_here("value")),
            },
            Some(b) if b == b'-' || b == b'.' || b.is_ascii_digit() => self.number(),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                let start = self.pos;
                match self.identifier() {
                    Some("true") => Ok(Value::Bool(true)),
                    Some("false") => Ok(Value::Bool(false)),
                    Some("nil") => Err(ParseError::Unsupported {
                        what: "nil value".to_string(),
                        at: self.position_at(start),
                    }),
                    Some(other) => Err(ParseError::Unsupported {
                        what: format!("expression '{}'", other),
                        at: self.position_at(start),
                    }),
                    None => Err(self.unexpected_here("value")),
                }
            }
            Some(_) => Err(self.unexpected_here("value")),
        }
    }

    fn table(&mut self, depth: usize) -> Result<Table, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                max: MAX_DEPTH,
                at: self.here(),
            });
        }
        self.expect(b'{', "'{'")?;

        let mut table = Table::new();
        let mut next_index: i64 = 1;

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(table);
                }
                None => return Err(self.unexpected_here("'}'")),
                _ => {}
            }

            let (key, value) = self.field(depth)?;
            match key {
                Some(key) => {
                    table.insert(key, value);
                }
                None => {
                    table.insert(Key::Index(next_index), value);
                    next_index += 1;
                }
            }

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') | Some(b';') => self.pos += 1,
                Some(b'}') => {}
                _ => return Err(self.unexpected_here("',' or '}'")),
            }
        }
    }

    /// One table field. A `None` key means a positional entry.
    fn field(&mut self, depth: usize) -> Result<(Option<Key>, Value), ParseError> {
        let start = self.pos;

        if self.peek() == Some(b'[') && self.long_bracket_level().is_none() {
            self.pos += 1;
            let key_value = self.value(depth)?;
            let key = self.to_key(key_value, start)?;
            self.expect(b']', "']'")?;
            self.expect(b'=', "'='")?;
            let value = self.value(depth)?;
            return Ok((Some(key), value));
        }

        if let Some(name) = self.identifier() {
            self.skip_trivia()?;
            if self.peek() == Some(b'=') && self.peek_at(1) != Some(b'=') {
                self.pos += 1;
                let value = self.value(depth)?;
                return Ok((Some(Key::Name(name.to_string())), value));
            }
            self.pos = start;
        }

        Ok((None, self.value(depth)?))
    }

    fn to_key(&self, value: Value, start: usize) -> Result<Key, ParseError> {
        match value {
            Value::Str(s) => Ok(Key::Name(s)),
            Value::Int(i) => Ok(Key::Index(i)),
            Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Ok(Key::Index(f as i64))
            }
            other => Err(ParseError::Unsupported {
                what: format!("{} key", other.kind()),
                at: self.position_at(start),
            }),
        }
    }

    fn quoted_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let quote = self.src[self.pos];
        self.pos += 1;
        let mut bytes = Vec::new();

        loop {
            let Some(b) = self.peek() else {
                return Err(ParseError::Unterminated {
                    what: "string",
                    at: self.position_at(start),
                });
            };
            self.pos += 1;
            match b {
                b'\n' | b'\r' => {
                    return Err(ParseError::Unterminated {
                        what: "string",
                        at: self.position_at(start),
                    })
                }
                b'\\' => self.escape(&mut bytes)?,
                b if b == quote => break,
                b => bytes.push(b),
            }
        }

        String::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8 {
            at: self.position_at(start),
        })
    }

    /// Decode one escape sequence; the backslash is already consumed.
    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let at = self.position_at(self.pos.saturating_sub(1));
        let invalid = |reason: String| ParseError::InvalidEscape { reason, at };

        let Some(b) = self.peek() else {
            return Err(invalid("backslash at end of input".into()));
        };
        self.pos += 1;

        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'\\' | b'"' | b'\'' => out.push(b),
            b'\n' => {
                out.push(b'\n');
                if self.peek() == Some(b'\r') {
                    self.pos += 1;
                }
            }
            b'\r' => {
                out.push(b'\n');
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'z' => {
                while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
                    self.pos += 1;
                }
            }
            b'x' => {
                let digits = self.src.get(self.pos..self.pos + 2).unwrap_or_default();
                let text = std::str::from_utf8(digits).unwrap_or_default();
                let byte = (text.len() == 2)
                    .then(|| u8::from_str_radix(text, 16).ok())
                    .flatten()
                    .ok_or_else(|| invalid("\\x needs two hex digits".into()))?;
                self.pos += 2;
                out.push(byte);
            }
            b'u' => {
                if self.peek() != Some(b'{') {
                    return Err(invalid("\\u needs '{'".into()));
                }
                self.pos += 1;
                let digits_start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
                let text = std::str::from_utf8(&self.src[digits_start..self.pos])
                    .unwrap_or_default()
                    .to_string();
                if self.peek() != Some(b'}') || text.is_empty() {
                    return Err(invalid("\\u needs hex digits and '}'".into()));
                }
                self.pos += 1;
                let c = u32::from_str_radix(&text, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(format!("\\u{{{}}} is not a character", text)))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            b if b.is_ascii_digit() => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d) if d.is_ascii_digit() => {
                            value = value * 10 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| invalid(format!("decimal escape {} is too large", value)))?;
                out.push(byte);
            }
            other => {
                return Err(invalid(format!(
                    "unknown escape '\\{}'",
                    char::from(other).escape_default()
                )))
            }
        }
        Ok(())
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
            self.skip_trivia()?;
        }

        let digits_start = self.pos;
        let malformed = |p: &Self| ParseError::InvalidNumber {
            text: String::from_utf8_lossy(&p.src[start..p.pos]).into_owned(),
            at: p.position_at(start),
        };

        let value = if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            let hex_start = self.pos;
            while matches!(self.peek(), Some(b) if b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let text = std::str::from_utf8(&self.src[hex_start..self.pos]).unwrap_or_default();
            // Hex literals wrap into the signed range.
            let raw = u64::from_str_radix(text, 16).map_err(|_| malformed(self))?;
            let v = raw as i64;
            Value::Int(if negative { v.wrapping_neg() } else { v })
        } else {
            let mut is_float = false;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.peek() == Some(b'.') {
                is_float = true;
                self.pos += 1;
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek(), Some(b'e' | b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }

            let text = std::str::from_utf8(&self.src[digits_start..self.pos])
                .unwrap_or_default()
                .to_string();
            if !text.bytes().any(|b| b.is_ascii_digit()) {
                return Err(malformed(self));
            }

            if is_float {
                let f: f64 = text.parse().map_err(|_| malformed(self))?;
                Value::Float(if negative { -f } else { f })
            } else {
                match text.parse::<u64>() {
                    Ok(v) if !negative && v <= i64::MAX as u64 => Value::Int(v as i64),
                    Ok(v) if negative && v <= i64::MAX as u64 + 1 => {
                        Value::Int((-(i128::from(v))) as i64)
                    }
                    // Out of integer range: becomes a float.
                    _ => {
                        let f: f64 = text.parse().map_err(|_| malformed(self))?;
                        Value::Float(if negative { -f } else { f })
                    }
                }
            }
        };

        if matches!(self.peek(), Some(b) if is_ident_byte(b) || b == b'.') {
            while matches!(self.peek(), Some(b) if is_ident_byte(b) || b == b'.') {
                self.pos += 1;
            }
            return Err(malformed(self));
        }

        Ok(value)
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
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
        assert_eq!(parse("42").unwrap(), Value::Int(42));
        assert_eq!(parse("-7").unwrap(), Value::Int(-7));
        assert_eq!(parse("- 7").unwrap(), Value::Int(-7));
        assert_eq!(parse("1.5").unwrap(), Value::Float(1.5));
        assert_eq!(parse(".5").unwrap(), Value::Float(0.5));
        assert_eq!(parse("3.").unwrap(), Value::Float(3.0));
        assert_eq!(parse("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(parse("2.5E-1").unwrap(), Value::Float(0.25));
        assert_eq!(parse("0x1F").unwrap(), Value::Int(31));
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
    }

    #[test]
    fn integer_extremes() {
        assert_eq!(
            parse("9223372036854775807").unwrap(),
            Value::Int(i64::MAX)
        );
        assert_eq!(
            parse("-9223372036854775808").unwrap(),
            Value::Int(i64::MIN)
        );
        assert_eq!(
            parse("9223372036854775808").unwrap(),
            Value::Float(9223372036854775808.0)
        );
    }

    #[test]
    fn malformed_numbers() {
        assert!(matches!(
            parse("12abc"),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(parse("1.2.3"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(parse("-"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(parse("0x"), Err(ParseError::InvalidNumber { .. })));
    }

    #[test]
    fn strings_and_escapes() {
        assert_eq!(parse(r#""a\"b""#).unwrap(), Value::from("a\"b"));
        assert_eq!(parse(r"'it\'s'").unwrap(), Value::from("it's"));
        assert_eq!(parse(r#""\n\t\r\\""#).unwrap(), Value::from("\n\t\r\\"));
        assert_eq!(parse(r#""\027[0m""#).unwrap(), Value::from("\u{1b}[0m"));
        assert_eq!(parse(r#""\65\066""#).unwrap(), Value::from("AB"));
        assert_eq!(parse(r#""\x41""#).unwrap(), Value::from("A"));
        assert_eq!(parse(r#""\u{e9}""#).unwrap(), Value::from("é"));
        assert_eq!(parse("\"a\\z   \n  b\"").unwrap(), Value::from("ab"));
        assert_eq!(parse("\"a\\\nb\"").unwrap(), Value::from("a\nb"));
    }

    #[test]
    fn bad_escapes() {
        assert!(matches!(parse(r#""\q""#), Err(ParseError::InvalidEscape { .. })));
        assert!(matches!(parse(r#""\256""#), Err(ParseError::InvalidEscape { .. })));
        assert!(matches!(parse(r#""\xZZ""#), Err(ParseError::InvalidEscape { .. })));
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert!(matches!(parse(r#""\255""#), Err(ParseError::InvalidUtf8 { .. })));
    }

    #[test]
    fn unterminated_string() {
        assert!(matches!(
            parse("\"abc"),
            Err(ParseError::Unterminated { what: "string", .. })
        ));
        assert!(matches!(
            parse("\"abc\ndef\""),
            Err(ParseError::Unterminated { .. })
        ));
    }

    #[test]
    fn long_strings() {
        assert_eq!(parse("[[raw \\n]]").unwrap(), Value::from("raw \\n"));
        assert_eq!(parse("[==[a]]b]==]").unwrap(), Value::from("a]]b"));
        assert_eq!(parse("[[\nfirst\nsecond]]").unwrap(), Value::from("first\nsecond"));
        assert!(matches!(
            parse("[[never closed"),
            Err(ParseError::Unterminated { .. })
        ));
    }

    #[test]
    fn tables() {
        assert_eq!(parse("{}").unwrap(), Value::table());
        assert_eq!(
            parse("{ 'a', 'b'; 'c', }").unwrap(),
            Value::Table(list(["a", "b", "c"]))
        );
        assert_eq!(
            parse("{ x = 1, [\"y z\"] = true, [10] = 'ten' }").unwrap(),
            Value::Table(table(vec![
                (Key::from("x"), Value::Int(1)),
                (Key::from("y z"), Value::Bool(true)),
                (Key::Index(10), Value::from("ten")),
            ]))
        );
    }

    #[test]
    fn positional_and_keyed_mix() {
        let t = parse("{ 'a', n = 1, 'b' }").unwrap();
        assert_eq!(
            t,
            Value::Table(table(vec![
                (Key::Index(1), Value::from("a")),
                (Key::Index(2), Value::from("b")),
                (Key::from("n"), Value::Int(1)),
            ]))
        );
    }

    #[test]
    fn integral_float_keys_normalize() {
        let t = parse("{ [2.0] = 'x' }").unwrap();
        assert_eq!(
            t,
            Value::Table(table(vec![(Key::Index(2), Value::from("x"))]))
        );
    }

    #[test]
    fn unsupported_keys_rejected() {
        for input in ["{ [true] = 1 }", "{ [1.5] = 1 }", "{ [{}] = 1 }"] {
            assert!(
                matches!(parse(input), Err(ParseError::Unsupported { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let t = parse("{ a = 1, a = 2 }").unwrap();
        assert_eq!(
            t,
            Value::Table(table(vec![(Key::from("a"), Value::Int(2))]))
        );
    }

    #[test]
    fn code_is_rejected() {
        for input in [
            "nil",
            "os.exit()",
            "{ f = function() end }",
            "{ a = 1 + 2 }",
            "{ a = nil }",
            "print 'x'",
        ] {
            assert!(parse(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn comments_are_skipped() {
        let input = "-- header\n{ --[[ block\n comment ]] a = 1, -- trailing\n b = 2 }";
        let t = parse(input).unwrap();
        assert_eq!(
            t,
            Value::Table(table(vec![
                (Key::from("a"), Value::Int(1)),
                (Key::from("b"), Value::Int(2)),
            ]))
        );
    }

    #[test]
    fn trailing_garbage_rejected() {
        assert!(matches!(parse("{} {}"), Err(ParseError::Unexpected { .. })));
    }

    #[test]
    fn missing_separator_rejected() {
        let err = parse("{ 1 2 }").unwrap_err();
        assert!(err.to_string().contains("expected ',' or '}'"), "{err}");
    }

    #[test]
    fn error_positions_are_one_based() {
        let err = parse("{\n  a = ?\n}").unwrap_err();
        match err {
            ParseError::Unexpected { at, .. } => {
                assert_eq!(at, Position { line: 2, column: 7 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}{}", "{".repeat(MAX_DEPTH + 1), "}".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse(&deep), Err(ParseError::TooDeep { .. })));

        let ok = format!("{}{}", "{".repeat(MAX_DEPTH), "}".repeat(MAX_DEPTH));
        assert!(parse(&ok).is_ok());
    }

    #[test]
    fn file_form() {
        let t = parse_file("return {\n  [\"a\"] = 1,\n}\n").unwrap();
        assert_eq!(t, table(vec![(Key::from("a"), Value::Int(1))]));

        // `return` is optional and a trailing semicolon is tolerated
        assert_eq!(parse_file("{};").unwrap(), Table::new());
    }

    #[test]
    fn file_must_be_a_table() {
        assert!(matches!(
            parse_file("return 5"),
            Err(ParseError::Unexpected { expected: "table", .. })
        ));
        assert!(matches!(
            parse_file(""),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(parse_file("returnx {}").is_err());
    }
}
