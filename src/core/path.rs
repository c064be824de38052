//! core::path
//!
//! Dotted paths: `a.b.c` names a location in a nested table by walking one
//! string key per segment.
//!
//! # Validation
//!
//! A path must have at least one segment and no segment may be empty, so
//! `""`, `"a..b"`, `".a"` and `"a."` are all rejected. There is no escaping:
//! a key containing a literal `.` cannot be addressed.
//!
//! A path may have at most [`MAX_SEGMENTS`] segments. Together with the
//! root table and one table-valued leaf, that stays within the nesting the
//! literal parser accepts, so anything `set` can build can be read back.
//!
//! # Example
//!
//! ```
//! use dotdb::core::path::DottedPath;
//!
//! let path = DottedPath::parse("player.powers.fireball").unwrap();
//! assert_eq!(path.segments(), ["player", "powers", "fireball"]);
//! assert_eq!(path.last(), "fireball");
//!
//! assert!(DottedPath::parse("").is_err());
//! assert!(DottedPath::parse("a..b").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::literal::MAX_DEPTH;
use super::value::Key;

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Longest accepted path.
pub const MAX_SEGMENTS: usize = MAX_DEPTH - 1;

/// Errors from path parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path cannot be empty")]
    Empty,

    #[error("path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },

    #[error("path has {segments} segments; at most {max} are allowed")]
    TooDeep { segments: usize, max: usize },
}

/// A validated, non-empty dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedPath {
    segments: Vec<String>,
}

impl DottedPath {
    /// Parse a dotted path string.
    ///
    /// # Errors
    ///
    /// Returns `PathError::Empty` for an empty string,
    /// `PathError::EmptySegment` if any segment is empty and
    /// `PathError::TooDeep` for more than [`MAX_SEGMENTS`] segments.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let count = path.split(SEPARATOR).count();
        if count > MAX_SEGMENTS {
            return Err(PathError::TooDeep {
                segments: count,
                max: MAX_SEGMENTS,
            });
        }

        let segments: Vec<String> = path.split(SEPARATOR).map(str::to_string).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
                position,
            });
        }

        Ok(Self { segments })
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.len() > MAX_SEGMENTS {
            return Err(PathError::TooDeep {
                segments: segments.len(),
                max: MAX_SEGMENTS,
            });
        }
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: segments.join("."),
                position,
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// All segments except the last.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The final segment.
    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Segments as table keys.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.segments.iter().map(|s| Key::Name(s.clone()))
    }

    /// Append one segment, returning a new path.
    pub fn join(&self, segment: &str) -> Result<Self, PathError> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self::from_segments(segments)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a parsed path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for DottedPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment() {
        let path = DottedPath::parse("a").unwrap();
        assert_eq!(path.segments(), ["a"]);
        assert!(path.parents().is_empty());
        assert_eq!(path.last(), "a");
    }

    #[test]
    fn splits_on_dots() {
        let path = DottedPath::parse("a.b.c").unwrap();
        assert_eq!(path.parents(), ["a", "b"]);
        assert_eq!(path.last(), "c");
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "a.b.c");
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(DottedPath::parse(""), Err(PathError::Empty));
    }

    #[test]
    fn empty_segments_rejected() {
        for bad in ["a..b", ".a", "a.", "."] {
            assert!(
                matches!(
                    DottedPath::parse(bad),
                    Err(PathError::EmptySegment { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn numeric_segments_are_name_keys() {
        let path = DottedPath::parse("list.1").unwrap();
        let keys: Vec<Key> = path.keys().collect();
        assert_eq!(keys, vec![Key::from("list"), Key::from("1")]);
    }

    #[test]
    fn join_appends() {
        let path = DottedPath::parse("powers").unwrap();
        let joined = path.join("fireball").unwrap();
        assert_eq!(joined.to_string(), "powers.fireball");
        assert!(path.join("").is_err());
    }

    #[test]
    fn from_segments_validates() {
        assert_eq!(
            DottedPath::from_segments(Vec::<String>::new()),
            Err(PathError::Empty)
        );
        assert!(DottedPath::from_segments(["a", ""]).is_err());
        assert_eq!(
            DottedPath::from_segments(["a", "b"]).unwrap().to_string(),
            "a.b"
        );
    }

    fn repeated(count: usize) -> String {
        vec!["a"; count].join(".")
    }

    #[test]
    fn segment_limit() {
        assert_eq!(
            DottedPath::parse(&repeated(MAX_SEGMENTS)).unwrap().len(),
            MAX_SEGMENTS
        );
        assert_eq!(
            DottedPath::parse(&repeated(MAX_SEGMENTS + 1)),
            Err(PathError::TooDeep {
                segments: MAX_SEGMENTS + 1,
                max: MAX_SEGMENTS,
            })
        );
        assert!(matches!(
            DottedPath::parse(&repeated(60_000)),
            Err(PathError::TooDeep { .. })
        ));
    }

    #[test]
    fn join_past_limit_rejected() {
        let full = DottedPath::parse(&repeated(MAX_SEGMENTS)).unwrap();
        assert!(matches!(
            full.join("b"),
            Err(PathError::TooDeep { .. })
        ));
        assert!(matches!(
            DottedPath::from_segments(vec!["a"; MAX_SEGMENTS + 1]),
            Err(PathError::TooDeep { .. })
        ));
    }

    #[test]
    fn from_str_parses() {
        let path: DottedPath = "x.y".parse().unwrap();
        assert_eq!(path.last(), "y");
    }
}
