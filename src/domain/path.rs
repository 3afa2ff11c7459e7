//! Field paths addressing a location inside a document
//!
//! A path is an ordered list of segments: object field names and array
//! indices. Its text form is `items[0].name`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Path Segment
// ============================================================================

/// Segment of a field path
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Object field access: .fieldName
    Field(String),
    /// Array index access: [0], [1], etc.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

// ============================================================================
// Field Path
// ============================================================================

/// Path for nested access (e.g., "report.owner.name" or "items[0].rating")
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create a root path (empty)
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the depth (number of segments)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Extend with a field segment
    pub fn field(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Field(name.to_string()));
        new
    }

    /// Extend with an array index segment
    pub fn index(&self, idx: usize) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Index(idx));
        new
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Get the parent path (without the last segment)
    pub fn parent(&self) -> Self {
        let mut new = self.clone();
        new.segments.pop();
        new
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Path made of the first `len` segments
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Build a [`FieldPath`] from a list of names and indices.
///
/// ```
/// use schema_form::path;
/// let p = path!["items", 0usize, "name"];
/// assert_eq!(p.to_string(), "items[0].name");
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::domain::path::FieldPath::root() };
    ($($seg:expr),+ $(,)?) => {
        $crate::domain::path::FieldPath::from(vec![
            $($crate::domain::path::PathSegment::from($seg)),+
        ])
    };
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathParseError {
    #[error("Unclosed '[' in path '{0}'")]
    UnclosedBracket(String),

    #[error("Invalid array index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },

    #[error("Empty field name in path '{0}'")]
    EmptyField(String),
}

impl FromStr for FieldPath {
    type Err = PathParseError;

    /// Parse `user.address[0].city`. The empty string is the root path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut current = String::new();
        // Set after a ']' so "a[0].b" does not see an empty field before '.'
        let mut after_index = false;
        let mut chars = s.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if current.is_empty() && !after_index {
                        return Err(PathParseError::EmptyField(s.to_string()));
                    }
                    if !current.is_empty() {
                        segments.push(PathSegment::Field(std::mem::take(&mut current)));
                    }
                    after_index = false;
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Field(std::mem::take(&mut current)));
                    }
                    let mut index_str = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        index_str.push(c);
                    }
                    if !closed {
                        return Err(PathParseError::UnclosedBracket(s.to_string()));
                    }
                    let idx = index_str.trim().parse::<usize>().map_err(|_| {
                        PathParseError::InvalidIndex {
                            path: s.to_string(),
                            index: index_str.clone(),
                        }
                    })?;
                    segments.push(PathSegment::Index(idx));
                    after_index = true;
                }
                _ => {
                    current.push(ch);
                    after_index = false;
                }
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Field(current));
        } else if s.ends_with('.') {
            return Err(PathParseError::EmptyField(s.to_string()));
        }

        Ok(Self { segments })
    }
}

// ============================================================================
// Tests
// ============================================================================
