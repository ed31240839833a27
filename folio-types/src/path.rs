//! Property paths for dynamic document access.
//!
//! A path is a dot-separated list of property names, e.g. `Body.Text`.
//! Segments are interpreted by whoever walks the document: inside a mapping a
//! segment is a key, inside a sequence a segment must parse as an index
//! (`Items.0.Title`). Parsing normalizes stray dots instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Normalizes a path string by dropping empty segments.
///
/// - `""` and `"..."` → `""` (the element itself)
/// - `".Body"` / `"Body."` → `"Body"`
/// - `"Body..Text"` → `"Body.Text"`
pub fn normalize_path(input: &str) -> String {
    input
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// An owned, normalized property path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// The empty path, addressing the element itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses and normalizes a dotted path. Never fails.
    pub fn parse(input: &str) -> Self {
        Self {
            segments: input
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Appends one property name. Names containing a dot are rejected because
    /// they could not be addressed again through [`PropertyPath::parse`].
    pub fn push(&mut self, name: impl Into<String>) -> crate::Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidPathComponent {
                component: name,
                reason: "component is empty".into(),
            });
        }
        if name.contains('.') {
            return Err(Error::InvalidPathComponent {
                component: name,
                reason: "component contains '.'".into(),
            });
        }
        self.segments.push(name);
        Ok(())
    }

    /// Returns a new path with `name` appended.
    pub fn join(&self, name: impl Into<String>) -> crate::Result<Self> {
        let mut path = self.clone();
        path.push(name)?;
        Ok(path)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments; the traversal depth of this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Splits into `(parent, last)`; `None` for the root path.
    pub fn split_last(&self) -> Option<(PropertyPath, &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            PropertyPath {
                segments: parent.to_vec(),
            },
            last.as_str(),
        ))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for PropertyPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for PropertyPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for PropertyPath {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&String> for PropertyPath {
    fn from(value: &String) -> Self {
        Self::parse(value)
    }
}

impl From<&PropertyPath> for PropertyPath {
    fn from(value: &PropertyPath) -> Self {
        value.clone()
    }
}

impl From<PropertyPath> for String {
    fn from(value: PropertyPath) -> Self {
        value.to_string()
    }
}
