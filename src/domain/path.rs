//! Field paths into section content (`faq.items[0].question`)

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// `.name`
    Property(String),
    /// `[n]`
    Index(usize),
}

impl PathSegment {
    fn from_token(token: &str) -> Self {
        token
            .parse::<usize>()
            .map(PathSegment::Index)
            .unwrap_or_else(|_| PathSegment::Property(token.to_string()))
    }
}

/// Location of a value inside section content.
///
/// Numeric dotted segments (`steps.2.title`) are read as indexes so paths
/// written in either notation address the same value. The empty path is the
/// content root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    pub fn push_property(&self, name: &str) -> Self {
        self.with(PathSegment::Property(name.to_string()))
    }

    pub fn push_index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    /// The enclosing path; the root is its own parent
    pub fn parent(&self) -> Self {
        let end = self.segments.len().saturating_sub(1);
        Self {
            segments: self.segments[..end].to_vec(),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Name of the last property segment, used as the field key in forms
    pub fn key(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|seg| match seg {
            PathSegment::Property(name) => Some(name.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// Parse `a.b[0].c` or `a.b.0.c`. Empty tokens and malformed
    /// bracket contents are skipped.
    pub fn parse(s: &str) -> Self {
        let segments = s
            .split('.')
            .flat_map(|part| part.split(|c| c == '[' || c == ']'))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(PathSegment::from_token)
            .collect();
        Self { segments }
    }

    /// Read the value at this path, if every segment exists. A numeric
    /// segment applied to an object reads the all-digit key.
    pub fn get<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments.iter().try_fold(value, |current, seg| match (seg, current) {
            (PathSegment::Property(name), _) => current.as_object()?.get(name),
            (PathSegment::Index(idx), Value::Object(obj)) => obj.get(&idx.to_string()),
            (PathSegment::Index(idx), _) => current.as_array()?.get(*idx),
        })
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.segments {
            match seg {
                PathSegment::Property(name) if first => f.write_str(name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
            first = false;
        }
        Ok(())
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for PropertyPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
