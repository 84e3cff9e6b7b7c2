//! Property paths: positions in an instance graph addressed from a named root.
//!
//! A path renders in two forms: the exact form keeps collection indices
//! (`car.wheels[1].diameter`) and the erased form drops them
//! (`car.wheels.diameter`). Matching against user-supplied keys always uses
//! the lower-cased form of either.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Property(String),
    Index(usize),
}

/// A position in an instance graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    root: String,
    segments: Vec<Segment>,
}

impl PropertyPath {
    /// Create a path at the given root name.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            root: name.into(),
            segments: Vec::new(),
        }
    }

    /// Create the root path for a type: its name with the first letter lower-cased.
    pub fn for_type(type_name: &str) -> Self {
        Self::root(decapitalize(type_name))
    }

    /// The root name.
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Extend this path with a property name.
    pub fn child(&self, property: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Property(property.to_string()));
        Self {
            root: self.root.clone(),
            segments,
        }
    }

    /// Extend this path with a collection index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self {
            root: self.root.clone(),
            segments,
        }
    }

    /// The last property name on this path, if any.
    pub fn property_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            Segment::Property(name) => Some(name.as_str()),
            Segment::Index(_) => None,
        })
    }

    /// Whether the path ends in a collection index.
    pub fn is_indexed(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Index(_)))
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Exact form, with indices: `car.wheels[1].diameter`.
    pub fn exact(&self) -> String {
        self.render(true)
    }

    /// Erased form, without indices: `car.wheels.diameter`.
    pub fn erased(&self) -> String {
        self.render(false)
    }

    /// Lower-cased exact form, used for matching.
    pub fn exact_key(&self) -> String {
        self.exact().to_lowercase()
    }

    /// Lower-cased erased form, used for matching.
    pub fn erased_key(&self) -> String {
        self.erased().to_lowercase()
    }

    /// Whether this path lies strictly below `parent_key` (a lower-cased
    /// path), either form matching.
    pub fn is_child_of(&self, parent_key: &str) -> bool {
        is_strict_child(&self.exact_key(), parent_key) || is_strict_child(&self.erased_key(), parent_key)
    }

    fn render(&self, with_indices: bool) -> String {
        let mut out = self.root.clone();
        for segment in &self.segments {
            match segment {
                Segment::Property(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                Segment::Index(i) if with_indices => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
                Segment::Index(_) => {}
            }
        }
        out
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exact())
    }
}

/// Normalize a user-supplied property or path key for matching.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

fn is_strict_child(path: &str, parent: &str) -> bool {
    path.len() > parent.len()
        && path.starts_with(parent)
        && matches!(path.as_bytes()[parent.len()], b'.' | b'[')
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
