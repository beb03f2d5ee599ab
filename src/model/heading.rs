//! Heading and outline types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse three-tier heading depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Section heading
    H2,
    /// Subsection heading
    H3,
}

impl HeadingLevel {
    /// Map a 1-based nesting depth onto a heading level.
    ///
    /// Depths outside `1..=3` have no level.
    pub fn from_depth(depth: u32) -> Option<Self> {
        match depth {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    /// 1-based nesting depth.
    pub fn depth(self) -> u32 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Label used in output records.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single inferred heading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Ordered list of headings.
///
/// Discovery order until [`crate::outline::OutlineProcessor`] finalizes it;
/// afterwards sorted by page with no duplicate `(level, text, page)` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outline {
    headings: Vec<Heading>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a heading.
    pub fn push(&mut self, heading: Heading) {
        self.headings.push(heading);
    }

    /// Append every heading from an iterator.
    pub fn extend(&mut self, headings: impl IntoIterator<Item = Heading>) {
        self.headings.extend(headings);
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Iterate over the headings in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Heading> {
        self.headings.iter()
    }

    /// Borrow the headings as a slice.
    pub fn as_slice(&self) -> &[Heading] {
        &self.headings
    }

    /// Consume the outline, returning its headings.
    pub fn into_vec(self) -> Vec<Heading> {
        self.headings
    }
}

impl From<Vec<Heading>> for Outline {
    fn from(headings: Vec<Heading>) -> Self {
        Self { headings }
    }
}

impl FromIterator<Heading> for Outline {
    fn from_iter<I: IntoIterator<Item = Heading>>(iter: I) -> Self {
        Self {
            headings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a Heading;
    type IntoIter = std::slice::Iter<'a, Heading>;

    fn into_iter(self) -> Self::IntoIter {
        self.headings.iter()
    }
}

impl IntoIterator for Outline {
    type Item = Heading;
    type IntoIter = std::vec::IntoIter<Heading>;

    fn into_iter(self) -> Self::IntoIter {
        self.headings.into_iter()
    }
}
