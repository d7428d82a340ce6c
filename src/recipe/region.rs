//! Named capture regions in free-form recipe text.
//!
//! A region is an assignment located by a regex whose first capture group
//! is the assigned value. Matchers report every match so that callers can
//! insist on exactly one.

use crate::error::{PatchErrorKind, RecipeError, Result};
use regex::Regex;

/// Half-open byte interval `[start, end)` within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether the two intervals share at least one byte.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(m: regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }
}

/// A located region: the whole assignment and its captured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    /// Full match, delimiters and marker comment included
    pub span: Span,
    /// Captured value only
    pub value: Span,
}

impl Region {
    /// The captured value text within `doc`.
    pub fn value_in<'d>(&self, doc: &'d str) -> &'d str {
        &doc[self.value.start..self.value.end]
    }
}

/// Finds one kind of region.
#[derive(Debug, Clone)]
pub struct RegionMatcher {
    name: &'static str,
    pattern: &'static Regex,
}

impl RegionMatcher {
    /// `pattern` must have a capture group 1 holding the value.
    pub const fn new(name: &'static str, pattern: &'static Regex) -> Self {
        Self { name, pattern }
    }

    /// Every match in `doc`, in document order.
    pub fn find_all(&self, doc: &str) -> Vec<Region> {
        self.pattern
            .captures_iter(doc)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let value = caps.get(1)?;
                Some(Region {
                    name: self.name,
                    span: whole.into(),
                    value: value.into(),
                })
            })
            .collect()
    }

    /// The single match in `doc`.
    ///
    /// Zero matches is `RegionNotFound`, more than one is `DuplicateRegion`.
    pub fn find_unique(&self, doc: &str) -> Result<Region> {
        let mut regions = self.find_all(doc);
        match regions.len() {
            0 => Err(RecipeError::patch(
                "scanning recipe",
                PatchErrorKind::RegionNotFound(self.name.to_string()),
            )),
            1 => Ok(regions.remove(0)),
            count => Err(RecipeError::patch(
                "scanning recipe",
                PatchErrorKind::DuplicateRegion {
                    region: self.name.to_string(),
                    count,
                },
            )),
        }
    }
}
