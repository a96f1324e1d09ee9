// crates/part-logic/src/requirement.rs
// ============================================================================
// Module: Requirement Tree
// Description: Boolean composition over part references.
// Purpose: Define `Requirement`, its canonical rendering, and traversal helpers.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! A [`Requirement`] is the parsed form of one rule-logic entry. Interior
//! nodes are n-ary `And` / `Or`; leaves are raw part or course identifiers.
//! `Other` carries text that could not be parsed so that callers keep the
//! original input instead of losing it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix that marks a part reference in rule-logic text.
pub const PART_PREFIX: &str = "Part ";

// ============================================================================
// SECTION: Requirement Definition
// ============================================================================

/// Child list used by the n-ary boolean nodes.
pub type Children = SmallVec<[Box<Requirement>; 4]>;

/// Parsed requirement expression.
///
/// Serialises adjacently tagged as `{"kind": ..., "value": ...}` so stored
/// trees stay readable by non-Rust consumers.
///
/// # Invariants
/// - Trees produced by the parser never contain single-child `And` / `Or`.
/// - `Other` is only produced by [`crate::dsl::parse_or_other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Requirement {
    /// Every child must hold.
    And(Children),
    /// At least one child must hold.
    Or(Children),
    /// A single identifier, e.g. `Part A.1` or `CSSE2310`.
    Atomic(String),
    /// Raw text that could not be parsed.
    Other(String),
}

// ============================================================================
// SECTION: Constructors
// ============================================================================

impl Requirement {
    /// Builds an `And` node, collapsing a single child to itself.
    #[must_use]
    pub fn and(children: Vec<Self>) -> Self {
        Self::collapse(children, Self::And)
    }

    /// Builds an `Or` node, collapsing a single child to itself.
    #[must_use]
    pub fn or(children: Vec<Self>) -> Self {
        Self::collapse(children, Self::Or)
    }

    /// Builds an atomic leaf.
    #[must_use]
    pub fn atomic(value: impl Into<String>) -> Self {
        Self::Atomic(value.into())
    }

    /// Builds an unparseable leaf carrying the raw input.
    #[must_use]
    pub fn other(raw: impl Into<String>) -> Self {
        Self::Other(raw.into())
    }

    /// Shared collapse logic for the n-ary constructors.
    fn collapse(mut children: Vec<Self>, build: fn(Children) -> Self) -> Self {
        if children.len() == 1
            && let Some(only) = children.pop()
        {
            return only;
        }
        build(children.into_iter().map(Box::new).collect())
    }
}

// ============================================================================
// SECTION: Inspection Helpers
// ============================================================================

impl Requirement {
    /// Returns true for `And` / `Or` nodes.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }

    /// Returns the maximum depth of the tree (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(|child| child.depth()).max().unwrap_or(0)
            }
            Self::Atomic(_) | Self::Other(_) => 1,
        }
    }

    /// Collects atomic values in first-occurrence order without duplicates.
    #[must_use]
    pub fn atoms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    /// Walks the tree and appends atomic values.
    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Atomic(value) => {
                if !out.contains(&value.as_str()) {
                    out.push(value);
                }
            }
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_atoms(out);
                }
            }
            Self::Other(_) => {}
        }
    }
}

/// Removes a leading `Part ` marker from an atomic identifier.
///
/// The comparison is case-insensitive and tolerates repeated whitespace, so
/// `"part   B.1"` yields `"B.1"`. Identifiers without the marker are returned
/// unchanged.
#[must_use]
pub fn strip_part_prefix(value: &str) -> &str {
    let trimmed = value.trim();
    let Some(head) = trimmed.get(.. 4) else {
        return trimmed;
    };
    if !head.eq_ignore_ascii_case("part") {
        return trimmed;
    }
    let rest = &trimmed[4 ..];
    if rest.starts_with(char::is_whitespace) { rest.trim_start() } else { trimmed }
}

// ============================================================================
// SECTION: Canonical Rendering
// ============================================================================

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic(value) | Self::Other(value) => f.write_str(value),
            Self::And(children) => write_joined(f, children, " and ", false),
            Self::Or(children) => write_joined(f, children, " or ", true),
        }
    }
}

/// Writes children separated by `separator`, parenthesising where needed.
///
/// An `And` child of an `Or` binds tighter and needs no parentheses; every
/// other compound child is wrapped so re-parsing preserves the tree shape.
fn write_joined(
    f: &mut fmt::Formatter<'_>,
    children: &Children,
    separator: &str,
    parent_is_or: bool,
) -> fmt::Result {
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        let bare =
            !child.is_compound() || (parent_is_or && matches!(**child, Requirement::And(_)));
        if bare {
            write!(f, "{child}")?;
        } else {
            write!(f, "({child})")?;
        }
    }
    Ok(())
}
