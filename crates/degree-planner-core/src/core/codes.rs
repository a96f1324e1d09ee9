// crates/degree-planner-core/src/core/codes.rs
// ============================================================================
// Module: Part and Course Codes
// Description: Helpers for dotted part identifiers and course code fields.
// Purpose: Keep part-path and course-code parsing in one place.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Parts are dotted hierarchical identifiers (`A`, `A.1`, `B.2.3`). The empty
//! string is the root and covers every part. Descendant checks respect
//! segment boundaries, so `B.1` does not cover `B.10`.
//!
//! Course codes carry a four-letter discipline prefix and a level digit in
//! the fifth position (`CSSE2310` is discipline `CSSE`, level 2).

// ============================================================================
// SECTION: Part Identifiers
// ============================================================================

/// Separator between part segments.
pub const PART_SEPARATOR: char = '.';

/// Returns true when `part` is a strict dotted descendant of `ancestor`.
///
/// Every non-empty part descends from the root (`""`).
#[must_use]
pub fn is_strict_descendant(ancestor: &str, part: &str) -> bool {
    if ancestor.is_empty() {
        return !part.is_empty();
    }
    part.strip_prefix(ancestor).is_some_and(|rest| rest.starts_with(PART_SEPARATOR))
}

/// Returns true when `part` equals `ancestor` or descends from it.
#[must_use]
pub fn covers(ancestor: &str, part: &str) -> bool {
    ancestor == part || is_strict_descendant(ancestor, part)
}

/// Joins a prefix and a relative part into an absolute part.
#[must_use]
pub fn join_part(prefix: &str, part: &str) -> String {
    match (prefix.is_empty(), part.is_empty()) {
        (true, _) => part.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}{PART_SEPARATOR}{part}"),
    }
}

/// Splits a part into its dotted segments; the root has none.
pub fn segments(part: &str) -> impl Iterator<Item = &str> {
    part.split(PART_SEPARATOR).filter(|segment| !segment.is_empty())
}

// ============================================================================
// SECTION: Course Codes
// ============================================================================

/// Returns the level digit of a course code, if well formed.
#[must_use]
pub fn course_level(code: &str) -> Option<u32> {
    code.chars().nth(4)?.to_digit(10)
}

/// Returns the four-character discipline prefix of a course code.
///
/// Codes shorter than four characters are their own discipline.
#[must_use]
pub fn discipline(code: &str) -> &str {
    code.char_indices().nth(4).map_or(code, |(index, _)| &code[.. index])
}

// ============================================================================
// SECTION: Tests
// ============================================================================
