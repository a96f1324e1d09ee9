// crates/degree-planner-core/src/core/plan.rs
// ============================================================================
// Module: Student Plan
// Description: A student's chosen courses, term placements, and programs.
// Purpose: Provide the read-only input every validation runs against.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Plan`] is supplied by the caller and borrowed read-only for a whole
//! validation. Course codes are not checked on construction; malformed codes
//! surface as results of the level rules.
//!
//! Term placements serialise as an array of `{year, semester, courses}`
//! entries because JSON object keys cannot be tuples.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

// ============================================================================
// SECTION: Terms
// ============================================================================

/// Teaching period a course is placed in.
///
/// # Invariants
/// - Orders chronologically: by year, then semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Calendar year.
    pub year: u32,
    /// Semester within the year.
    pub semester: u32,
}

impl Term {
    /// Creates a term.
    #[must_use]
    pub const fn new(year: u32, semester: u32) -> Self {
        Self {
            year,
            semester,
        }
    }
}

/// Serialised form of one term placement.
#[derive(Serialize, Deserialize)]
struct TermEntry {
    /// Calendar year.
    year: u32,
    /// Semester within the year.
    semester: u32,
    /// Course codes placed in the term.
    courses: Vec<String>,
}

/// Writes term placements as an array of entries.
fn serialize_terms<S>(terms: &BTreeMap<Term, Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let entries: Vec<TermEntry> = terms
        .iter()
        .map(|(term, courses)| TermEntry {
            year: term.year,
            semester: term.semester,
            courses: courses.clone(),
        })
        .collect();
    entries.serialize(serializer)
}

/// Reads term placements; repeated terms are merged in input order.
fn deserialize_terms<'de, D>(deserializer: D) -> Result<BTreeMap<Term, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<TermEntry>::deserialize(deserializer)?;
    let mut terms: BTreeMap<Term, Vec<String>> = BTreeMap::new();
    for entry in entries {
        terms.entry(Term::new(entry.year, entry.semester)).or_default().extend(entry.courses);
    }
    Ok(terms)
}

// ============================================================================
// SECTION: Plan
// ============================================================================

/// A student's course plan.
///
/// # Invariants
/// - `specialisations` iterates in sorted part order.
/// - `course_reqs` is carried for callers; validation never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Display name of the plan.
    #[serde(default)]
    pub name: String,
    /// Chosen course codes in plan order.
    #[serde(default)]
    pub courses: Vec<String>,
    /// Courses placed per term.
    #[serde(
        default,
        serialize_with = "serialize_terms",
        deserialize_with = "deserialize_terms"
    )]
    pub course_dates: BTreeMap<Term, Vec<String>>,
    /// Courses the student allocated to each part.
    #[serde(default)]
    pub course_reqs: BTreeMap<String, Vec<String>>,
    /// Degree program code.
    #[serde(default)]
    pub degree: String,
    /// Chosen program codes keyed by absolute part.
    #[serde(default)]
    pub specialisations: BTreeMap<String, Vec<String>>,
}

impl Plan {
    /// Creates an empty plan for a degree.
    #[must_use]
    pub fn new(name: impl Into<String>, degree: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            degree: degree.into(),
            ..Self::default()
        }
    }

    /// Builds a plan from term placements; courses follow term order.
    #[must_use]
    pub fn from_terms(
        name: impl Into<String>,
        degree: impl Into<String>,
        course_dates: BTreeMap<Term, Vec<String>>,
    ) -> Self {
        let courses = course_dates.values().flatten().cloned().collect();
        Self {
            name: name.into(),
            courses,
            course_dates,
            degree: degree.into(),
            ..Self::default()
        }
    }

    /// Returns the plan with `codes` appended to its course list.
    #[must_use]
    pub fn with_courses<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Returns the plan with `code` chosen under `part`.
    #[must_use]
    pub fn with_specialisation(mut self, part: impl Into<String>, code: impl Into<String>) -> Self {
        self.specialisations.entry(part.into()).or_default().push(code.into());
        self
    }

    /// Returns the programs chosen directly under `part`.
    #[must_use]
    pub fn specialisations_at(&self, part: &str) -> &[String] {
        self.specialisations.get(part).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates every chosen program across all parts.
    pub fn all_specialisations(&self) -> impl Iterator<Item = &str> {
        self.specialisations.values().flatten().map(String::as_str)
    }
}
