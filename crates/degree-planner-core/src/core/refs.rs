// crates/degree-planner-core/src/core/refs.rs
// ============================================================================
// Module: Rule Value Objects
// Description: Course, program, and equivalence references used by rules.
// Purpose: Provide code-matching value objects with legacy-tolerant decoding.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Rules refer to courses and programs through reference objects copied from
//! the handbook. Matching is exact string equality on `code`; every other
//! field is descriptive. Equality and hashing use the code alone.
//!
//! Stored documents come in two shapes: snake_case fields
//! (`org_code`, `units_min`) and the older camelCase ones (`orgCode`,
//! `unitsMinimum`). Both decode to the same value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

// ============================================================================
// SECTION: Course Reference
// ============================================================================

/// Reference to a single course.
///
/// # Invariants
/// - Equality and hashing consider `code` only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseRef {
    /// Course code, e.g. `CSSE2310`.
    pub code: String,
    /// Owning organisation code.
    #[serde(default, alias = "orgCode")]
    pub org_code: String,
    /// Owning organisation name.
    #[serde(default, alias = "orgName")]
    pub org_name: String,
    /// Course title.
    #[serde(default)]
    pub name: String,
    /// Minimum units when the course is variable-credit.
    #[serde(default, alias = "unitsMinimum")]
    pub units_min: Option<f64>,
    /// Maximum units when the course is variable-credit.
    #[serde(default, alias = "unitsMaximum")]
    pub units_max: Option<f64>,
}

impl CourseRef {
    /// Creates a reference carrying only a code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Returns true when `code` is this course.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.code == code
    }
}

impl PartialEq for CourseRef {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for CourseRef {}

impl Hash for CourseRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for CourseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

// ============================================================================
// SECTION: Program Reference
// ============================================================================

/// Reference to a program (degree, major, minor, specialisation).
///
/// # Invariants
/// - Equality and hashing consider `code` only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramRef {
    /// Program code, e.g. `2525`.
    pub code: String,
    /// Owning organisation code.
    #[serde(default, alias = "orgCode")]
    pub org_code: String,
    /// Owning organisation name.
    #[serde(default, alias = "orgName")]
    pub org_name: String,
    /// Program title.
    #[serde(default)]
    pub name: String,
    /// Short program name, e.g. `BCompSc`.
    #[serde(default)]
    pub abbreviation: String,
    /// Minimum units of the program component.
    #[serde(default, alias = "unitsMinimum")]
    pub units_min: Option<f64>,
    /// Maximum units of the program component.
    #[serde(default, alias = "unitsMaximum")]
    pub units_max: Option<f64>,
}

impl ProgramRef {
    /// Creates a reference carrying only a code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Returns true when `code` is this program.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.code == code
    }
}

impl PartialEq for ProgramRef {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ProgramRef {}

impl Hash for ProgramRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for ProgramRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

// ============================================================================
// SECTION: Equivalence Group
// ============================================================================

/// Set of interchangeable courses; any one satisfies the group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceGroup {
    /// Alternatives in handbook order.
    #[serde(deserialize_with = "deserialize_group_courses")]
    pub courses: Vec<CourseRef>,
    /// Free-form handbook notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl EquivalenceGroup {
    /// Creates a group from course codes.
    #[must_use]
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            courses: codes.into_iter().map(CourseRef::new).collect(),
            notes: None,
        }
    }

    /// Returns true when any alternative matches `code`.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.courses.iter().any(|course| course.matches(code))
    }
}

impl fmt::Display for EquivalenceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, course) in self.courses.iter().enumerate() {
            if index > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{course}")?;
        }
        f.write_str(")")
    }
}

/// Group entry as stored: a full reference or a bare course code.
#[derive(Deserialize)]
#[serde(untagged)]
enum GroupEntry {
    /// Bare course code.
    Code(String),
    /// Full course reference.
    Course(CourseRef),
}

/// Decodes group alternatives, accepting bare codes.
fn deserialize_group_courses<'de, D>(deserializer: D) -> Result<Vec<CourseRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<GroupEntry>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            GroupEntry::Code(code) => CourseRef::new(code),
            GroupEntry::Course(course) => course,
        })
        .collect())
}

// ============================================================================
// SECTION: Course Option
// ============================================================================

/// One option of a unit-based selection rule.
///
/// Serialises externally tagged: `{"CourseRef": {...}}` or
/// `{"EquivalenceGroup": {...}}`. Decoding also accepts an untagged course
/// or group object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CourseOption {
    /// A single course.
    CourseRef(CourseRef),
    /// Any one course of a group.
    EquivalenceGroup(EquivalenceGroup),
}

impl CourseOption {
    /// Returns true when `code` satisfies this option.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Self::CourseRef(course) => course.matches(code),
            Self::EquivalenceGroup(group) => group.matches(code),
        }
    }
}

impl From<CourseRef> for CourseOption {
    fn from(value: CourseRef) -> Self {
        Self::CourseRef(value)
    }
}

impl From<EquivalenceGroup> for CourseOption {
    fn from(value: EquivalenceGroup) -> Self {
        Self::EquivalenceGroup(value)
    }
}

impl fmt::Display for CourseOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CourseRef(course) => course.fmt(f),
            Self::EquivalenceGroup(group) => group.fmt(f),
        }
    }
}

/// Externally tagged option shape.
#[derive(Deserialize)]
enum TaggedOption {
    /// Tagged course.
    CourseRef(CourseRef),
    /// Tagged group.
    EquivalenceGroup(EquivalenceGroup),
}

/// Every accepted option shape, tried in order.
#[derive(Deserialize)]
#[serde(untagged)]
enum OptionShape {
    /// `{"CourseRef": {...}}` or `{"EquivalenceGroup": {...}}`.
    Tagged(TaggedOption),
    /// Bare group object (has `courses`).
    Group(EquivalenceGroup),
    /// Bare course object (has `code`).
    Course(CourseRef),
}

impl<'de> Deserialize<'de> for CourseOption {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match OptionShape::deserialize(deserializer)? {
            OptionShape::Tagged(TaggedOption::CourseRef(course)) | OptionShape::Course(course) => {
                Self::CourseRef(course)
            }
            OptionShape::Tagged(TaggedOption::EquivalenceGroup(group))
            | OptionShape::Group(group) => Self::EquivalenceGroup(group),
        })
    }
}
