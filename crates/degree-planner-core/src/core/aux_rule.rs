// crates/degree-planner-core/src/core/aux_rule.rs
// ============================================================================
// Module: Auxiliary Rules
// Description: Constraint rules attached to degree parts.
// Purpose: Define the closed `AR*` rule family and its stored JSON shape.
// Dependencies: serde, crate::core::{refs, rule_family}
// ============================================================================

//! ## Overview
//! Auxiliary rules constrain a plan beyond course selection: unit limits per
//! level, program combinations, credit exclusions, and substitutions. Each
//! rule is stored as an object tagged by `type` (`"AR1"` ... `"AR20"`);
//! unrecognised tags decode to [`AuxiliaryRule::Unknown`].
//!
//! Evaluation lives in `crate::runtime::aux_eval`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::refs::CourseRef;
use crate::core::refs::ProgramRef;
use crate::core::rule_family::rule_family;

/// Serde default for `or_higher`.
const fn default_true() -> bool {
    true
}

// ============================================================================
// SECTION: Level Rules
// ============================================================================

/// At least `n` units at `level` (or higher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar1 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Minimum units.
    pub n: u32,
    /// Course level.
    pub level: u32,
    /// Whether higher levels count.
    #[serde(default = "default_true")]
    pub or_higher: bool,
}

/// At most `n` units at exactly `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar2 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Maximum units.
    pub n: u32,
    /// Course level.
    pub level: u32,
}

/// Exactly `n` units at `level` (or higher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar3 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Required units.
    pub n: u32,
    /// Course level.
    pub level: u32,
    /// Whether higher levels count.
    #[serde(default = "default_true")]
    pub or_higher: bool,
}

/// Between `n` and `m` units at `level` (or higher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar4 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Minimum units.
    pub n: u32,
    /// Maximum units.
    pub m: u32,
    /// Course level.
    pub level: u32,
    /// Whether higher levels count.
    #[serde(default = "default_true")]
    pub or_higher: bool,
}

// ============================================================================
// SECTION: Program Combination Rules
// ============================================================================

/// Programs in `plan_list_1` only together with one of `plan_list_2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar5 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Triggering programs.
    #[serde(default)]
    pub plan_list_1: Vec<ProgramRef>,
    /// Required companion programs.
    #[serde(default)]
    pub plan_list_2: Vec<ProgramRef>,
}

/// Programs in `plan_list_1` never together with any of `plan_list_2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar6 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Triggering programs.
    #[serde(default)]
    pub plan_list_1: Vec<ProgramRef>,
    /// Forbidden companion programs.
    #[serde(default)]
    pub plan_list_2: Vec<ProgramRef>,
}

/// No more than `n` units from one discipline prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar7 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Maximum units per discipline.
    pub n: u32,
}

// ============================================================================
// SECTION: Credit Rules
// ============================================================================

/// No credit for `course_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar9 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Excluded courses.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
}

/// No credit for `course_list` when completing a program in `plan_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar10 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Excluded courses.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// Programs that trigger the exclusion.
    #[serde(default)]
    pub plan_list: Vec<ProgramRef>,
}

/// No credit for `course_list` unless completing a program in `plan_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar11 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Restricted courses.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// Programs that permit the courses.
    #[serde(default)]
    pub plan_list: Vec<ProgramRef>,
}

/// Students in `plan_list` are exempt from `course_list` in `program_plan_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar13 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Exempt programs.
    #[serde(default)]
    pub plan_list: Vec<ProgramRef>,
    /// Exempted courses.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// Programs the exemption applies in.
    #[serde(default)]
    pub program_plan_list: Vec<ProgramRef>,
}

// ============================================================================
// SECTION: Substitution Rules
// ============================================================================

/// `course_list` MUST/MAY be substituted in `program_plan_list` by a course
/// from the named `lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar15 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Courses to substitute.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// MUST when true, MAY otherwise.
    #[serde(default)]
    pub must: bool,
    /// Programs the substitution applies in.
    #[serde(default)]
    pub program_plan_list: Vec<ProgramRef>,
    /// Names of the substitute course lists.
    #[serde(default)]
    pub lists: Vec<String>,
}

/// For `plan_list`, `course_list_1` MUST/MAY be substituted by
/// `course_list_2` in `program_plan_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar16 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Programs the rule is scoped to; empty means every plan.
    #[serde(default)]
    pub plan_list: Vec<ProgramRef>,
    /// Courses to substitute.
    #[serde(default)]
    pub course_list_1: Vec<CourseRef>,
    /// MUST when true, MAY otherwise.
    #[serde(default)]
    pub must: bool,
    /// Substitute courses.
    #[serde(default)]
    pub course_list_2: Vec<CourseRef>,
    /// Programs the substitution applies in.
    #[serde(default)]
    pub program_plan_list: Vec<ProgramRef>,
}

/// For `plan_list`, `course_list` MUST/MAY be substituted by a course from
/// the named `lists` in `program_plan_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar17 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Programs the rule is scoped to; empty means every plan.
    #[serde(default)]
    pub plan_list: Vec<ProgramRef>,
    /// Courses to substitute.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// MUST when true, MAY otherwise.
    #[serde(default)]
    pub must: bool,
    /// Programs the substitution applies in.
    #[serde(default)]
    pub program_plan_list: Vec<ProgramRef>,
    /// Names of the substitute course lists.
    #[serde(default)]
    pub lists: Vec<String>,
}

// ============================================================================
// SECTION: Component Rules
// ============================================================================

/// `course_list` only counts towards the `program` component of a dual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar18 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Restricted courses.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// Component the courses count towards.
    pub program: ProgramRef,
}

/// For `plan_list`, `course_list` only counts towards the `program` component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar19 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Degrees the rule is scoped to.
    #[serde(default)]
    pub plan_list: Vec<ProgramRef>,
    /// Restricted courses.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// Component the courses count towards.
    pub program: ProgramRef,
}

/// For `plan_1` with `plan_list_1`, `course_list` only counts towards
/// `plan_list_2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ar20 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Degree the rule is scoped to.
    pub plan_1: ProgramRef,
    /// Programs that trigger the restriction.
    #[serde(default)]
    pub plan_list_1: Vec<ProgramRef>,
    /// Restricted courses.
    #[serde(default)]
    pub course_list: Vec<CourseRef>,
    /// Programs the courses count towards.
    #[serde(default)]
    pub plan_list_2: Vec<ProgramRef>,
}

// ============================================================================
// SECTION: Rule Family
// ============================================================================

rule_family! {
    /// Auxiliary rule attached to a degree part.
    ///
    /// # Invariants
    /// - Every variant carries `part`.
    /// - `Unknown` round-trips its original document.
    pub enum AuxiliaryRule via TaggedAuxiliaryRule, TaggedAuxiliaryRuleRef {
        /// At least N units at a level.
        Ar1(Ar1) = "AR1",
        /// At most N units at a level.
        Ar2(Ar2) = "AR2",
        /// Exactly N units at a level.
        Ar3(Ar3) = "AR3",
        /// N to M units at a level.
        Ar4(Ar4) = "AR4",
        /// Program only with companion.
        Ar5(Ar5) = "AR5",
        /// Program not with companion.
        Ar6(Ar6) = "AR6",
        /// Discipline unit cap.
        Ar7(Ar7) = "AR7",
        /// No credit.
        Ar9(Ar9) = "AR9",
        /// No credit when completing a program.
        Ar10(Ar10) = "AR10",
        /// No credit unless completing a program.
        Ar11(Ar11) = "AR11",
        /// Exemption.
        Ar13(Ar13) = "AR13",
        /// Substitution from named lists.
        Ar15(Ar15) = "AR15",
        /// Scoped substitution by a course list.
        Ar16(Ar16) = "AR16",
        /// Scoped substitution from named lists.
        Ar17(Ar17) = "AR17",
        /// Dual component restriction.
        Ar18(Ar18) = "AR18",
        /// Scoped component restriction.
        Ar19(Ar19) = "AR19",
        /// Scoped program-list restriction.
        Ar20(Ar20) = "AR20",
    }
}
