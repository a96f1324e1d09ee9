// crates/degree-planner-core/src/core/select_rule.rs
// ============================================================================
// Module: Selection Rules
// Description: "Choose from the following" requirements attached to parts.
// Purpose: Define the closed `SR*` rule family and its stored JSON shape.
// Dependencies: serde, crate::core::{refs, rule_family}
// ============================================================================

//! ## Overview
//! SR1 to SR5 count units of courses chosen from options; SR6 to SR8 count
//! programs chosen under the rule's part. Unrecognised tags decode to
//! [`SelectionRule::Unknown`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::refs::CourseOption;
use crate::core::refs::ProgramRef;
use crate::core::rule_family::rule_family;

// ============================================================================
// SECTION: Unit Selection Rules
// ============================================================================

/// Exactly `n` units covering ALL options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr1 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Required units.
    pub n: u32,
    /// Options; every one must be taken.
    #[serde(default)]
    pub options: Vec<CourseOption>,
}

/// `n` to `m` units covering ALL options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr2 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Minimum units.
    pub n: u32,
    /// Maximum units.
    pub m: u32,
    /// Options; every one must be taken.
    #[serde(default)]
    pub options: Vec<CourseOption>,
}

/// At least `n` units from the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr3 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Minimum units.
    pub n: u32,
    /// Options to choose from.
    #[serde(default)]
    pub options: Vec<CourseOption>,
}

/// `n` to `m` units from the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr4 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Minimum units.
    pub n: u32,
    /// Maximum units.
    pub m: u32,
    /// Options to choose from.
    #[serde(default)]
    pub options: Vec<CourseOption>,
}

/// Exactly `n` units from the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr5 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Required units.
    pub n: u32,
    /// Options to choose from.
    #[serde(default)]
    pub options: Vec<CourseOption>,
}

// ============================================================================
// SECTION: Program Selection Rules
// ============================================================================

/// One program of `plan_type` from the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr6 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Program kind, e.g. `major`.
    #[serde(default)]
    pub plan_type: String,
    /// Programs to choose from.
    #[serde(default)]
    pub options: Vec<ProgramRef>,
}

/// Exactly `n` programs of `plan_types` from the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr7 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Required program count.
    pub n: u32,
    /// Program kinds, e.g. `majors`.
    #[serde(default)]
    pub plan_types: String,
    /// Programs to choose from.
    #[serde(default)]
    pub options: Vec<ProgramRef>,
}

/// `n` to `m` programs of `plan_types` from the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sr8 {
    /// Attached part.
    #[serde(default)]
    pub part: String,
    /// Minimum program count.
    pub n: u32,
    /// Maximum program count.
    pub m: u32,
    /// Program kinds, e.g. `majors`.
    #[serde(default)]
    pub plan_types: String,
    /// Programs to choose from.
    #[serde(default)]
    pub options: Vec<ProgramRef>,
}

// ============================================================================
// SECTION: Rule Family
// ============================================================================

rule_family! {
    /// Selection rule attached to a degree part.
    ///
    /// # Invariants
    /// - Every variant carries `part`.
    /// - `Unknown` round-trips its original document.
    pub enum SelectionRule via TaggedSelectionRule, TaggedSelectionRuleRef {
        /// Exactly N units from all options.
        Sr1(Sr1) = "SR1",
        /// N to M units from all options.
        Sr2(Sr2) = "SR2",
        /// At least N units.
        Sr3(Sr3) = "SR3",
        /// N to M units.
        Sr4(Sr4) = "SR4",
        /// Exactly N units.
        Sr5(Sr5) = "SR5",
        /// One program.
        Sr6(Sr6) = "SR6",
        /// Exactly N programs.
        Sr7(Sr7) = "SR7",
        /// N to M programs.
        Sr8(Sr8) = "SR8",
    }
}
