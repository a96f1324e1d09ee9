// crates/degree-planner-core/src/core/mod.rs
// ============================================================================
// Module: Degree Planner Core Types
// Description: Plans, rule documents, reference objects, and results.
// Purpose: Provide stable, serializable types for degree validation.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types model the inputs and outputs of validation: the student's
//! [`Plan`], the stored [`Degree`] documents with their auxiliary and
//! selection rules, and the [`ValidateResult`] records. These types hold no
//! evaluation logic; see `crate::runtime`.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aux_rule;
pub mod codes;
pub mod degree;
pub mod plan;
pub mod refs;
pub mod result;
pub mod rule_family;
pub mod select_rule;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aux_rule::AuxiliaryRule;
pub use degree::Degree;
pub use degree::DegreeError;
pub use plan::Plan;
pub use plan::Term;
pub use refs::CourseOption;
pub use refs::CourseRef;
pub use refs::EquivalenceGroup;
pub use refs::ProgramRef;
pub use result::Status;
pub use result::StatusCounts;
pub use result::ValidateResult;
pub use rule_family::UnknownRule;
pub use select_rule::SelectionRule;
