// crates/part-logic/src/lib.rs
// ============================================================================
// Module: Part Logic Root
// Description: Public API surface for rule-logic parsing.
// Purpose: Wire together the requirement tree, parser, and validators.
// Dependencies: crate::{dsl, requirement, serde_support}
// ============================================================================

//! ## Overview
//! `part-logic` parses the boolean rule-logic strings stored on degrees
//! (`Part A and (Part B.1 or Part B.2)`) into [`Requirement`] trees and
//! renders them back in a canonical form. It knows nothing about courses or
//! plans; evaluation lives in `degree-planner-core`.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod dsl;
pub mod requirement;
pub mod serde_support;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dsl::ParseError;
pub use dsl::parse_or_other;
pub use dsl::parse_requirement;
pub use requirement::PART_PREFIX;
pub use requirement::Requirement;
pub use requirement::strip_part_prefix;
pub use serde_support::RequirementValidator;
pub use serde_support::SerdeError;
