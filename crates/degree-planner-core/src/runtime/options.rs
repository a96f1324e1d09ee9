// crates/degree-planner-core/src/runtime/options.rs
// ============================================================================
// Module: Validation Options
// Description: Policy switches for degree validation.
// Purpose: Make severity and recovery choices explicit and configurable.
// Dependencies: serde, crate::core::Status
// ============================================================================

//! ## Overview
//! Options cover the places where stored data does not settle the outcome:
//! how severe exceeding a selection maximum is, what to do with rule-logic
//! that cannot be parsed, and how deep sub-degree nesting may go.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Status;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum sub-degree nesting depth.
pub const DEFAULT_MAX_SUB_DEGREE_DEPTH: usize = 8;

// ============================================================================
// SECTION: Policies
// ============================================================================

/// Severity for exceeding a selection rule's maximum (SR2, SR4, SR8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurplusSeverity {
    /// Report surplus as an advisory warning.
    #[default]
    Warn,
    /// Report surplus as an error.
    Error,
}

impl SurplusSeverity {
    /// Returns the result status for a surplus.
    #[must_use]
    pub const fn status(self) -> Status {
        match self {
            Self::Warn => Status::Warn,
            Self::Error => Status::Error,
        }
    }
}

/// Handling of rule-logic entries that fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparseablePolicy {
    /// Emit one ERROR naming the raw text.
    #[default]
    Error,
    /// Drop the entry without a result.
    Skip,
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Validation policy switches.
///
/// # Invariants
/// - `max_sub_degree_depth` counts nesting below the top-level degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Severity for exceeding a selection maximum.
    pub surplus_severity: SurplusSeverity,
    /// Handling of unparseable rule-logic.
    pub unparseable_logic: UnparseablePolicy,
    /// Maximum sub-degree nesting depth.
    pub max_sub_degree_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            surplus_severity: SurplusSeverity::default(),
            unparseable_logic: UnparseablePolicy::default(),
            max_sub_degree_depth: DEFAULT_MAX_SUB_DEGREE_DEPTH,
        }
    }
}
