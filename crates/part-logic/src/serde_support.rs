// crates/part-logic/src/serde_support.rs
// ============================================================================
// Module: Requirement Serde Support
// Description: Structural validation and JSON helpers for requirement trees.
// Purpose: Reject malformed stored trees and give round-trip helpers.
// Dependencies: serde_json, std::fmt
// ============================================================================

//! ## Overview
//! Requirement trees can arrive from stored degree documents as JSON rather
//! than as rule-logic text. Those trees are untrusted: the validator bounds
//! their depth and rejects empty `And` / `Or` nodes before evaluation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::requirement::Requirement;

// ============================================================================
// SECTION: Serde Errors
// ============================================================================

/// Errors produced while validating or (de)serializing requirement trees.
///
/// # Invariants
/// - None. Variants capture structured validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerdeError {
    /// Invalid requirement structure.
    InvalidStructure(String),

    /// Requirement tree too deep.
    TooDeep {
        /// Maximum supported tree depth.
        max_depth: usize,
        /// Depth encountered during validation.
        actual_depth: usize,
    },
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStructure(msg) => {
                write!(f, "Invalid requirement structure: {msg}")
            }
            Self::TooDeep {
                max_depth,
                actual_depth,
            } => {
                write!(f, "Requirement tree too deep: {actual_depth} levels (max {max_depth})")
            }
        }
    }
}

impl std::error::Error for SerdeError {}

// ============================================================================
// SECTION: Validator Configuration
// ============================================================================

/// Configuration for requirement tree validation.
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone)]
pub struct SerdeConfig {
    /// Maximum allowed depth for requirement trees.
    pub max_depth: usize,

    /// Whether to allow empty `And` / `Or` nodes.
    pub allow_empty_logical: bool,
}

impl Default for SerdeConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            allow_empty_logical: false,
        }
    }
}

// ============================================================================
// SECTION: Requirement Validator
// ============================================================================

/// Validator for requirement trees.
///
/// # Invariants
/// - Uses the stored [`SerdeConfig`] for all validation decisions.
#[derive(Debug)]
pub struct RequirementValidator {
    /// Validation configuration for structure limits.
    config: SerdeConfig,
}

impl RequirementValidator {
    /// Creates a new validator with the given configuration.
    #[must_use]
    pub const fn new(config: SerdeConfig) -> Self {
        Self {
            config,
        }
    }

    /// Creates a validator with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(SerdeConfig::default())
    }

    /// Validates a requirement tree.
    ///
    /// # Errors
    /// Returns [`SerdeError`] when the requirement violates structural limits.
    pub fn validate(&self, requirement: &Requirement) -> Result<(), SerdeError> {
        self.validate_node(requirement, 1)
    }

    /// Validates one node and its descendants.
    fn validate_node(&self, requirement: &Requirement, depth: usize) -> Result<(), SerdeError> {
        if depth > self.config.max_depth {
            return Err(SerdeError::TooDeep {
                max_depth: self.config.max_depth,
                actual_depth: depth,
            });
        }

        match requirement {
            Requirement::And(children) | Requirement::Or(children) => {
                if !self.config.allow_empty_logical && children.is_empty() {
                    let kind = if matches!(requirement, Requirement::And(_)) { "And" } else { "Or" };
                    return Err(SerdeError::InvalidStructure(format!(
                        "Empty {kind} requirement not allowed"
                    )));
                }
                for child in children {
                    self.validate_node(child, depth + 1)?;
                }
            }
            Requirement::Atomic(value) => {
                if value.trim().is_empty() {
                    return Err(SerdeError::InvalidStructure(
                        "Atomic requirement must not be blank".to_string(),
                    ));
                }
            }
            Requirement::Other(_) => {}
        }

        Ok(())
    }
}

impl Default for RequirementValidator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// SECTION: JSON Helpers
// ============================================================================

/// Serializes a requirement to JSON after validating it.
///
/// # Errors
/// Returns [`SerdeError`] if validation or serialization fails.
pub fn to_json(requirement: &Requirement) -> Result<String, SerdeError> {
    RequirementValidator::with_defaults().validate(requirement)?;
    serde_json::to_string(requirement).map_err(|e| SerdeError::InvalidStructure(e.to_string()))
}

/// Deserializes a requirement from JSON and validates it.
///
/// # Errors
/// Returns [`SerdeError`] if parsing or validation fails.
pub fn from_json(json: &str) -> Result<Requirement, SerdeError> {
    let requirement: Requirement =
        serde_json::from_str(json).map_err(|e| SerdeError::InvalidStructure(e.to_string()))?;
    RequirementValidator::with_defaults().validate(&requirement)?;
    Ok(requirement)
}
