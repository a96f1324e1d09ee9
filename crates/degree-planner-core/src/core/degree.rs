// crates/degree-planner-core/src/core/degree.rs
// ============================================================================
// Module: Degree Documents
// Description: Degree requirement document and prefix application.
// Purpose: Decode stored degree JSON and derive nested sub-degree copies.
// Dependencies: serde, serde_json, thiserror, crate::core::{aux_rule, codes, select_rule}
// ============================================================================

//! ## Overview
//! A [`Degree`] is one program's requirement document: its rules, the names
//! of its parts, and the rule-logic entries combining those parts. Degrees
//! are loaded fresh for each validation and never mutated; a sub-degree
//! nested under a specialisation part is a prefixed copy.
//!
//! Legacy documents store `year` and `sem` as strings; both numeric forms
//! decode, and an empty string reads as 0.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::aux_rule::AuxiliaryRule;
use crate::core::codes::join_part;
use crate::core::select_rule::SelectionRule;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while decoding degree documents.
#[derive(Debug, Error)]
pub enum DegreeError {
    /// Document is not a valid degree.
    #[error("degree document invalid: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for DegreeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// ============================================================================
// SECTION: Lenient Numbers
// ============================================================================

/// Number stored either natively or as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    /// Native JSON number.
    Number(u64),
    /// Decimal text; empty means zero.
    Text(String),
}

/// Decodes a `u32` that may be stored as a numeric string.
fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let raw = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(number) => number,
        NumberOrText::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0
            } else {
                trimmed.parse::<u64>().map_err(|_| {
                    D::Error::custom(format!("expected a whole number, found `{text}`"))
                })?
            }
        }
    };
    u32::try_from(raw).map_err(|_| D::Error::custom(format!("number {raw} out of range")))
}

// ============================================================================
// SECTION: Degree
// ============================================================================

/// Degree requirement document.
///
/// # Invariants
/// - `part` is empty for a top-level degree and the owning specialisation
///   part for a nested one.
/// - Rule parts are absolute once a prefix has been applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Degree {
    /// Program title.
    #[serde(default)]
    pub name: String,
    /// Program code.
    #[serde(default)]
    pub code: String,
    /// Handbook year.
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub year: u32,
    /// Commencing semester.
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub sem: u32,
    /// Own part prefix when nested.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub part: String,
    /// Auxiliary rules.
    #[serde(default)]
    pub aux: Vec<AuxiliaryRule>,
    /// Selection rules.
    #[serde(default)]
    pub srs: Vec<SelectionRule>,
    /// Part names keyed by part, e.g. `"A.1" -> "Flexible Core"`.
    #[serde(default)]
    pub part_references: BTreeMap<String, String>,
    /// Rule-logic entries over part references.
    #[serde(default)]
    pub rule_logic: Vec<String>,
}

impl Degree {
    /// Creates an empty degree document.
    #[must_use]
    pub fn new(code: impl Into<String>, year: u32) -> Self {
        Self {
            code: code.into(),
            year,
            ..Self::default()
        }
    }

    /// Decodes a degree from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DegreeError::Decode`] when the value is not a degree document.
    pub fn from_value(value: Value) -> Result<Self, DegreeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Decodes a degree from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DegreeError::Decode`] when the text is not a degree document.
    pub fn from_json(text: &str) -> Result<Self, DegreeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns a copy nested under `prefix`.
    ///
    /// The copy's own part becomes `prefix`; every rule part and
    /// part-reference key `p` becomes `prefix.p`.
    #[must_use]
    pub fn with_part_prefix(&self, prefix: &str) -> Self {
        Self {
            name: self.name.clone(),
            code: self.code.clone(),
            year: self.year,
            sem: self.sem,
            part: prefix.to_string(),
            aux: self.aux.iter().map(|rule| rule.prefixed(prefix)).collect(),
            srs: self.srs.iter().map(|rule| rule.prefixed(prefix)).collect(),
            part_references: self
                .part_references
                .iter()
                .map(|(key, name)| (join_part(prefix, key), name.clone()))
                .collect(),
            rule_logic: self.rule_logic.clone(),
        }
    }
}
