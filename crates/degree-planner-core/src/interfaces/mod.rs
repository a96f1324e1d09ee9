// crates/degree-planner-core/src/interfaces/mod.rs
// ============================================================================
// Module: Degree Planner Interfaces
// Description: Async lookup capabilities the validator reads catalogue data through.
// Purpose: Define the contract surfaces used by the degree validator.
// Dependencies: async-trait, serde, serde_json, crate::core
// ============================================================================

//! ## Overview
//! The validator never touches storage directly. Callers inject a course
//! lookup and a degree lookup; both are async because production backends
//! sit behind a database. A missing course counts zero units and a missing
//! degree contributes no results, so lookups report absence with `None`
//! rather than an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::Degree;
use crate::core::DegreeError;

// ============================================================================
// SECTION: Catalogue Records
// ============================================================================

/// Course catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    /// Course code.
    pub code: String,
    /// Course title.
    #[serde(default)]
    pub name: String,
    /// Credit units.
    #[serde(default)]
    pub num_units: f64,
}

impl CourseInfo {
    /// Creates a catalogue entry.
    #[must_use]
    pub fn new(code: impl Into<String>, num_units: f64) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            num_units,
        }
    }
}

/// Stored degree document for one handbook year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeRecord {
    /// Program code.
    pub degree_id: String,
    /// Handbook year.
    pub year: u32,
    /// Program title.
    #[serde(default)]
    pub title: String,
    /// Raw degree document.
    pub json: Value,
}

impl DegreeRecord {
    /// Wraps a degree document as a stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DegreeError::Decode`] when the degree cannot be encoded.
    pub fn from_degree(degree: &Degree) -> Result<Self, DegreeError> {
        Ok(Self {
            degree_id: degree.code.clone(),
            year: degree.year,
            title: degree.name.clone(),
            json: serde_json::to_value(degree)?,
        })
    }

    /// Decodes the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`DegreeError::Decode`] when the document is malformed.
    pub fn degree(&self) -> Result<Degree, DegreeError> {
        Degree::from_value(self.json.clone())
    }
}

// ============================================================================
// SECTION: Lookups
// ============================================================================

/// Course catalogue lookup.
#[async_trait]
pub trait CourseLookup: Send + Sync {
    /// Returns the catalogue entry for `code`, if any.
    async fn course(&self, code: &str) -> Option<CourseInfo>;
}

/// Degree document lookup.
#[async_trait]
pub trait DegreeLookup: Send + Sync {
    /// Returns the stored document for `code` in handbook `year`, if any.
    async fn degree(&self, code: &str, year: u32) -> Option<DegreeRecord>;
}
