// crates/degree-planner-core/src/runtime/catalog.rs
// ============================================================================
// Module: In-Memory Catalog
// Description: Course and degree lookups backed by in-memory maps.
// Purpose: Serve tests and the CLI without a database.
// Dependencies: async-trait, serde, serde_json, thiserror, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryCatalog`] implements both lookup traits over sorted maps. It is
//! built once and read concurrently; there is no interior mutability.
//!
//! The JSON catalog file has the shape
//! `{ "courses": [CourseInfo], "degrees": [DegreeRecord] }`; both arrays are
//! optional. Duplicate course codes or `(degree, year)` pairs are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::interfaces::CourseInfo;
use crate::interfaces::CourseLookup;
use crate::interfaces::DegreeLookup;
use crate::interfaces::DegreeRecord;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum catalog document size accepted by [`InMemoryCatalog::from_json`].
pub const MAX_CATALOG_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog document failed to decode.
    #[error("catalog decode error: {0}")]
    Decode(String),
    /// Catalog document exceeds the size limit.
    #[error("catalog exceeds size limit: {actual} bytes (max {max})")]
    TooLarge {
        /// Maximum accepted bytes.
        max: usize,
        /// Actual bytes.
        actual: usize,
    },
    /// Course code listed twice.
    #[error("duplicate course: {0}")]
    DuplicateCourse(String),
    /// Degree code and year listed twice.
    #[error("duplicate degree: {code} ({year})")]
    DuplicateDegree {
        /// Program code.
        code: String,
        /// Handbook year.
        year: u32,
    },
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog file layout.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    /// Course entries.
    #[serde(default)]
    courses: Vec<CourseInfo>,
    /// Stored degree documents.
    #[serde(default)]
    degrees: Vec<DegreeRecord>,
}

/// Course and degree lookups over in-memory maps.
///
/// # Invariants
/// - Course codes are unique.
/// - `(degree_id, year)` pairs are unique.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    /// Courses keyed by code.
    courses: BTreeMap<String, CourseInfo>,
    /// Degree records keyed by code and year.
    degrees: BTreeMap<(String, u32), DegreeRecord>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when a course or degree is listed twice.
    pub fn from_entries(
        courses: impl IntoIterator<Item = CourseInfo>,
        degrees: impl IntoIterator<Item = DegreeRecord>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for course in courses {
            catalog.insert_course(course)?;
        }
        for degree in degrees {
            catalog.insert_degree(degree)?;
        }
        Ok(catalog)
    }

    /// Decodes a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the text is too large, malformed, or
    /// lists duplicates.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        if text.len() > MAX_CATALOG_BYTES {
            return Err(CatalogError::TooLarge {
                max: MAX_CATALOG_BYTES,
                actual: text.len(),
            });
        }
        let file: CatalogFile =
            serde_json::from_str(text).map_err(|err| CatalogError::Decode(err.to_string()))?;
        Self::from_entries(file.courses, file.degrees)
    }

    /// Adds a course.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCourse`] when the code is present.
    pub fn insert_course(&mut self, course: CourseInfo) -> Result<(), CatalogError> {
        if self.courses.contains_key(&course.code) {
            return Err(CatalogError::DuplicateCourse(course.code));
        }
        self.courses.insert(course.code.clone(), course);
        Ok(())
    }

    /// Adds a degree record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateDegree`] when the code and year are
    /// present.
    pub fn insert_degree(&mut self, record: DegreeRecord) -> Result<(), CatalogError> {
        let key = (record.degree_id.clone(), record.year);
        if self.degrees.contains_key(&key) {
            return Err(CatalogError::DuplicateDegree {
                code: record.degree_id,
                year: record.year,
            });
        }
        self.degrees.insert(key, record);
        Ok(())
    }

    /// Returns the catalog with `course` added, replacing any entry.
    #[must_use]
    pub fn with_course(mut self, course: CourseInfo) -> Self {
        self.courses.insert(course.code.clone(), course);
        self
    }

    /// Returns the catalog with `record` added, replacing any entry.
    #[must_use]
    pub fn with_degree(mut self, record: DegreeRecord) -> Self {
        self.degrees.insert((record.degree_id.clone(), record.year), record);
        self
    }

    /// Number of courses.
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Number of degree records.
    #[must_use]
    pub fn degree_count(&self) -> usize {
        self.degrees.len()
    }
}

#[async_trait]
impl CourseLookup for InMemoryCatalog {
    async fn course(&self, code: &str) -> Option<CourseInfo> {
        self.courses.get(code).cloned()
    }
}

#[async_trait]
impl DegreeLookup for InMemoryCatalog {
    async fn degree(&self, code: &str, year: u32) -> Option<DegreeRecord> {
        self.degrees.get(&(code.to_string(), year)).cloned()
    }
}
