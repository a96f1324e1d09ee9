// crates/degree-planner-core/src/core/result.rs
// ============================================================================
// Module: Validation Results
// Description: Outcome records produced by rule evaluation.
// Purpose: Provide the immutable pass/warn/fail record returned to callers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every evaluated rule yields exactly one [`ValidateResult`]. Results carry a
//! status, an optional completion percentage, a remediation message, the
//! codes implicated, and the part the rule belongs to.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Outcome severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Requirement satisfied.
    Ok,
    /// Advisory; does not fail the plan.
    Warn,
    /// Requirement violated.
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

// ============================================================================
// SECTION: Validate Result
// ============================================================================

/// Outcome of evaluating one rule.
///
/// # Invariants
/// - Fields are private; a result never changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateResult {
    /// Outcome severity.
    status: Status,
    /// Completion percentage, when meaningful.
    percentage: Option<f64>,
    /// Remediation or explanatory message.
    message: String,
    /// Course or program codes implicated.
    relevant: Vec<String>,
    /// Part the result belongs to.
    part: Option<String>,
}

impl ValidateResult {
    /// Creates a result with no part attached.
    #[must_use]
    pub fn new(
        status: Status,
        percentage: Option<f64>,
        message: impl Into<String>,
        relevant: Vec<String>,
    ) -> Self {
        Self {
            status,
            percentage,
            message: message.into(),
            relevant,
            part: None,
        }
    }

    /// Creates a fully satisfied result with no message.
    #[must_use]
    pub fn ok() -> Self {
        Self::new(Status::Ok, Some(100.0), "", Vec::new())
    }

    /// Returns the result attached to `part`; an empty part means none.
    #[must_use]
    pub fn with_part(mut self, part: &str) -> Self {
        self.part = (!part.is_empty()).then(|| part.to_string());
        self
    }

    /// Returns the outcome severity.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the completion percentage.
    #[must_use]
    pub const fn percentage(&self) -> Option<f64> {
        self.percentage
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the implicated codes.
    #[must_use]
    pub fn relevant(&self) -> &[String] {
        &self.relevant
    }

    /// Returns the originating part.
    #[must_use]
    pub fn part(&self) -> Option<&str> {
        self.part.as_deref()
    }

    /// Returns true for [`Status::Ok`].
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Returns true for [`Status::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

// ============================================================================
// SECTION: Tallies
// ============================================================================

/// Result counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Number of OK results.
    pub ok: usize,
    /// Number of WARN results.
    pub warn: usize,
    /// Number of ERROR results.
    pub error: usize,
}

impl StatusCounts {
    /// Counts the statuses of `results`.
    #[must_use]
    pub fn tally(results: &[ValidateResult]) -> Self {
        results.iter().fold(Self::default(), |mut counts, result| {
            match result.status() {
                Status::Ok => counts.ok += 1,
                Status::Warn => counts.warn += 1,
                Status::Error => counts.error += 1,
            }
            counts
        })
    }
}
