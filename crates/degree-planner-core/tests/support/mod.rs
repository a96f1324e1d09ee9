// crates/degree-planner-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared helpers and fake lookups for validation tests.
// ============================================================================
//! ## Overview
//! Result helpers plus a catalog wrapper that counts course lookups.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::error::Error;
use std::fmt;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use degree_planner_core::CourseInfo;
use degree_planner_core::CourseLookup;
use degree_planner_core::Degree;
use degree_planner_core::DegreeLookup;
use degree_planner_core::DegreeRecord;
use degree_planner_core::InMemoryCatalog;
use degree_planner_core::Status;
use degree_planner_core::ValidateResult;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across validation integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Fake Lookups
// ========================================================================

/// Catalog wrapper counting course lookups.
#[derive(Debug, Default)]
pub struct CountingCatalog {
    /// Backing catalog.
    inner: InMemoryCatalog,
    /// Number of course lookups served.
    course_lookups: AtomicUsize,
}

impl CountingCatalog {
    /// Wraps `inner`.
    pub fn new(inner: InMemoryCatalog) -> Self {
        Self {
            inner,
            course_lookups: AtomicUsize::new(0),
        }
    }

    /// Returns the number of course lookups so far.
    pub fn course_lookups(&self) -> usize {
        self.course_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CourseLookup for CountingCatalog {
    async fn course(&self, code: &str) -> Option<CourseInfo> {
        self.course_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.course(code).await
    }
}

#[async_trait]
impl DegreeLookup for CountingCatalog {
    async fn degree(&self, code: &str, year: u32) -> Option<DegreeRecord> {
        self.inner.degree(code, year).await
    }
}

// ========================================================================
// Builders
// ========================================================================

/// Builds a catalog of courses with the given units.
pub fn courses(entries: &[(&str, f64)]) -> InMemoryCatalog {
    entries
        .iter()
        .fold(InMemoryCatalog::new(), |catalog, (code, units)| {
            catalog.with_course(CourseInfo::new(*code, *units))
        })
}

/// Adds stored degree documents to a catalog.
pub fn with_degrees(catalog: InMemoryCatalog, degrees: &[&Degree]) -> InMemoryCatalog {
    degrees.iter().fold(catalog, |catalog, degree| {
        catalog.with_degree(DegreeRecord::from_degree(degree).unwrap())
    })
}

/// Returns the statuses of `results` in order.
pub fn statuses(results: &[ValidateResult]) -> Vec<Status> {
    results.iter().map(ValidateResult::status).collect()
}

/// Returns true when no result is an error.
pub fn all_clear(results: &[ValidateResult]) -> bool {
    !results.iter().any(ValidateResult::is_error)
}
