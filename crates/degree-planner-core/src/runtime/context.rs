// crates/degree-planner-core/src/runtime/context.rs
// ============================================================================
// Module: Rule Context
// Description: Per-validation inputs shared by every rule evaluation.
// Purpose: Bundle the plan, lookups, and options; host unit arithmetic helpers.
// Dependencies: crate::{core, interfaces, runtime::options}
// ============================================================================

//! ## Overview
//! A [`RuleContext`] borrows everything a rule needs for one validation.
//! Units are fractional, so comparisons go through an epsilon.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::core::Plan;
use crate::interfaces::CourseLookup;
use crate::interfaces::DegreeLookup;
use crate::runtime::options::ValidationOptions;

// ============================================================================
// SECTION: Context
// ============================================================================

/// Inputs shared by every rule in one validation.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// Plan under validation.
    pub plan: &'a Plan,
    /// Course catalogue.
    pub courses: &'a dyn CourseLookup,
    /// Degree documents.
    pub degrees: &'a dyn DegreeLookup,
    /// Policy switches.
    pub options: &'a ValidationOptions,
}

impl<'a> RuleContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(
        plan: &'a Plan,
        courses: &'a dyn CourseLookup,
        degrees: &'a dyn DegreeLookup,
        options: &'a ValidationOptions,
    ) -> Self {
        Self {
            plan,
            courses,
            degrees,
            options,
        }
    }

    /// Returns the units of `code`; unknown courses count zero.
    pub async fn units(&self, code: &str) -> f64 {
        self.courses.course(code).await.map_or(0.0, |course| course.num_units)
    }

    /// Returns the programs chosen directly under `part`.
    #[must_use]
    pub fn chosen_under(&self, part: &str) -> &'a [String] {
        self.plan.specialisations_at(part)
    }
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("plan", &self.plan.name)
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Unit Arithmetic
// ============================================================================

/// Tolerance for fractional unit comparisons.
const UNIT_EPSILON: f64 = 1e-9;

/// Returns true when `a < b` beyond tolerance.
pub(crate) fn units_lt(a: f64, b: f64) -> bool {
    a < b - UNIT_EPSILON
}

/// Returns true when `a > b` beyond tolerance.
pub(crate) fn units_gt(a: f64, b: f64) -> bool {
    a > b + UNIT_EPSILON
}

/// Returns `count / target * 100`; a zero target is complete.
pub(crate) fn percent(count: f64, target: u32) -> f64 {
    if target == 0 { 100.0 } else { count / f64::from(target) * 100.0 }
}

/// Returns [`percent`] capped at 100.
pub(crate) fn capped_percent(count: f64, target: u32) -> f64 {
    percent(count, target).min(100.0)
}

/// Converts a collection size to `f64`.
pub(crate) fn count_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Renders items with `Display`.
pub(crate) fn labels<T: fmt::Display>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
