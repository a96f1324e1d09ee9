// crates/degree-planner-core/src/runtime/select_eval.rs
// ============================================================================
// Module: Selection Rule Evaluation
// Description: Evaluates `SR*` rules against a plan.
// Purpose: Report unit and program selection progress with add/remove hints.
// Dependencies: crate::{core, runtime::{context, options}}
// ============================================================================

//! ## Overview
//! Unit selections (SR1 to SR5) match each option to the first plan course
//! it accepts and look that course up once. Program selections (SR6 to SR8)
//! match options against the programs chosen directly under the rule's part.
//!
//! Insufficiency is always reported before excess. Exceeding a maximum
//! (SR2, SR4, SR8) reports the configured surplus severity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CourseOption;
use crate::core::ProgramRef;
use crate::core::SelectionRule;
use crate::core::Status;
use crate::core::UnknownRule;
use crate::core::ValidateResult;
use crate::core::select_rule::Sr1;
use crate::core::select_rule::Sr2;
use crate::core::select_rule::Sr3;
use crate::core::select_rule::Sr4;
use crate::core::select_rule::Sr5;
use crate::core::select_rule::Sr6;
use crate::core::select_rule::Sr7;
use crate::core::select_rule::Sr8;
use crate::runtime::context::RuleContext;
use crate::runtime::context::capped_percent;
use crate::runtime::context::count_f64;
use crate::runtime::context::labels;
use crate::runtime::context::percent;
use crate::runtime::context::units_gt;
use crate::runtime::context::units_lt;

// ============================================================================
// SECTION: Dispatch
// ============================================================================

impl SelectionRule {
    /// Evaluates the rule; the result is attached to the rule's part.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let result = match self {
            Self::Sr1(rule) => rule.validate(ctx).await,
            Self::Sr2(rule) => rule.validate(ctx).await,
            Self::Sr3(rule) => rule.validate(ctx).await,
            Self::Sr4(rule) => rule.validate(ctx).await,
            Self::Sr5(rule) => rule.validate(ctx).await,
            Self::Sr6(rule) => rule.validate(ctx),
            Self::Sr7(rule) => rule.validate(ctx),
            Self::Sr8(rule) => rule.validate(ctx),
            Self::Unknown(rule) => unknown_rule(rule),
        };
        result.with_part(self.part())
    }
}

/// Placeholder result for an unrecognised or malformed rule.
fn unknown_rule(rule: &UnknownRule) -> ValidateResult {
    let message = if let Some(error) = rule.decode_error() {
        format!("Malformed selection rule `{}` cannot be checked: {error}", rule.kind())
    } else if rule.text().is_empty() {
        format!("Unrecognised selection rule `{}` cannot be checked.", rule.kind())
    } else {
        format!("Unrecognised selection rule `{}` cannot be checked: {}", rule.kind(), rule.text())
    };
    ValidateResult::new(Status::Error, None, message, Vec::new())
}

// ============================================================================
// SECTION: Unit Selections
// ============================================================================

/// Units matched against a list of course options.
struct OptionTally {
    /// Units of the matched courses.
    units: f64,
    /// Matched plan courses, one per matched option.
    done: Vec<String>,
    /// Labels of unmatched options.
    missing: Vec<String>,
}

impl OptionTally {
    /// Matches every option to its first accepted plan course.
    async fn collect(options: &[CourseOption], ctx: &RuleContext<'_>) -> Self {
        let mut tally = Self {
            units: 0.0,
            done: Vec::new(),
            missing: Vec::new(),
        };
        for option in options {
            match ctx.plan.courses.iter().find(|code| option.matches(code)) {
                Some(code) => {
                    tally.units += ctx.units(code).await;
                    tally.done.push(code.clone());
                }
                None => tally.missing.push(option.to_string()),
            }
        }
        tally
    }

    /// Share of options matched, as a percentage.
    fn matched_percent(&self) -> f64 {
        let total = self.done.len() + self.missing.len();
        if total == 0 { 100.0 } else { count_f64(self.done.len()) / count_f64(total) * 100.0 }
    }

    /// Result for fewer units than `n`.
    fn below(self, n: u32, percentage: f64) -> ValidateResult {
        ValidateResult::new(
            Status::Error,
            Some(percentage),
            format!(
                "{} units found in plan, but {n} required. Add from: {}",
                self.units,
                self.missing.join(", ")
            ),
            self.missing,
        )
    }

    /// Result for more units than allowed.
    fn above(self, status: Status, limit: u32, noun: &str) -> ValidateResult {
        ValidateResult::new(
            status,
            Some(100.0),
            format!(
                "{} units found in plan, but {limit} {noun}. Remove from: {}",
                self.units,
                self.done.join(", ")
            ),
            self.done,
        )
    }

    /// Result for options still absent from the plan.
    fn incomplete(self) -> ValidateResult {
        let percentage = self.matched_percent();
        ValidateResult::new(
            Status::Error,
            Some(percentage),
            format!("{} need to be in the plan", self.missing.join(", ")),
            self.missing,
        )
    }
}

impl Sr1 {
    /// Exactly `n` units from all options.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = OptionTally::collect(&self.options, ctx).await;
        let target = f64::from(self.n);
        if units_lt(tally.units, target) {
            let percentage = percent(tally.units, self.n);
            return tally.below(self.n, percentage);
        }
        if units_gt(tally.units, target) {
            return tally.above(Status::Error, self.n, "required");
        }
        if !tally.missing.is_empty() {
            return tally.incomplete();
        }
        let options = labels(&self.options);
        ValidateResult::new(
            Status::Ok,
            Some(100.0),
            format!("Complete {} units for ALL of the following: {}", self.n, options.join(", ")),
            options,
        )
    }
}

impl Sr2 {
    /// Between `n` and `m` units from all options.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = OptionTally::collect(&self.options, ctx).await;
        if units_lt(tally.units, f64::from(self.n)) {
            let percentage = capped_percent(tally.units, self.n);
            return tally.below(self.n, percentage);
        }
        if units_gt(tally.units, f64::from(self.m)) {
            return tally.above(ctx.options.surplus_severity.status(), self.m, "maximum");
        }
        if !tally.missing.is_empty() {
            return tally.incomplete();
        }
        let options = labels(&self.options);
        ValidateResult::new(
            Status::Ok,
            Some(100.0),
            format!(
                "Complete {} to {} units for ALL of the following: {}",
                self.n,
                self.m,
                options.join(", ")
            ),
            options,
        )
    }
}

impl Sr3 {
    /// At least `n` units from the options.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = OptionTally::collect(&self.options, ctx).await;
        if units_lt(tally.units, f64::from(self.n)) {
            let percentage = capped_percent(tally.units, self.n);
            return tally.below(self.n, percentage);
        }
        ValidateResult::ok()
    }
}

impl Sr4 {
    /// Between `n` and `m` units from the options.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = OptionTally::collect(&self.options, ctx).await;
        if units_lt(tally.units, f64::from(self.n)) {
            let percentage = capped_percent(tally.units, self.n);
            return tally.below(self.n, percentage);
        }
        if units_gt(tally.units, f64::from(self.m)) {
            return tally.above(ctx.options.surplus_severity.status(), self.m, "maximum");
        }
        ValidateResult::ok()
    }
}

impl Sr5 {
    /// Exactly `n` units from the options.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = OptionTally::collect(&self.options, ctx).await;
        let target = f64::from(self.n);
        if units_lt(tally.units, target) {
            let percentage = capped_percent(tally.units, self.n);
            return tally.below(self.n, percentage);
        }
        if units_gt(tally.units, target) {
            return tally.above(Status::Error, self.n, "required");
        }
        ValidateResult::ok()
    }
}

// ============================================================================
// SECTION: Program Selections
// ============================================================================

/// Splits options into chosen and unchosen labels.
fn partition_chosen(options: &[ProgramRef], chosen: &[String]) -> (Vec<String>, Vec<String>) {
    let (matched, unmatched): (Vec<&ProgramRef>, Vec<&ProgramRef>) = options
        .iter()
        .partition(|program| chosen.iter().any(|code| program.matches(code)));
    (
        matched.iter().map(ToString::to_string).collect(),
        unmatched.iter().map(ToString::to_string).collect(),
    )
}

/// Result for fewer chosen programs than `n`.
fn too_few_programs(
    count: usize,
    n: u32,
    plan_types: &str,
    unmatched: Vec<String>,
) -> ValidateResult {
    ValidateResult::new(
        Status::Error,
        Some(capped_percent(count_f64(count), n)),
        format!(
            "{count} {plan_types} found in plan, but {n} required. Add from: {}",
            unmatched.join(", ")
        ),
        unmatched,
    )
}

/// Result for more chosen programs than allowed.
fn too_many_programs(
    status: Status,
    count: usize,
    limit: u32,
    noun: &str,
    plan_types: &str,
    matched: Vec<String>,
) -> ValidateResult {
    ValidateResult::new(
        status,
        Some(100.0),
        format!(
            "{count} {plan_types} found in plan, but {limit} {noun}. Remove from: {}",
            matched.join(", ")
        ),
        matched,
    )
}

impl Sr6 {
    /// One program of `plan_type` from the options.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let chosen = ctx.chosen_under(&self.part);
        let options = labels(&self.options);
        if self.options.iter().any(|program| chosen.iter().any(|code| program.matches(code))) {
            return ValidateResult::new(
                Status::Ok,
                Some(100.0),
                format!(
                    "Complete one {} from the following: {}",
                    self.plan_type,
                    options.join(", ")
                ),
                options,
            );
        }
        ValidateResult::new(
            Status::Error,
            None,
            format!("No {} found in plan. Add from: {}", self.plan_type, options.join(", ")),
            options,
        )
    }
}

impl Sr7 {
    /// Exactly `n` programs from the options.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let (matched, unmatched) = partition_chosen(&self.options, ctx.chosen_under(&self.part));
        let count = matched.len();
        let target = usize::try_from(self.n).unwrap_or(usize::MAX);
        if count < target {
            return too_few_programs(count, self.n, &self.plan_types, unmatched);
        }
        if count > target {
            return too_many_programs(
                Status::Error,
                count,
                self.n,
                "required",
                &self.plan_types,
                matched,
            );
        }
        ValidateResult::ok()
    }
}

impl Sr8 {
    /// Between `n` and `m` programs from the options.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let (matched, unmatched) = partition_chosen(&self.options, ctx.chosen_under(&self.part));
        let count = matched.len();
        if count < usize::try_from(self.n).unwrap_or(usize::MAX) {
            return too_few_programs(count, self.n, &self.plan_types, unmatched);
        }
        if count > usize::try_from(self.m).unwrap_or(usize::MAX) {
            return too_many_programs(
                ctx.options.surplus_severity.status(),
                count,
                self.m,
                "maximum",
                &self.plan_types,
                matched,
            );
        }
        ValidateResult::ok()
    }
}
