// crates/degree-planner-core/src/runtime/aux_eval.rs
// ============================================================================
// Module: Auxiliary Rule Evaluation
// Description: Evaluates `AR*` rules against a plan.
// Purpose: Produce one result per auxiliary rule with remediation hints.
// Dependencies: crate::{core, runtime::context}
// ============================================================================

//! ## Overview
//! Level rules (AR1 to AR4) and the discipline cap (AR7) sum course units
//! through the course lookup, one course at a time in plan order. The other
//! rules only compare codes: plan courses against course lists, and chosen
//! programs against program lists.
//!
//! Percentages follow one scheme: at-least and at-most rules report
//! `min(100, found / target * 100)`; exactly-N rules report the uncapped
//! ratio; a zero target is complete.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::AuxiliaryRule;
use crate::core::CourseRef;
use crate::core::ProgramRef;
use crate::core::Status;
use crate::core::UnknownRule;
use crate::core::ValidateResult;
use crate::core::aux_rule::Ar1;
use crate::core::aux_rule::Ar2;
use crate::core::aux_rule::Ar3;
use crate::core::aux_rule::Ar4;
use crate::core::aux_rule::Ar5;
use crate::core::aux_rule::Ar6;
use crate::core::aux_rule::Ar7;
use crate::core::aux_rule::Ar9;
use crate::core::aux_rule::Ar10;
use crate::core::aux_rule::Ar11;
use crate::core::aux_rule::Ar13;
use crate::core::aux_rule::Ar15;
use crate::core::aux_rule::Ar16;
use crate::core::aux_rule::Ar17;
use crate::core::aux_rule::Ar18;
use crate::core::aux_rule::Ar19;
use crate::core::aux_rule::Ar20;
use crate::core::codes::course_level;
use crate::core::codes::discipline;
use crate::runtime::context::RuleContext;
use crate::runtime::context::capped_percent;
use crate::runtime::context::labels;
use crate::runtime::context::percent;
use crate::runtime::context::units_gt;
use crate::runtime::context::units_lt;

// ============================================================================
// SECTION: Dispatch
// ============================================================================

impl AuxiliaryRule {
    /// Evaluates the rule; the result is attached to the rule's part.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let result = match self {
            Self::Ar1(rule) => rule.validate(ctx).await,
            Self::Ar2(rule) => rule.validate(ctx).await,
            Self::Ar3(rule) => rule.validate(ctx).await,
            Self::Ar4(rule) => rule.validate(ctx).await,
            Self::Ar5(rule) => rule.validate(ctx),
            Self::Ar6(rule) => rule.validate(ctx),
            Self::Ar7(rule) => rule.validate(ctx).await,
            Self::Ar9(rule) => rule.validate(ctx),
            Self::Ar10(rule) => rule.validate(ctx),
            Self::Ar11(rule) => rule.validate(ctx),
            Self::Ar13(rule) => rule.validate(ctx),
            Self::Ar15(rule) => rule.validate(ctx),
            Self::Ar16(rule) => rule.validate(ctx),
            Self::Ar17(rule) => rule.validate(ctx),
            Self::Ar18(rule) => rule.validate(ctx),
            Self::Ar19(rule) => rule.validate(ctx),
            Self::Ar20(rule) => rule.validate(ctx),
            Self::Unknown(rule) => unknown_rule(rule),
        };
        result.with_part(self.part())
    }
}

/// Placeholder result for an unrecognised or malformed rule.
fn unknown_rule(rule: &UnknownRule) -> ValidateResult {
    let message = if let Some(error) = rule.decode_error() {
        format!("Malformed auxiliary rule `{}` cannot be checked: {error}", rule.kind())
    } else if rule.text().is_empty() {
        format!("Unrecognised auxiliary rule `{}` cannot be checked.", rule.kind())
    } else {
        format!("Unrecognised auxiliary rule `{}` cannot be checked: {}", rule.kind(), rule.text())
    };
    ValidateResult::new(Status::Error, None, message, Vec::new())
}

// ============================================================================
// SECTION: Level Rules
// ============================================================================

/// Units and courses counted at a level.
struct LevelTally {
    /// Summed units.
    units: f64,
    /// Counted courses in plan order.
    courses: Vec<String>,
}

/// Sums units of plan courses at `level` (or higher).
///
/// Returns the first malformed code as the error.
async fn tally_level(
    ctx: &RuleContext<'_>,
    level: u32,
    or_higher: bool,
) -> Result<LevelTally, String> {
    let mut tally = LevelTally {
        units: 0.0,
        courses: Vec::new(),
    };
    for code in &ctx.plan.courses {
        let Some(course_level) = course_level(code) else {
            return Err(code.clone());
        };
        if course_level == level || (or_higher && course_level > level) {
            tally.units += ctx.units(code).await;
            tally.courses.push(code.clone());
        }
    }
    Ok(tally)
}

/// Result for a course code without a level digit.
fn invalid_level(code: String) -> ValidateResult {
    ValidateResult::new(Status::Error, None, "Invalid course level format", vec![code])
}

/// Suffix describing `or_higher`.
const fn or_higher_suffix(or_higher: bool) -> &'static str {
    if or_higher { " or higher" } else { "" }
}

impl Ar1 {
    /// At least `n` units at `level`.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = match tally_level(ctx, self.level, self.or_higher).await {
            Ok(tally) => tally,
            Err(code) => return invalid_level(code),
        };
        if !units_lt(tally.units, f64::from(self.n)) {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            Some(capped_percent(tally.units, self.n)),
            format!(
                "Expected at least {} units at level {}{}, found {}.",
                self.n,
                self.level,
                or_higher_suffix(self.or_higher),
                tally.units
            ),
            tally.courses,
        )
    }
}

impl Ar2 {
    /// At most `n` units at exactly `level`.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = match tally_level(ctx, self.level, false).await {
            Ok(tally) => tally,
            Err(code) => return invalid_level(code),
        };
        if !units_gt(tally.units, f64::from(self.n)) {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            Some(capped_percent(tally.units, self.n)),
            format!(
                "Expected at most {} units at level {}, found {}.",
                self.n, self.level, tally.units
            ),
            tally.courses,
        )
    }
}

impl Ar3 {
    /// Exactly `n` units at `level`.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = match tally_level(ctx, self.level, self.or_higher).await {
            Ok(tally) => tally,
            Err(code) => return invalid_level(code),
        };
        let target = f64::from(self.n);
        if !units_lt(tally.units, target) && !units_gt(tally.units, target) {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            Some(percent(tally.units, self.n)),
            format!(
                "Expected exactly {} units at level {}{}, found {}.",
                self.n,
                self.level,
                or_higher_suffix(self.or_higher),
                tally.units
            ),
            tally.courses,
        )
    }
}

impl Ar4 {
    /// Between `n` and `m` units at `level`.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let tally = match tally_level(ctx, self.level, self.or_higher).await {
            Ok(tally) => tally,
            Err(code) => return invalid_level(code),
        };
        let suffix = or_higher_suffix(self.or_higher);
        if units_lt(tally.units, f64::from(self.n)) {
            return ValidateResult::new(
                Status::Error,
                Some(capped_percent(tally.units, self.n)),
                format!(
                    "Expected at least {} units at level {}{suffix}, found {}.",
                    self.n, self.level, tally.units
                ),
                tally.courses,
            );
        }
        if units_gt(tally.units, f64::from(self.m)) {
            return ValidateResult::new(
                Status::Error,
                Some(capped_percent(tally.units, self.m)),
                format!(
                    "Expected at most {} units at level {}{suffix}, found {}.",
                    self.m, self.level, tally.units
                ),
                tally.courses,
            );
        }
        ValidateResult::ok()
    }
}

// ============================================================================
// SECTION: Program Combination Rules
// ============================================================================

/// Returns the first program in `refs` chosen in `chosen`.
fn first_chosen<'r>(refs: &'r [ProgramRef], chosen: &[String]) -> Option<&'r ProgramRef> {
    refs.iter().find(|program| chosen.iter().any(|code| program.matches(code)))
}

/// Returns the programs in `refs` chosen under any part of the plan.
fn chosen_anywhere<'r>(refs: &'r [ProgramRef], ctx: &RuleContext<'_>) -> Vec<&'r ProgramRef> {
    refs.iter()
        .filter(|program| ctx.plan.all_specialisations().any(|code| program.matches(code)))
        .collect()
}

impl Ar5 {
    /// Programs in list 1 require a companion from list 2.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        if first_chosen(&self.plan_list_1, ctx.chosen_under(&self.part)).is_none()
            || !chosen_anywhere(&self.plan_list_2, ctx).is_empty()
        {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            None,
            format!(
                "Expected {} to be with {}.",
                labels(&self.plan_list_1).join(", "),
                labels(&self.plan_list_2).join(", ")
            ),
            labels(&self.plan_list_2),
        )
    }
}

impl Ar6 {
    /// Programs in list 1 forbid any of list 2.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        if first_chosen(&self.plan_list_1, ctx.chosen_under(&self.part)).is_none() {
            return ValidateResult::ok();
        }
        let conflicts = chosen_anywhere(&self.plan_list_2, ctx);
        if conflicts.is_empty() {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            None,
            format!(
                "Expected {} to NOT be with {}.",
                labels(&self.plan_list_1).join(", "),
                labels(&self.plan_list_2).join(", ")
            ),
            conflicts.iter().map(|program| program.code.clone()).collect(),
        )
    }
}

impl Ar7 {
    /// At most `n` units from any one discipline.
    pub async fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for code in &ctx.plan.courses {
            let units = ctx.units(code).await;
            *totals.entry(discipline(code)).or_default() += units;
        }
        let cap = f64::from(self.n);
        let over: Vec<(&str, f64)> = totals
            .iter()
            .filter(|(_, total)| units_gt(**total, cap))
            .map(|(name, total)| (*name, *total))
            .collect();
        if over.is_empty() {
            return ValidateResult::ok();
        }
        let largest = over.iter().map(|(_, total)| *total).fold(0.0, f64::max);
        let relevant = ctx
            .plan
            .courses
            .iter()
            .filter(|code| over.iter().any(|(name, _)| *name == discipline(code)))
            .cloned()
            .collect();
        let details: Vec<String> =
            over.iter().map(|(name, total)| format!("{name} ({total})")).collect();
        ValidateResult::new(
            Status::Error,
            Some(percent(largest, self.n)),
            format!(
                "Expected at most {} units from one discipline, found {}.",
                self.n,
                details.join(", ")
            ),
            relevant,
        )
    }
}

// ============================================================================
// SECTION: Credit Rules
// ============================================================================

/// Plan courses matching `course_list`, grouped by reference order.
fn overlap(course_list: &[CourseRef], ctx: &RuleContext<'_>) -> Vec<String> {
    course_list
        .iter()
        .flat_map(|course| ctx.plan.courses.iter().filter(|code| course.matches(code)))
        .cloned()
        .collect()
}

impl Ar9 {
    /// No credit for any listed course.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let found = overlap(&self.course_list, ctx);
        if found.is_empty() {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            None,
            format!("No credit for {}.", labels(&self.course_list).join(", ")),
            found,
        )
    }
}

impl Ar10 {
    /// No credit for listed courses when completing a listed program.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let Some(program) = first_chosen(&self.plan_list, ctx.chosen_under(&self.part)) else {
            return ValidateResult::ok();
        };
        let found = overlap(&self.course_list, ctx);
        if found.is_empty() {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            Some(0.0),
            format!("No credit for {} for students completing {program}.", found.join(", ")),
            found,
        )
    }
}

impl Ar11 {
    /// No credit for listed courses unless completing a listed program.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let found = overlap(&self.course_list, ctx);
        if found.is_empty() || first_chosen(&self.plan_list, ctx.chosen_under(&self.part)).is_some()
        {
            return ValidateResult::ok();
        }
        ValidateResult::new(
            Status::Error,
            Some(0.0),
            format!(
                "No credit for {} for students not completing {}.",
                found.join(", "),
                labels(&self.plan_list).join(", ")
            ),
            found,
        )
    }
}

impl Ar13 {
    /// Advisory exemption notice.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let Some(program) = first_chosen(&self.plan_list, ctx.chosen_under(&self.part)) else {
            return ValidateResult::ok();
        };
        let found = overlap(&self.course_list, ctx);
        if found.is_empty() {
            return ValidateResult::ok();
        }
        let programs = labels(&self.program_plan_list);
        let message = if programs.is_empty() {
            format!("Students completing {program} are exempt from {}.", found.join(", "))
        } else {
            format!(
                "Students completing {program} are exempt from {} in {}.",
                found.join(", "),
                programs.join(", ")
            )
        };
        ValidateResult::new(Status::Warn, None, message, found)
    }
}

// ============================================================================
// SECTION: Substitution Rules
// ============================================================================

/// Shared MUST/MAY substitution outcome.
///
/// `target` completes the sentence "... to be substituted {target}".
fn substitution(
    must: bool,
    found: Vec<String>,
    required: &[CourseRef],
    target: &str,
) -> ValidateResult {
    if must && found.is_empty() {
        return ValidateResult::new(
            Status::Error,
            Some(0.0),
            format!("Expected {} to be substituted {target}.", labels(required).join(", ")),
            labels(required),
        );
    }
    if !must && !found.is_empty() {
        return ValidateResult::new(
            Status::Ok,
            Some(100.0),
            format!("{} may be substituted {target}.", found.join(", ")),
            found,
        );
    }
    ValidateResult::ok()
}

/// Returns true when a scoped rule applies to the plan.
///
/// An empty scope applies to every plan; otherwise the plan's degree or a
/// chosen program must be listed.
fn in_scope(plan_list: &[ProgramRef], ctx: &RuleContext<'_>) -> bool {
    plan_list.is_empty()
        || plan_list.iter().any(|program| {
            program.matches(&ctx.plan.degree)
                || ctx.plan.all_specialisations().any(|code| program.matches(code))
        })
}

impl Ar15 {
    /// Substitution by a course from named lists.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let target = format!(
            "in {} by a course from {}",
            labels(&self.program_plan_list).join(", "),
            self.lists.join(", ")
        );
        substitution(self.must, overlap(&self.course_list, ctx), &self.course_list, &target)
    }
}

impl Ar16 {
    /// Scoped substitution by courses from a second list.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        if !in_scope(&self.plan_list, ctx) {
            return ValidateResult::ok();
        }
        let target = format!(
            "in {} by a course from {} in {}",
            labels(&self.plan_list).join(", "),
            labels(&self.course_list_2).join(", "),
            labels(&self.program_plan_list).join(", ")
        );
        substitution(self.must, overlap(&self.course_list_1, ctx), &self.course_list_1, &target)
    }
}

impl Ar17 {
    /// Scoped substitution by a course from named lists.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        if !in_scope(&self.plan_list, ctx) {
            return ValidateResult::ok();
        }
        let target = format!(
            "in {} by a course from {} in {}",
            labels(&self.plan_list).join(", "),
            self.lists.join(", "),
            labels(&self.program_plan_list).join(", ")
        );
        substitution(self.must, overlap(&self.course_list, ctx), &self.course_list, &target)
    }
}

// ============================================================================
// SECTION: Component Rules
// ============================================================================

/// Human label for a program: its name, or its code when unnamed.
fn program_label(program: &ProgramRef) -> &str {
    if program.name.is_empty() { &program.code } else { &program.name }
}

impl Ar18 {
    /// Listed courses only count towards one dual component.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let chosen = ctx.chosen_under(&self.part);
        let stray = chosen.iter().any(|code| !self.program.matches(code));
        match overlap(&self.course_list, ctx).into_iter().next() {
            Some(course) if stray => ValidateResult::new(
                Status::Error,
                Some(0.0),
                format!(
                    "{course} can only be counted towards the {} component of a dual.",
                    program_label(&self.program)
                ),
                vec![course],
            ),
            _ => ValidateResult::ok(),
        }
    }
}

impl Ar19 {
    /// For listed degrees, listed courses only count towards one component.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        let Some(degree) = self.plan_list.iter().find(|program| program.matches(&ctx.plan.degree))
        else {
            return ValidateResult::ok();
        };
        let has_component =
            ctx.chosen_under(&self.part).iter().any(|code| self.program.matches(code));
        match overlap(&self.course_list, ctx).into_iter().next() {
            Some(course) if !has_component => ValidateResult::new(
                Status::Error,
                Some(0.0),
                format!(
                    "{course} only counts towards the {} component for students completing \
                     {degree}.",
                    program_label(&self.program)
                ),
                vec![course],
            ),
            _ => ValidateResult::ok(),
        }
    }
}

impl Ar20 {
    /// For one degree with listed programs, listed courses only count
    /// towards a second program list.
    #[must_use]
    pub fn validate(&self, ctx: &RuleContext<'_>) -> ValidateResult {
        if !self.plan_1.matches(&ctx.plan.degree) {
            return ValidateResult::ok();
        }
        let chosen = ctx.chosen_under(&self.part);
        let Some(program) = first_chosen(&self.plan_list_1, chosen) else {
            return ValidateResult::ok();
        };
        if first_chosen(&self.plan_list_2, chosen).is_some() {
            return ValidateResult::ok();
        }
        match overlap(&self.course_list, ctx).into_iter().next() {
            Some(course) => ValidateResult::new(
                Status::Error,
                Some(0.0),
                format!(
                    "{course} only counts towards {} for students completing {program}.",
                    labels(&self.plan_list_2).join(", ")
                ),
                vec![course],
            ),
            None => ValidateResult::ok(),
        }
    }
}
