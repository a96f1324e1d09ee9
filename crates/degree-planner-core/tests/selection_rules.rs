// crates/degree-planner-core/tests/selection_rules.rs
// ============================================================================
// Test Module: Selection Rules
// Coverage: Unit selections, program selections, and surplus severity.
// ============================================================================
//! ## Overview
//! Integration tests for selection rule evaluation.

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

mod support;

use degree_planner_core::Plan;
use degree_planner_core::RuleContext;
use degree_planner_core::SelectionRule;
use degree_planner_core::Status;
use degree_planner_core::SurplusSeverity;
use degree_planner_core::ValidateResult;
use degree_planner_core::ValidationOptions;
use serde_json::Value;
use serde_json::json;
use support::CountingCatalog;
use support::TestResult;
use support::courses;
use support::ensure;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a selection rule document.
fn rule(doc: Value) -> SelectionRule {
    serde_json::from_value(doc).unwrap()
}

/// Catalog of two-unit courses that counts lookups.
fn catalog() -> CountingCatalog {
    CountingCatalog::new(courses(&[
        ("CSSE1001", 2.0),
        ("CSSE2002", 2.0),
        ("CSSE2010", 2.0),
        ("MATH1051", 2.0),
        ("MATH1061", 2.0),
    ]))
}

/// Evaluates `rule` against `plan` with `options`.
async fn run_with(
    rule: &SelectionRule,
    plan: &Plan,
    catalog: &CountingCatalog,
    options: ValidationOptions,
) -> ValidateResult {
    let ctx = RuleContext::new(plan, catalog, catalog, &options);
    rule.validate(&ctx).await
}

/// Evaluates `rule` against `plan` with default options.
async fn run(rule: &SelectionRule, plan: &Plan, catalog: &CountingCatalog) -> ValidateResult {
    run_with(rule, plan, catalog, ValidationOptions::default()).await
}

/// SR1 over two two-unit courses.
fn sr1() -> SelectionRule {
    rule(json!({
        "type": "SR1", "part": "A.1", "n": 4,
        "options": [{"code": "CSSE1001"}, {"code": "CSSE2002"}]
    }))
}

// ============================================================================
// SECTION: Unit Selections
// ============================================================================

#[tokio::test]
async fn sr1_complete_lists_options() -> TestResult {
    let catalog = catalog();
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001", "CSSE2002"]);
    let result = run(&sr1(), &plan, &catalog).await;
    ensure(result.is_ok(), "both options present")?;
    ensure(result.percentage() == Some(100.0), "complete")?;
    ensure(result.relevant() == ["CSSE1001", "CSSE2002"], "options listed")?;
    ensure(result.part() == Some("A.1"), "part attached")
}

#[tokio::test]
async fn sr1_missing_option_is_reported_with_one_lookup() -> TestResult {
    let catalog = catalog();
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001", "MATH1051"]);
    let result = run(&sr1(), &plan, &catalog).await;
    ensure(result.is_error(), "one option missing")?;
    ensure(result.relevant() == ["CSSE2002"], "missing option listed")?;
    ensure(result.percentage() == Some(50.0), "half the units")?;
    ensure(
        result.message() == "2 units found in plan, but 4 required. Add from: CSSE2002",
        result.message().to_string(),
    )?;
    ensure(catalog.course_lookups() == 1, format!("lookups {}", catalog.course_lookups()))
}

#[tokio::test]
async fn sr1_units_met_but_option_missing() -> TestResult {
    let catalog = CountingCatalog::new(courses(&[("CSSE1001", 4.0), ("CSSE2002", 2.0)]));
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001"]);
    let result = run(&sr1(), &plan, &catalog).await;
    ensure(result.is_error(), "every option is required")?;
    ensure(result.message() == "CSSE2002 need to be in the plan", result.message().to_string())?;
    ensure(result.percentage() == Some(50.0), "half the options")
}

#[tokio::test]
async fn equivalence_group_matches_any_alternative() -> TestResult {
    let sr3 = rule(json!({
        "type": "SR3", "n": 2,
        "options": [{"EquivalenceGroup": {"courses": ["MATH1051", "MATH1061"]}}]
    }));
    let catalog = catalog();
    let plan = Plan::new("p", "2451").with_courses(["MATH1061"]);
    ensure(run(&sr3, &plan, &catalog).await.is_ok(), "second alternative counts")?;
    let result = run(&sr3, &Plan::new("p", "2451"), &catalog).await;
    ensure(result.relevant() == ["(MATH1051 or MATH1061)"], "group rendered as alternatives")
}

#[tokio::test]
async fn sr2_checks_range_then_missing_options() -> TestResult {
    let sr2 = rule(json!({
        "type": "SR2", "part": "A", "n": 2, "m": 4,
        "options": [{"code": "CSSE1001"}, {"code": "CSSE2002"}, {"code": "MATH1051"}]
    }));
    let catalog = catalog();
    let in_range = Plan::new("p", "2451").with_courses(["CSSE1001", "CSSE2002"]);
    let result = run(&sr2, &in_range, &catalog).await;
    ensure(result.is_error(), "range met but an option is missing")?;
    ensure(result.relevant() == ["MATH1051"], "missing option named")?;
    ensure(result.message() == "MATH1051 need to be in the plan", result.message().to_string())?;

    let empty = run(&sr2, &Plan::new("p", "2451"), &catalog).await;
    ensure(empty.is_error() && empty.percentage() == Some(0.0), "below minimum")?;
    let all = Plan::new("p", "2451").with_courses(["CSSE1001", "CSSE2002", "MATH1051"]);
    let surplus = run(&sr2, &all, &catalog).await;
    ensure(surplus.status() == Status::Warn, "above maximum is a surplus")?;

    let wide = rule(json!({
        "type": "SR2", "part": "A", "n": 2, "m": 6,
        "options": [{"code": "CSSE1001"}, {"code": "CSSE2002"}, {"code": "MATH1051"}]
    }));
    let result = run(&wide, &all, &catalog).await;
    ensure(result.is_ok() && result.percentage() == Some(100.0), "every option taken")?;
    ensure(result.relevant().len() == 3, "options listed")
}

#[tokio::test]
async fn sr3_requires_minimum_units() -> TestResult {
    let sr3 = rule(json!({
        "type": "SR3", "part": "A", "n": 4,
        "options": [{"code": "CSSE1001"}, {"code": "CSSE2002"}, {"code": "MATH1051"}]
    }));
    let catalog = catalog();
    let short = Plan::new("p", "2451").with_courses(["CSSE1001"]);
    let result = run(&sr3, &short, &catalog).await;
    ensure(result.is_error() && result.percentage() == Some(50.0), "half the units")?;
    ensure(result.relevant() == ["CSSE2002", "MATH1051"], "remaining options named")?;

    let enough = Plan::new("p", "2451").with_courses(["CSSE1001", "MATH1051"]);
    ensure(run(&sr3, &enough, &catalog).await.is_ok(), "any two options suffice")?;
    let more = Plan::new("p", "2451").with_courses(["CSSE1001", "CSSE2002", "MATH1051"]);
    ensure(run(&sr3, &more, &catalog).await.is_ok(), "no maximum")
}

#[tokio::test]
async fn sr4_surplus_follows_configured_severity() -> TestResult {
    let sr4 = rule(json!({
        "type": "SR4", "n": 2, "m": 2,
        "options": [{"code": "CSSE1001"}, {"code": "CSSE2002"}, {"code": "CSSE2010"}]
    }));
    let catalog = catalog();
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001", "CSSE2002"]);
    let warn = run(&sr4, &plan, &catalog).await;
    ensure(warn.status() == Status::Warn, "surplus warns by default")?;
    ensure(warn.relevant() == ["CSSE1001", "CSSE2002"], "removable courses listed")?;
    let strict = ValidationOptions {
        surplus_severity: SurplusSeverity::Error,
        ..ValidationOptions::default()
    };
    let error = run_with(&sr4, &plan, &catalog, strict).await;
    ensure(error.status() == Status::Error, "surplus errors when configured")
}

#[tokio::test]
async fn sr5_rejects_excess() -> TestResult {
    let sr5 = rule(json!({
        "type": "SR5", "n": 2,
        "options": [{"code": "CSSE1001"}, {"code": "CSSE2002"}]
    }));
    let catalog = catalog();
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001", "CSSE2002"]);
    let result = run(&sr5, &plan, &catalog).await;
    ensure(result.is_error(), "exactly-N excess is an error")?;
    ensure(
        result.message().contains("Remove from: CSSE1001, CSSE2002"),
        result.message().to_string(),
    )
}

// ============================================================================
// SECTION: Program Selections
// ============================================================================

#[tokio::test]
async fn sr6_requires_program_under_part() -> TestResult {
    let sr6 = rule(json!({
        "type": "SR6", "part": "B", "plan_type": "major",
        "options": [{"code": "2525"}]
    }));
    let catalog = catalog();
    let chosen = Plan::new("p", "2451").with_specialisation("B", "2525");
    ensure(run(&sr6, &chosen, &catalog).await.is_ok(), "major chosen")?;
    let wrong = Plan::new("p", "2451").with_specialisation("B", "9999");
    let result = run(&sr6, &wrong, &catalog).await;
    ensure(result.is_error(), "other program does not count")?;
    ensure(result.relevant() == ["2525"], "options listed")?;
    let elsewhere = Plan::new("p", "2451").with_specialisation("C", "2525");
    ensure(run(&sr6, &elsewhere, &catalog).await.is_error(), "only this part counts")
}

#[tokio::test]
async fn sr7_and_sr8_count_programs() -> TestResult {
    let options = json!([{"code": "2525"}, {"code": "2526"}, {"code": "2527"}]);
    let sr7 = rule(json!({
        "type": "SR7", "part": "B", "n": 1, "plan_types": "major", "options": options
    }));
    let sr8 = rule(json!({
        "type": "SR8", "part": "B", "n": 1, "m": 1, "plan_types": "major", "options": options
    }));
    let catalog = catalog();
    let none = Plan::new("p", "2451");
    let two = Plan::new("p", "2451")
        .with_specialisation("B", "2525")
        .with_specialisation("B", "2527");
    let short = run(&sr7, &none, &catalog).await;
    ensure(short.is_error(), "no program chosen")?;
    ensure(short.relevant() == ["2525", "2526", "2527"], "unmatched options listed")?;
    let over = run(&sr7, &two, &catalog).await;
    ensure(over.is_error(), "SR7 excess is an error")?;
    ensure(over.relevant() == ["2525", "2527"], "matched options listed")?;
    let surplus = run(&sr8, &two, &catalog).await;
    ensure(surplus.status() == Status::Warn, "SR8 excess uses surplus severity")
}

#[tokio::test]
async fn unknown_selection_is_placeholder_error() -> TestResult {
    let unknown = rule(json!({"type": "SR99", "part": "A"}));
    ensure(matches!(unknown, SelectionRule::Unknown(_)), "decoded as unknown")?;
    let result = run(&unknown, &Plan::new("p", "2451"), &catalog()).await;
    ensure(result.is_error() && result.part() == Some("A"), "placeholder error at part")
}
