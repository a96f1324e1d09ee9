// crates/degree-planner-core/tests/aux_rules.rs
// ============================================================================
// Test Module: Auxiliary Rules
// Coverage: Level limits, program combinations, credit and component rules.
// ============================================================================
//! ## Overview
//! Integration tests for auxiliary rule evaluation.

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

use degree_planner_core::AuxiliaryRule;
use degree_planner_core::InMemoryCatalog;
use degree_planner_core::Plan;
use degree_planner_core::RuleContext;
use degree_planner_core::Status;
use degree_planner_core::ValidateResult;
use degree_planner_core::ValidationOptions;
use serde_json::Value;
use serde_json::json;
use support::TestResult;
use support::courses;
use support::ensure;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes an auxiliary rule document.
fn rule(doc: Value) -> AuxiliaryRule {
    serde_json::from_value(doc).unwrap()
}

/// Evaluates `rule` against `plan` with default options.
async fn run(rule: &AuxiliaryRule, plan: &Plan, catalog: &InMemoryCatalog) -> ValidateResult {
    let options = ValidationOptions::default();
    let ctx = RuleContext::new(plan, catalog, catalog, &options);
    rule.validate(&ctx).await
}

/// Catalog of two-unit courses across levels and disciplines.
fn catalog() -> InMemoryCatalog {
    courses(&[
        ("CSSE1001", 2.0),
        ("CSSE2002", 2.0),
        ("CSSE2010", 2.0),
        ("CSSE3100", 2.0),
        ("MATH2001", 2.0),
        ("MATH2400", 2.0),
        ("COMP3506", 2.0),
        ("STAT1201", 2.0),
    ])
}

// ============================================================================
// SECTION: Level Rules
// ============================================================================

#[tokio::test]
async fn ar1_counts_level_and_higher() -> TestResult {
    let ar1 = rule(json!({"type": "AR1", "part": "A", "n": 6, "level": 2}));
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001", "CSSE2002", "COMP3506"]);
    let result = run(&ar1, &plan, &catalog()).await;
    ensure(result.status() == Status::Error, "4 units at level 2+ is short of 6")?;
    ensure(result.relevant() == ["CSSE2002", "COMP3506"], "counted courses listed")?;
    ensure(result.part() == Some("A"), "result attached to rule part")?;
    let pct = result.percentage().unwrap_or_default();
    ensure((pct - 400.0 / 6.0).abs() < 1e-6, format!("capped percent, got {pct}"))?;
    ensure(
        result.message() == "Expected at least 6 units at level 2 or higher, found 4.",
        result.message().to_string(),
    )
}

#[tokio::test]
async fn ar1_is_monotone_in_matching_courses() -> TestResult {
    let ar1 = rule(json!({"type": "AR1", "n": 4, "level": 2, "or_higher": false}));
    let catalog = catalog();
    let short = Plan::new("p", "2451").with_courses(["CSSE2002"]);
    let enough = short.clone().with_courses(["MATH2001"]);
    let more = enough.clone().with_courses(["MATH2400"]);
    ensure(run(&ar1, &short, &catalog).await.is_error(), "2 units short")?;
    ensure(run(&ar1, &enough, &catalog).await.is_ok(), "4 units satisfy")?;
    ensure(run(&ar1, &more, &catalog).await.is_ok(), "adding courses keeps it satisfied")
}

#[tokio::test]
async fn ar1_rejects_malformed_code() -> TestResult {
    let ar1 = rule(json!({"type": "AR1", "n": 2, "level": 1}));
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001", "BAD"]);
    let result = run(&ar1, &plan, &catalog()).await;
    ensure(result.is_error(), "malformed code is an error")?;
    ensure(result.message() == "Invalid course level format", "message names the problem")?;
    ensure(result.relevant() == ["BAD"], "offending code listed")?;
    ensure(result.percentage().is_none(), "no percentage")
}

#[tokio::test]
async fn ar2_boundary_is_inclusive() -> TestResult {
    let ar2 = rule(json!({"type": "AR2", "n": 4, "level": 2}));
    let catalog = catalog();
    let at_limit = Plan::new("p", "2451").with_courses(["CSSE2002", "MATH2001", "COMP3506"]);
    let over = at_limit.clone().with_courses(["MATH2400"]);
    ensure(run(&ar2, &at_limit, &catalog).await.is_ok(), "exactly N is fine")?;
    let result = run(&ar2, &over, &catalog).await;
    ensure(result.is_error(), "N + 2 exceeds")?;
    ensure(result.percentage() == Some(100.0), "at-most percentage caps at 100")?;
    ensure(!result.relevant().contains(&"COMP3506".to_string()), "other levels ignored")
}

#[tokio::test]
async fn ar3_reports_uncapped_percentage() -> TestResult {
    let ar3 = rule(json!({"type": "AR3", "n": 2, "level": 2, "or_higher": false}));
    let plan = Plan::new("p", "2451").with_courses(["CSSE2002", "CSSE2010"]);
    let result = run(&ar3, &plan, &catalog()).await;
    ensure(result.is_error(), "4 units is not exactly 2")?;
    ensure(result.percentage() == Some(200.0), "exactly-N percentage may exceed 100")
}

#[tokio::test]
async fn ar4_checks_both_bounds() -> TestResult {
    let ar4 = rule(json!({"type": "AR4", "n": 2, "m": 4, "level": 3}));
    let catalog = catalog();
    let none = Plan::new("p", "2451");
    let inside = Plan::new("p", "2451").with_courses(["CSSE3100"]);
    let over = Plan::new("p", "2451").with_courses(["CSSE3100", "COMP3506", "CSSE3100"]);
    let below = run(&ar4, &none, &catalog).await;
    ensure(below.is_error() && below.percentage() == Some(0.0), "below lower bound")?;
    ensure(run(&ar4, &inside, &catalog).await.is_ok(), "within bounds")?;
    let above = run(&ar4, &over, &catalog).await;
    ensure(above.is_error(), "above upper bound")?;
    ensure(above.message().starts_with("Expected at most 4 units"), above.message().to_string())
}

#[tokio::test]
async fn missing_course_counts_zero_units() -> TestResult {
    let ar1 = rule(json!({"type": "AR1", "n": 2, "level": 4}));
    let plan = Plan::new("p", "2451").with_courses(["CSSE4000"]);
    let result = run(&ar1, &plan, &catalog()).await;
    ensure(result.is_error(), "unknown course contributes nothing")?;
    ensure(result.message().ends_with("found 0."), result.message().to_string())
}

// ============================================================================
// SECTION: Program Combination Rules
// ============================================================================

#[tokio::test]
async fn ar5_requires_companion_program() -> TestResult {
    let ar5 = rule(json!({
        "type": "AR5", "part": "B",
        "plan_list_1": [{"code": "2525"}],
        "plan_list_2": [{"code": "2600"}]
    }));
    let catalog = catalog();
    let alone = Plan::new("p", "2451").with_specialisation("B", "2525");
    let paired = alone.clone().with_specialisation("C", "2600");
    let result = run(&ar5, &alone, &catalog).await;
    ensure(result.is_error(), "companion missing")?;
    ensure(result.message() == "Expected 2525 to be with 2600.", result.message().to_string())?;
    ensure(result.relevant() == ["2600"], "companion listed")?;
    ensure(run(&ar5, &paired, &catalog).await.is_ok(), "companion anywhere in plan")
}

#[tokio::test]
async fn ar6_forbids_conflicting_program() -> TestResult {
    let ar6 = rule(json!({
        "type": "AR6", "part": "B",
        "plan_list_1": [{"code": "2525"}],
        "plan_list_2": [{"code": "2600"}, {"code": "2700"}]
    }));
    let plan = Plan::new("p", "2451")
        .with_specialisation("B", "2525")
        .with_specialisation("C", "2700");
    let result = run(&ar6, &plan, &catalog()).await;
    ensure(result.is_error(), "conflict detected")?;
    ensure(result.relevant() == ["2700"], "only the conflicting program listed")?;
    let untriggered = Plan::new("p", "2451").with_specialisation("C", "2700");
    ensure(run(&ar6, &untriggered, &catalog()).await.is_ok(), "list 1 not chosen")
}

#[tokio::test]
async fn ar7_caps_units_per_discipline() -> TestResult {
    let ar7 = rule(json!({"type": "AR7", "n": 4}));
    let plan =
        Plan::new("p", "2451").with_courses(["CSSE1001", "MATH2001", "CSSE2002", "CSSE2010"]);
    let result = run(&ar7, &plan, &catalog()).await;
    ensure(result.is_error(), "six CSSE units exceed four")?;
    ensure(result.relevant() == ["CSSE1001", "CSSE2002", "CSSE2010"], "discipline courses")?;
    ensure(result.percentage() == Some(150.0), "largest group over cap")
}

// ============================================================================
// SECTION: Credit Rules
// ============================================================================

#[tokio::test]
async fn ar9_lists_courses_without_credit() -> TestResult {
    let ar9 = rule(json!({"type": "AR9", "course_list": [{"code": "STAT1201"}]}));
    let plan = Plan::new("p", "2451").with_courses(["CSSE1001", "STAT1201"]);
    let result = run(&ar9, &plan, &catalog()).await;
    ensure(result.is_error(), "excluded course present")?;
    ensure(result.message() == "No credit for STAT1201.", result.message().to_string())?;
    ensure(result.relevant() == ["STAT1201"], "offending course")
}

#[tokio::test]
async fn ar10_and_ar11_depend_on_program() -> TestResult {
    let ar10 = rule(json!({
        "type": "AR10", "part": "B",
        "course_list": [{"code": "MATH2001"}],
        "plan_list": [{"code": "2525"}]
    }));
    let ar11 = rule(json!({
        "type": "AR11", "part": "B",
        "course_list": [{"code": "MATH2001"}],
        "plan_list": [{"code": "2525"}]
    }));
    let catalog = catalog();
    let base = Plan::new("p", "2451").with_courses(["MATH2001"]);
    let completing = base.clone().with_specialisation("B", "2525");
    ensure(run(&ar10, &base, &catalog).await.is_ok(), "AR10 inactive without program")?;
    let result = run(&ar10, &completing, &catalog).await;
    ensure(result.is_error() && result.percentage() == Some(0.0), "AR10 triggered")?;
    ensure(
        result.message() == "No credit for MATH2001 for students completing 2525.",
        result.message().to_string(),
    )?;
    ensure(run(&ar11, &base, &catalog).await.is_error(), "AR11 without program")?;
    ensure(run(&ar11, &completing, &catalog).await.is_ok(), "AR11 with program")
}

#[tokio::test]
async fn ar13_exemption_is_advisory() -> TestResult {
    let ar13 = rule(json!({
        "type": "AR13", "part": "B",
        "plan_list": [{"code": "2525"}],
        "course_list": [{"code": "CSSE2002"}],
        "program_plan_list": [{"code": "2451"}]
    }));
    let plan = Plan::new("p", "2451")
        .with_courses(["CSSE2002"])
        .with_specialisation("B", "2525");
    let result = run(&ar13, &plan, &catalog()).await;
    ensure(result.status() == Status::Warn, "exemption is a warning")?;
    ensure(result.percentage().is_none(), "no percentage")?;
    ensure(result.message().ends_with("CSSE2002 in 2451."), result.message().to_string())
}

#[tokio::test]
async fn ar13_without_programs_omits_scope() -> TestResult {
    let ar13 = rule(json!({
        "type": "AR13", "part": "B",
        "plan_list": [{"code": "2525"}],
        "course_list": [{"code": "CSSE2002"}]
    }));
    let plan = Plan::new("p", "2451")
        .with_courses(["CSSE2002"])
        .with_specialisation("B", "2525");
    let result = run(&ar13, &plan, &catalog()).await;
    ensure(result.status() == Status::Warn, "exemption is a warning")?;
    ensure(
        result.message() == "Students completing 2525 are exempt from CSSE2002.",
        result.message().to_string(),
    )?;
    let unchosen = Plan::new("p", "2451").with_courses(["CSSE2002"]);
    ensure(run(&ar13, &unchosen, &catalog()).await.is_ok(), "no exempt program chosen")
}

// ============================================================================
// SECTION: Substitution and Component Rules
// ============================================================================

#[tokio::test]
async fn ar15_must_and_may_substitution() -> TestResult {
    let must = rule(json!({
        "type": "AR15", "course_list": [{"code": "CSSE1001"}], "must": true,
        "program_plan_list": [{"code": "2451"}], "lists": ["Part B"]
    }));
    let may = rule(json!({
        "type": "AR15", "course_list": [{"code": "CSSE1001"}], "must": false,
        "program_plan_list": [{"code": "2451"}], "lists": ["Part B"]
    }));
    let catalog = catalog();
    let without = Plan::new("p", "2451");
    let with = Plan::new("p", "2451").with_courses(["CSSE1001"]);
    let result = run(&must, &without, &catalog).await;
    ensure(result.is_error(), "MUST substitution missing")?;
    ensure(result.relevant() == ["CSSE1001"], "required course listed")?;
    let result = run(&may, &with, &catalog).await;
    ensure(result.is_ok() && !result.message().is_empty(), "MAY substitution explained")?;
    ensure(result.relevant() == ["CSSE1001"], "substituted course listed")
}

#[tokio::test]
async fn ar16_only_applies_in_scope() -> TestResult {
    let ar16 = rule(json!({
        "type": "AR16", "plan_list": [{"code": "2525"}],
        "course_list_1": [{"code": "CSSE1001"}], "must": true,
        "course_list_2": [{"code": "CSSE2002"}],
        "program_plan_list": [{"code": "2451"}]
    }));
    let catalog = catalog();
    let out_of_scope = Plan::new("p", "2451");
    let in_scope = Plan::new("p", "2451").with_specialisation("B", "2525");
    ensure(run(&ar16, &out_of_scope, &catalog).await.is_ok(), "scope not matched")?;
    ensure(run(&ar16, &in_scope, &catalog).await.is_error(), "scope matched via program")
}

#[tokio::test]
async fn ar18_restricts_dual_component() -> TestResult {
    let ar18 = rule(json!({
        "type": "AR18", "part": "B",
        "course_list": [{"code": "COMP3506"}],
        "program": {"code": "2525", "name": "Computer Science"}
    }));
    let catalog = catalog();
    let elsewhere = Plan::new("p", "2451")
        .with_courses(["COMP3506"])
        .with_specialisation("B", "2600");
    let result = run(&ar18, &elsewhere, &catalog).await;
    ensure(result.is_error(), "course counted outside its component")?;
    ensure(
        result.message()
            == "COMP3506 can only be counted towards the Computer Science component of a dual.",
        result.message().to_string(),
    )?;
    let home = Plan::new("p", "2451")
        .with_courses(["COMP3506"])
        .with_specialisation("B", "2525");
    ensure(run(&ar18, &home, &catalog).await.is_ok(), "course in its component")
}

#[tokio::test]
async fn ar17_substitution_from_lists_is_scoped() -> TestResult {
    let may = rule(json!({
        "type": "AR17", "part": "B", "plan_list": [{"code": "2525"}],
        "course_list": [{"code": "CSSE2002"}], "must": false,
        "program_plan_list": [{"code": "2451"}], "lists": ["List A"]
    }));
    let catalog = catalog();
    let in_scope = Plan::new("p", "2451")
        .with_courses(["CSSE2002"])
        .with_specialisation("B", "2525");
    let result = run(&may, &in_scope, &catalog).await;
    ensure(result.is_ok() && result.percentage() == Some(100.0), "substitution allowed")?;
    ensure(
        result.message() == "CSSE2002 may be substituted in 2525 by a course from List A in 2451.",
        result.message().to_string(),
    )?;
    let out_of_scope = Plan::new("p", "2451").with_courses(["CSSE2002"]);
    ensure(run(&may, &out_of_scope, &catalog).await.message().is_empty(), "scope not matched")?;

    let must = rule(json!({
        "type": "AR17", "part": "B", "plan_list": [{"code": "2525"}],
        "course_list": [{"code": "CSSE2002"}], "must": true, "lists": ["List A"]
    }));
    let missing = Plan::new("p", "2451").with_specialisation("B", "2525");
    let result = run(&must, &missing, &catalog).await;
    ensure(result.is_error(), "required substitution absent")?;
    ensure(result.relevant() == ["CSSE2002"], "required course named")
}

#[tokio::test]
async fn ar19_restricts_component_for_listed_degrees() -> TestResult {
    let ar19 = rule(json!({
        "type": "AR19", "part": "B",
        "plan_list": [{"code": "2451"}],
        "course_list": [{"code": "COMP3506"}],
        "program": {"code": "2525", "name": "Computer Science"}
    }));
    let catalog = catalog();
    let elsewhere = Plan::new("p", "2451")
        .with_courses(["COMP3506"])
        .with_specialisation("B", "2600");
    let result = run(&ar19, &elsewhere, &catalog).await;
    ensure(result.is_error(), "course outside its component")?;
    ensure(result.relevant() == ["COMP3506"], "offending course named")?;
    ensure(result.message().contains("Computer Science component"), result.message().to_string())?;

    let home = Plan::new("p", "2451")
        .with_courses(["COMP3506"])
        .with_specialisation("B", "2525");
    ensure(run(&ar19, &home, &catalog).await.is_ok(), "course in its component")?;
    let other_degree = Plan::new("p", "2460")
        .with_courses(["COMP3506"])
        .with_specialisation("B", "2600");
    ensure(run(&ar19, &other_degree, &catalog).await.is_ok(), "degree not listed")
}

#[tokio::test]
async fn ar20_requires_both_triggers_and_no_second_program() -> TestResult {
    let ar20 = rule(json!({
        "type": "AR20", "part": "B",
        "plan_1": {"code": "2451"},
        "plan_list_1": [{"code": "2525"}],
        "course_list": [{"code": "MATH2400"}],
        "plan_list_2": [{"code": "2600"}]
    }));
    let catalog = catalog();
    let triggered = Plan::new("p", "2451")
        .with_courses(["MATH2400"])
        .with_specialisation("B", "2525");
    let result = run(&ar20, &triggered, &catalog).await;
    ensure(result.is_error(), "plan_1 with plan_list_1 and no plan_list_2")?;
    ensure(
        result.message() == "MATH2400 only counts towards 2600 for students completing 2525.",
        result.message().to_string(),
    )?;

    let with_second = triggered.clone().with_specialisation("B", "2600");
    ensure(run(&ar20, &with_second, &catalog).await.is_ok(), "plan_list_2 chosen")?;
    let other_degree = Plan::new("p", "2460")
        .with_courses(["MATH2400"])
        .with_specialisation("B", "2525");
    ensure(run(&ar20, &other_degree, &catalog).await.is_ok(), "plan_1 not matched")?;
    let no_trigger = Plan::new("p", "2451")
        .with_courses(["MATH2400"])
        .with_specialisation("B", "2600");
    ensure(run(&ar20, &no_trigger, &catalog).await.is_ok(), "plan_list_1 not chosen")
}

#[tokio::test]
async fn unknown_rule_is_placeholder_error() -> TestResult {
    let unknown = rule(json!({"type": "AR8", "part": "C", "text": "see faculty"}));
    ensure(matches!(unknown, AuxiliaryRule::Unknown(_)), "decoded as unknown")?;
    let result = run(&unknown, &Plan::new("p", "2451"), &catalog()).await;
    ensure(result.is_error(), "placeholder is an error")?;
    ensure(result.message().contains("see faculty"), "handbook text surfaced")?;
    ensure(result.part() == Some("C"), "part preserved")
}
