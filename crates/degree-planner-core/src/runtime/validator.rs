// crates/degree-planner-core/src/runtime/validator.rs
// ============================================================================
// Module: Degree Validator
// Description: Validates a plan against a degree and its chosen sub-degrees.
// Purpose: Produce the ordered result list for one plan.
// Dependencies: part-logic, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`DegreeValidator::validate`] evaluates the degree's own rules, then walks
//! the sub-degrees chosen in the plan depth-first. The walk uses an explicit
//! stack so nesting depth is bounded by configuration, not by the call stack.
//!
//! Own rules are evaluated in one of two ways:
//! - With rule-logic, each entry is parsed and evaluated over the part tree.
//!   Rules whose part no rule-logic atom covers are then evaluated directly
//!   in declaration order.
//! - Without rule-logic, each distinct rule part is evaluated exactly once,
//!   auxiliary parts first.
//!
//! A sub-degree chosen at part `K` is owned by the nearest degree whose part
//! is a strict ancestor of `K`. It is looked up for the parent's handbook
//! year and validated with every part prefixed by `K`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use part_logic::Requirement;
use part_logic::parse_or_other;
use part_logic::strip_part_prefix;

use crate::core::Degree;
use crate::core::Plan;
use crate::core::Status;
use crate::core::StatusCounts;
use crate::core::ValidateResult;
use crate::core::codes::covers;
use crate::core::codes::is_strict_descendant;
use crate::core::codes::join_part;
use crate::interfaces::CourseLookup;
use crate::interfaces::DegreeLookup;
use crate::runtime::audit::EVENT_DEGREE_VALIDATED;
use crate::runtime::audit::EVENT_RULE_LOGIC_UNPARSEABLE;
use crate::runtime::audit::EVENT_SUB_DEGREE_DEPTH_EXCEEDED;
use crate::runtime::audit::EVENT_SUB_DEGREE_INVALID;
use crate::runtime::audit::EVENT_SUB_DEGREE_MISSING;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::ValidationAuditEvent;
use crate::runtime::audit::ValidationAuditSink;
use crate::runtime::context::RuleContext;
use crate::runtime::options::ValidationOptions;
use crate::runtime::part_tree::PartTree;
use crate::runtime::part_tree::declared_rules;

// ============================================================================
// SECTION: Walk Frames
// ============================================================================

/// Pending sub-degree in the depth-first walk.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SubDegreeFrame {
    /// Specialisation part the sub-degree is chosen at.
    key: String,
    /// Sub-degree program code.
    code: String,
    /// Handbook year inherited from the parent.
    year: u32,
    /// Nesting depth; direct children of the top-level degree are 1.
    depth: usize,
}

/// Outcome of resolving a frame.
enum Resolved {
    /// Prefixed sub-degree ready to validate.
    Degree(Box<Degree>),
    /// Single result standing in for the sub-degree.
    Failed(ValidateResult),
    /// Nothing to append.
    Missing,
}

/// Returns the sub-degree frames owned by `degree`, in plan order.
///
/// A key is owned when it strictly descends from the degree's part and no
/// other specialisation key lies strictly between them.
fn owned_frames(degree: &Degree, plan: &Plan, depth: usize) -> Vec<SubDegreeFrame> {
    let mut frames = Vec::new();
    for (key, codes) in &plan.specialisations {
        if !is_strict_descendant(&degree.part, key) {
            continue;
        }
        let nested = plan.specialisations.keys().any(|other| {
            is_strict_descendant(&degree.part, other) && is_strict_descendant(other, key)
        });
        if nested {
            continue;
        }
        frames.extend(codes.iter().map(|code| SubDegreeFrame {
            key: key.clone(),
            code: code.clone(),
            year: degree.year,
            depth,
        }));
    }
    frames
}

/// Returns each distinct rule part once, auxiliary parts first.
fn distinct_parts(degree: &Degree) -> Vec<&str> {
    let mut parts: Vec<&str> = Vec::new();
    for rule in declared_rules(degree) {
        if !parts.contains(&rule.part()) {
            parts.push(rule.part());
        }
    }
    parts
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validates plans against degrees using injected lookups.
pub struct DegreeValidator<'a> {
    /// Course catalogue.
    courses: &'a dyn CourseLookup,
    /// Degree documents.
    degrees: &'a dyn DegreeLookup,
    /// Policy switches.
    options: ValidationOptions,
    /// Audit sink.
    audit: &'a dyn ValidationAuditSink,
}

impl<'a> DegreeValidator<'a> {
    /// Creates a validator with default options and no auditing.
    #[must_use]
    pub fn new(courses: &'a dyn CourseLookup, degrees: &'a dyn DegreeLookup) -> Self {
        Self {
            courses,
            degrees,
            options: ValidationOptions::default(),
            audit: &NoopAuditSink,
        }
    }

    /// Returns the validator with `options`.
    #[must_use]
    pub const fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the validator recording to `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: &'a dyn ValidationAuditSink) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the active options.
    #[must_use]
    pub const fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validates `plan` against `degree` and its chosen sub-degrees.
    ///
    /// Results list the degree's own results first, then one block per owned
    /// sub-degree in sorted part order, depth-first.
    pub async fn validate(&self, degree: &Degree, plan: &Plan) -> Vec<ValidateResult> {
        let ctx = RuleContext::new(plan, self.courses, self.degrees, &self.options);
        let mut results = self.validate_own(degree, &ctx).await;
        let mut stack: Vec<SubDegreeFrame> = owned_frames(degree, plan, 1);
        stack.reverse();
        while let Some(frame) = stack.pop() {
            match self.resolve(&frame).await {
                Resolved::Degree(sub_degree) => {
                    results.extend(self.validate_own(&sub_degree, &ctx).await);
                    let children = owned_frames(&sub_degree, plan, frame.depth + 1);
                    stack.extend(children.into_iter().rev());
                }
                Resolved::Failed(result) => results.push(result),
                Resolved::Missing => {}
            }
        }
        results
    }

    /// Looks up, decodes, and prefixes the sub-degree of `frame`.
    async fn resolve(&self, frame: &SubDegreeFrame) -> Resolved {
        if frame.depth > self.options.max_sub_degree_depth {
            let max_depth = self.options.max_sub_degree_depth;
            self.audit.record(
                &ValidationAuditEvent::new(EVENT_SUB_DEGREE_DEPTH_EXCEEDED, &frame.code, &frame.key)
                    .with_detail(format!("depth {} exceeds {max_depth}", frame.depth)),
            );
            return Resolved::Failed(
                ValidateResult::new(
                    Status::Error,
                    None,
                    format!(
                        "Sub-degree {} at {} exceeds the maximum nesting depth of {max_depth}.",
                        frame.code, frame.key
                    ),
                    vec![frame.code.clone()],
                )
                .with_part(&frame.key),
            );
        }
        let Some(record) = self.degrees.degree(&frame.code, frame.year).await else {
            self.audit.record(
                &ValidationAuditEvent::new(EVENT_SUB_DEGREE_MISSING, &frame.code, &frame.key)
                    .with_detail(format!("no document for year {}", frame.year)),
            );
            return Resolved::Missing;
        };
        match record.degree() {
            Ok(sub_degree) => Resolved::Degree(Box::new(sub_degree.with_part_prefix(&frame.key))),
            Err(err) => {
                self.audit.record(
                    &ValidationAuditEvent::new(EVENT_SUB_DEGREE_INVALID, &frame.code, &frame.key)
                        .with_detail(err.to_string()),
                );
                Resolved::Failed(
                    ValidateResult::new(
                        Status::Error,
                        None,
                        format!(
                            "Sub-degree {} ({}) could not be read: {err}",
                            frame.code, frame.year
                        ),
                        vec![frame.code.clone()],
                    )
                    .with_part(&frame.key),
                )
            }
        }
    }

    /// Evaluates one degree's own rules and records the outcome.
    async fn validate_own(&self, degree: &Degree, ctx: &RuleContext<'_>) -> Vec<ValidateResult> {
        let tree = PartTree::from_degree(degree);
        let mut results = Vec::new();
        if degree.rule_logic.is_empty() {
            for part in distinct_parts(degree) {
                results.extend(tree.evaluate_exact(part, ctx).await);
            }
        } else {
            let mut covered: Vec<String> = Vec::new();
            for entry in &degree.rule_logic {
                let requirement = parse_or_other(entry);
                if let Requirement::Other(raw) = &requirement {
                    self.audit.record(
                        &ValidationAuditEvent::new(
                            EVENT_RULE_LOGIC_UNPARSEABLE,
                            &degree.code,
                            &degree.part,
                        )
                        .with_detail(raw.clone()),
                    );
                }
                covered.extend(
                    requirement
                        .atoms()
                        .into_iter()
                        .map(|atom| join_part(&degree.part, strip_part_prefix(atom))),
                );
                results.extend(tree.evaluate_requirement(&requirement, ctx, &degree.part).await);
            }
            for rule in declared_rules(degree) {
                if !covered.iter().any(|atom| covers(atom, rule.part())) {
                    results.push(rule.validate(ctx).await);
                }
            }
        }
        self.audit.record(
            &ValidationAuditEvent::new(EVENT_DEGREE_VALIDATED, &degree.code, &degree.part)
                .with_counts(StatusCounts::tally(&results)),
        );
        results
    }
}

// ============================================================================
// SECTION: Convenience
// ============================================================================

impl Degree {
    /// Validates `plan` against this degree with default options.
    pub async fn validate(
        &self,
        plan: &Plan,
        courses: &dyn CourseLookup,
        degrees: &dyn DegreeLookup,
    ) -> Vec<ValidateResult> {
        DegreeValidator::new(courses, degrees).validate(self, plan).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
