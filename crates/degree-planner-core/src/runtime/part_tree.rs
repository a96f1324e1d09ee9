// crates/degree-planner-core/src/runtime/part_tree.rs
// ============================================================================
// Module: Part Tree
// Description: Dotted-part hierarchy of a degree's rules and its evaluator.
// Purpose: Evaluate parts, subtrees, and rule-logic requirements.
// Dependencies: part-logic, crate::{core, runtime::context}
// ============================================================================

//! ## Overview
//! A [`PartTree`] is built per validation from one degree's rules and borrows
//! them. Nodes are keyed by dotted segment: the rule at part `A.1.b` lives at
//! root → `A` → `A.1` → `A.1.b`. Children are visited in key order so
//! evaluation does not depend on insertion order.
//!
//! Requirements from `part-logic` evaluate over the tree:
//! - `And` concatenates its children's results.
//! - `Or` yields the first branch whose results are all OK; when no branch
//!   is fully OK it yields all branch results plus one ERROR for the
//!   alternative.
//! - `Atomic` evaluates the subtree of the referenced part.
//! - `Other` follows the configured [`UnparseablePolicy`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use part_logic::Requirement;
use part_logic::strip_part_prefix;

use crate::core::AuxiliaryRule;
use crate::core::Degree;
use crate::core::SelectionRule;
use crate::core::Status;
use crate::core::ValidateResult;
use crate::core::codes::is_strict_descendant;
use crate::core::codes::join_part;
use crate::core::codes::segments;
use crate::runtime::context::RuleContext;
use crate::runtime::options::UnparseablePolicy;

/// Boxed future used for recursive requirement evaluation.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ============================================================================
// SECTION: Rule References
// ============================================================================

/// Borrowed rule of either family.
#[derive(Debug, Clone, Copy)]
pub enum RuleRef<'a> {
    /// Auxiliary rule.
    Auxiliary(&'a AuxiliaryRule),
    /// Selection rule.
    Selection(&'a SelectionRule),
}

impl<'a> RuleRef<'a> {
    /// Returns the rule's part.
    #[must_use]
    pub fn part(self) -> &'a str {
        match self {
            Self::Auxiliary(rule) => rule.part(),
            Self::Selection(rule) => rule.part(),
        }
    }

    /// Evaluates the rule.
    pub async fn validate(self, ctx: &RuleContext<'_>) -> ValidateResult {
        match self {
            Self::Auxiliary(rule) => rule.validate(ctx).await,
            Self::Selection(rule) => rule.validate(ctx).await,
        }
    }
}

/// Iterates a degree's rules in declaration order: auxiliary, then selection.
pub fn declared_rules(degree: &Degree) -> impl Iterator<Item = RuleRef<'_>> {
    degree
        .aux
        .iter()
        .map(RuleRef::Auxiliary)
        .chain(degree.srs.iter().map(RuleRef::Selection))
}

// ============================================================================
// SECTION: Tree
// ============================================================================

/// One node of the part hierarchy.
#[derive(Debug)]
struct PartNode<'a> {
    /// Absolute part of this node.
    part: String,
    /// Rules attached exactly here, in insertion order.
    rules: Vec<RuleRef<'a>>,
    /// Children keyed by their last segment.
    children: BTreeMap<String, PartNode<'a>>,
}

impl<'a> PartNode<'a> {
    /// Creates an empty node.
    const fn new(part: String) -> Self {
        Self {
            part,
            rules: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Appends this node's rules and its subtree's rules in pre-order.
    fn collect(&self, out: &mut Vec<RuleRef<'a>>) {
        out.extend(self.rules.iter().copied());
        for child in self.children.values() {
            child.collect(out);
        }
    }
}

/// Rules of one degree arranged by dotted part.
///
/// # Invariants
/// - The root node has the empty part.
/// - A node's part is its parent's part joined with its key.
#[derive(Debug)]
pub struct PartTree<'a> {
    /// Root node.
    root: PartNode<'a>,
}

impl Default for PartTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PartTree<'a> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: PartNode::new(String::new()),
        }
    }

    /// Builds a tree from a degree's rules, auxiliary rules first.
    #[must_use]
    pub fn from_degree(degree: &'a Degree) -> Self {
        let mut tree = Self::new();
        for rule in declared_rules(degree) {
            tree.insert(rule);
        }
        tree
    }

    /// Attaches `rule` at its part, creating intermediate nodes.
    ///
    /// A rule whose part does not descend from the root is ignored.
    pub fn insert(&mut self, rule: RuleRef<'a>) {
        let target = rule.part();
        let mut node = &mut self.root;
        loop {
            if node.part == target {
                node.rules.push(rule);
                return;
            }
            if !is_strict_descendant(&node.part, target) {
                return;
            }
            let rest = if node.part.is_empty() {
                target
            } else {
                target
                    .strip_prefix(node.part.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .unwrap_or_default()
            };
            let segment = rest.split('.').next().unwrap_or_default().to_string();
            let child_part = join_part(&node.part, &segment);
            node = node.children.entry(segment).or_insert_with(|| PartNode::new(child_part));
        }
    }

    /// Finds the node for `part`.
    fn find(&self, part: &str) -> Option<&PartNode<'a>> {
        let mut node = &self.root;
        for segment in segments(part) {
            node = node.children.get(segment)?;
        }
        (node.part == part).then_some(node)
    }

    /// Returns the rules of `part` and its subtree in evaluation order.
    #[must_use]
    pub fn rules_under(&self, part: &str) -> Vec<RuleRef<'a>> {
        let mut rules = Vec::new();
        if let Some(node) = self.find(part) {
            node.collect(&mut rules);
        }
        rules
    }

    /// Returns the rules attached exactly at `part`.
    #[must_use]
    pub fn rules_at(&self, part: &str) -> &[RuleRef<'a>] {
        self.find(part).map(|node| node.rules.as_slice()).unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Evaluates every rule at `part` and below, own rules first.
    pub async fn evaluate(&self, part: &str, ctx: &RuleContext<'_>) -> Vec<ValidateResult> {
        let mut results = Vec::new();
        for rule in self.rules_under(part) {
            results.push(rule.validate(ctx).await);
        }
        results
    }

    /// Evaluates only the rules attached exactly at `part`.
    pub async fn evaluate_exact(&self, part: &str, ctx: &RuleContext<'_>) -> Vec<ValidateResult> {
        let mut results = Vec::new();
        for rule in self.rules_at(part) {
            results.push(rule.validate(ctx).await);
        }
        results
    }

    /// Evaluates a rule-logic requirement with atoms relative to `prefix`.
    pub fn evaluate_requirement<'s>(
        &'s self,
        requirement: &'s Requirement,
        ctx: &'s RuleContext<'_>,
        prefix: &'s str,
    ) -> BoxFuture<'s, Vec<ValidateResult>> {
        Box::pin(async move {
            match requirement {
                Requirement::And(children) => {
                    let mut results = Vec::new();
                    for child in children {
                        results.extend(self.evaluate_requirement(child, ctx, prefix).await);
                    }
                    results
                }
                Requirement::Or(children) => {
                    let mut branches = Vec::with_capacity(children.len());
                    for child in children {
                        branches.push(self.evaluate_requirement(child, ctx, prefix).await);
                    }
                    if let Some(index) =
                        branches.iter().position(|branch| branch.iter().all(ValidateResult::is_ok))
                    {
                        return branches.swap_remove(index);
                    }
                    let mut results: Vec<ValidateResult> = branches.into_iter().flatten().collect();
                    results.push(
                        ValidateResult::new(
                            Status::Error,
                            None,
                            format!("None of the alternatives is satisfied: {requirement}"),
                            requirement.atoms().into_iter().map(str::to_string).collect(),
                        )
                        .with_part(prefix),
                    );
                    results
                }
                Requirement::Atomic(atom) => {
                    let part = join_part(prefix, strip_part_prefix(atom));
                    self.evaluate(&part, ctx).await
                }
                Requirement::Other(raw) => match ctx.options.unparseable_logic {
                    UnparseablePolicy::Error => vec![
                        ValidateResult::new(
                            Status::Error,
                            None,
                            format!("Unable to interpret rule logic: {raw}"),
                            Vec::new(),
                        )
                        .with_part(prefix),
                    ],
                    UnparseablePolicy::Skip => Vec::new(),
                },
            }
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aux_rule::Ar7;

    /// Discipline-cap rule at `part`.
    fn ar7(part: &str) -> AuxiliaryRule {
        AuxiliaryRule::Ar7(Ar7 {
            part: part.to_string(),
            n: 8,
        })
    }

    #[test]
    fn subtree_respects_segment_boundaries() {
        let rules = [ar7("B"), ar7("B.1"), ar7("B.10"), ar7("B.1.a")];
        let mut tree = PartTree::new();
        for rule in &rules {
            tree.insert(RuleRef::Auxiliary(rule));
        }
        let parts: Vec<&str> = tree.rules_under("B.1").into_iter().map(RuleRef::part).collect();
        assert_eq!(parts, vec!["B.1", "B.1.a"]);
        assert_eq!(tree.rules_at("B").len(), 1);
        assert!(tree.rules_under("C").is_empty());
    }

    #[test]
    fn root_collects_everything() {
        let rules = [ar7(""), ar7("A"), ar7("A.2")];
        let mut tree = PartTree::new();
        for rule in &rules {
            tree.insert(RuleRef::Auxiliary(rule));
        }
        assert_eq!(tree.rules_under("").len(), 3);
        assert_eq!(tree.rules_at("").len(), 1);
    }
}
