// crates/degree-planner-core/src/runtime/mod.rs
// ============================================================================
// Module: Degree Planner Runtime
// Description: Rule evaluation, part tree, validator, and supporting sinks.
// Purpose: Validate student plans against degree documents.
// Dependencies: crate::{core, interfaces}, part-logic
// ============================================================================

//! ## Overview
//! Runtime modules evaluate the rule families, arrange rules into the part
//! tree, and drive whole-degree validation including nested sub-degrees.
//! Every entry point goes through [`DegreeValidator`] so callers see one
//! ordering and one set of policies.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod aux_eval;
pub mod catalog;
pub mod context;
pub mod options;
pub mod part_tree;
pub mod select_eval;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use audit::ValidationAuditSink;
pub use catalog::CatalogError;
pub use catalog::InMemoryCatalog;
pub use catalog::MAX_CATALOG_BYTES;
pub use context::RuleContext;
pub use options::DEFAULT_MAX_SUB_DEGREE_DEPTH;
pub use options::SurplusSeverity;
pub use options::UnparseablePolicy;
pub use options::ValidationOptions;
pub use part_tree::PartTree;
pub use part_tree::RuleRef;
pub use validator::DegreeValidator;
