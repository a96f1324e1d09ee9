// crates/degree-planner-core/src/lib.rs
// ============================================================================
// Module: Degree Planner Core Library
// Description: Public API surface for degree requirement validation.
// Purpose: Expose core types, lookup interfaces, and the validator.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Degree planner core checks a student's course plan against the stored
//! requirement documents of a degree and of every major, minor, or
//! specialisation chosen within it. Each rule yields one result with a
//! status, a completion percentage, and the course or program codes the
//! student should act on.
//!
//! Catalogue access goes through the async [`CourseLookup`] and
//! [`DegreeLookup`] traits; [`InMemoryCatalog`] implements both.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CourseInfo;
pub use interfaces::CourseLookup;
pub use interfaces::DegreeLookup;
pub use interfaces::DegreeRecord;
pub use runtime::CatalogError;
pub use runtime::DEFAULT_MAX_SUB_DEGREE_DEPTH;
pub use runtime::DegreeValidator;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryCatalog;
pub use runtime::MAX_CATALOG_BYTES;
pub use runtime::MemoryAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::PartTree;
pub use runtime::RuleContext;
pub use runtime::RuleRef;
pub use runtime::StderrAuditSink;
pub use runtime::SurplusSeverity;
pub use runtime::UnparseablePolicy;
pub use runtime::ValidationAuditEvent;
pub use runtime::ValidationAuditSink;
pub use runtime::ValidationOptions;
