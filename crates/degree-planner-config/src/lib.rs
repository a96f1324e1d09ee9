// crates/degree-planner-config/src/lib.rs
// ============================================================================
// Module: Degree Planner Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for degree-planner.toml semantics.
// Dependencies: degree-planner-core, serde, toml
// ============================================================================

//! ## Overview
//! `degree-planner-config` defines the configuration model for the degree
//! validator. Loading is strict: oversized, non-UTF-8, malformed or
//! out-of-range configuration is rejected before any validation runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
