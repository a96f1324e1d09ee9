// crates/degree-planner-cli/src/lib.rs
// ============================================================================
// Module: Degree Planner CLI Library
// Description: Shared helpers for the degree-planner command-line interface.
// Purpose: Provide reusable components (i18n) for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses the CLI message catalog. The binary entry point
//! (`src/main.rs`) routes all user-facing output through it.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and translation helpers.
pub mod i18n;
