// crates/degree-planner-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog lookup and substitution.
// Purpose: Ensure CLI messages resolve and substitute placeholders.
// Dependencies: degree-planner-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies catalog lookups, placeholder substitution, and key fallback.

use crate::i18n::MessageArg;
use crate::i18n::has_key;
use crate::i18n::translate;

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "input.read_too_large",
        vec![
            MessageArg::new("kind", "catalog"),
            MessageArg::new("path", "catalog.json"),
            MessageArg::new("size", "99"),
            MessageArg::new("limit", "10"),
        ],
    );
    assert_eq!(
        output,
        "Refusing to read catalog at catalog.json because it is 99 bytes (limit 10)."
    );
}

#[test]
fn macro_formats_display_values() {
    let output = crate::t!("validate.summary", ok = 2, warn = 0, error = 1_usize);
    assert_eq!(output, "2 ok, 0 warnings, 1 errors");
}

#[test]
fn missing_key_falls_back_to_key() {
    assert!(!has_key("no.such.key"));
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn missing_argument_leaves_placeholder() {
    let output = translate("config.load_failed", Vec::new());
    assert_eq!(output, "Failed to load config: {error}");
}

#[test]
fn output_stream_labels_exist() {
    for key in ["output.stream.stdout", "output.stream.stderr", "output.stream.unknown"] {
        assert!(has_key(key), "missing {key}");
    }
}
