// crates/degree-planner-core/src/runtime/audit.rs
// ============================================================================
// Module: Validation Audit
// Description: Structured audit events emitted during degree validation.
// Purpose: Record what was validated and what was skipped, as JSON lines.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The validator reports one `degree_validated` event per degree and
//! sub-degree, plus events for sub-degrees that are missing, undecodable, or
//! nested too deep, and for rule-logic that does not parse. Sinks decide
//! where events go; write failures are dropped so auditing never changes a
//! validation outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::StatusCounts;

// ============================================================================
// SECTION: Event Names
// ============================================================================

/// A degree's own rules were evaluated.
pub const EVENT_DEGREE_VALIDATED: &str = "degree_validated";
/// A chosen sub-degree has no stored document.
pub const EVENT_SUB_DEGREE_MISSING: &str = "sub_degree_missing";
/// A sub-degree document failed to decode.
pub const EVENT_SUB_DEGREE_INVALID: &str = "sub_degree_invalid";
/// Sub-degree nesting exceeded the configured depth.
pub const EVENT_SUB_DEGREE_DEPTH_EXCEEDED: &str = "sub_degree_depth_exceeded";
/// A rule-logic entry did not parse.
pub const EVENT_RULE_LOGIC_UNPARSEABLE: &str = "rule_logic_unparseable";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Validation audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Degree or sub-degree code.
    pub degree_code: String,
    /// Part the event concerns; empty for a top-level degree.
    pub part: String,
    /// Free-form detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// OK results produced.
    pub ok: usize,
    /// WARN results produced.
    pub warn: usize,
    /// ERROR results produced.
    pub error: usize,
}

impl ValidationAuditEvent {
    /// Creates an event with zero counts and a consistent timestamp.
    #[must_use]
    pub fn new(event: &'static str, degree_code: &str, part: &str) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            degree_code: degree_code.to_string(),
            part: part.to_string(),
            detail: None,
            ok: 0,
            warn: 0,
            error: 0,
        }
    }

    /// Returns the event with `detail` attached.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Returns the event carrying result counts.
    #[must_use]
    pub const fn with_counts(mut self, counts: StatusCounts) -> Self {
        self.ok = counts.ok;
        self.warn = counts.warn;
        self.error = counts.error;
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for validation events.
pub trait ValidationAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ValidationAuditEvent);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record(&self, _event: &ValidationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
#[derive(Debug)]
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ValidationAuditSink for FileAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    /// Recorded events in order.
    events: Mutex<Vec<ValidationAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ValidationAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ValidationAuditSink for MemoryAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
