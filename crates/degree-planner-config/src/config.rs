// crates/degree-planner-config/src/config.rs
// ============================================================================
// Module: Degree Planner Configuration
// Description: Configuration loading and validation for the degree validator.
// Purpose: Provide strict config parsing with hard limits.
// Dependencies: degree-planner-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; an empty file yields the engine defaults.
//! Invalid configuration fails closed with a [`ConfigError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use degree_planner_core::DEFAULT_MAX_SUB_DEGREE_DEPTH;
use degree_planner_core::FileAuditSink;
use degree_planner_core::NoopAuditSink;
use degree_planner_core::StderrAuditSink;
use degree_planner_core::SurplusSeverity;
use degree_planner_core::UnparseablePolicy;
use degree_planner_core::ValidationAuditSink;
use degree_planner_core::ValidationOptions;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "degree-planner.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DEGREE_PLANNER_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Smallest accepted sub-degree nesting limit.
pub const MIN_SUB_DEGREE_DEPTH: usize = 1;
/// Largest accepted sub-degree nesting limit.
pub const MAX_SUB_DEGREE_DEPTH: usize = 64;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Degree planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Validation policy switches.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl PlannerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validation.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the engine options described by this configuration.
    #[must_use]
    pub const fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            surplus_severity: self.validation.surplus_severity,
            unparseable_logic: self.validation.unparseable_logic,
            max_sub_degree_depth: self.validation.max_sub_degree_depth,
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened and
    /// [`ConfigError::Invalid`] when a file sink has no path.
    pub fn audit_sink(&self) -> Result<Box<dyn ValidationAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::None => Ok(Box::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Box::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(missing_audit_path)?;
                let sink = FileAuditSink::new(path)
                    .map_err(|err| ConfigError::Io(format!("audit.path: {err}")))?;
                Ok(Box::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Validation Config
// ============================================================================

/// Policy switches for rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Status for exceeding a selection maximum.
    #[serde(default)]
    pub surplus_severity: SurplusSeverity,
    /// Policy for rule-logic entries that fail to parse.
    #[serde(default)]
    pub unparseable_logic: UnparseablePolicy,
    /// Maximum sub-degree nesting depth.
    #[serde(default = "default_max_sub_degree_depth")]
    pub max_sub_degree_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            surplus_severity: SurplusSeverity::default(),
            unparseable_logic: UnparseablePolicy::default(),
            max_sub_degree_depth: default_max_sub_degree_depth(),
        }
    }
}

impl ValidationConfig {
    /// Validates validation configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SUB_DEGREE_DEPTH..=MAX_SUB_DEGREE_DEPTH).contains(&self.max_sub_degree_depth) {
            return Err(ConfigError::Invalid(format!(
                "validation.max_sub_degree_depth must be between {MIN_SUB_DEGREE_DEPTH} and \
                 {MAX_SUB_DEGREE_DEPTH}"
            )));
        }
        Ok(())
    }
}

/// Default sub-degree nesting limit.
const fn default_max_sub_degree_depth() -> usize {
    DEFAULT_MAX_SUB_DEGREE_DEPTH
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// Append-only JSON lines file at `audit.path`.
    File,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output file for the file sink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, None) => Err(missing_audit_path()),
            (AuditSinkKind::File, Some(path)) => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid("audit.path must not be empty".to_string()));
                }
                validate_path(path)
            }
            (AuditSinkKind::None | AuditSinkKind::Stderr, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink = \"file\"".to_string(),
            )),
            (AuditSinkKind::None | AuditSinkKind::Stderr, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Error for a file sink without a path.
fn missing_audit_path() -> ConfigError {
    ConfigError::Invalid("audit.sink = \"file\" requires audit.path".to_string())
}

/// Resolves the config path from the argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
