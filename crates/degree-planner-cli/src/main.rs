// crates/degree-planner-cli/src/main.rs
// ============================================================================
// Module: Degree Planner CLI Entry Point
// Description: Command dispatcher for plan validation and rule-logic tools.
// Purpose: Validate study plans from JSON files and inspect rule-logic text.
// Dependencies: clap, degree-planner-config, degree-planner-core, part-logic, tokio.
// ============================================================================

//! ## Overview
//! `degree-planner validate` checks a plan against a degree document using an
//! optional JSON catalog of courses and sub-degrees, printing the results as
//! JSON and exiting non-zero when any result is an error.
//! `degree-planner logic` parses one rule-logic expression and prints its
//! canonical form, referenced atoms, and tree. All input files are read with
//! hard size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use degree_planner_cli::t;
use degree_planner_config::CONFIG_ENV_VAR;
use degree_planner_config::DEFAULT_CONFIG_NAME;
use degree_planner_config::PlannerConfig;
use degree_planner_core::Degree;
use degree_planner_core::DegreeValidator;
use degree_planner_core::InMemoryCatalog;
use degree_planner_core::MAX_CATALOG_BYTES;
use degree_planner_core::Plan;
use degree_planner_core::StatusCounts;
use degree_planner_core::ValidateResult;
use part_logic::Requirement;
use part_logic::parse_requirement;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a degree document input.
const MAX_DEGREE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum size of a plan input.
const MAX_PLAN_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "degree-planner", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a plan against a degree document.
    Validate(ValidateCommand),
    /// Parse a rule-logic expression and print its structure.
    Logic(LogicCommand),
}

/// Arguments for plan validation.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Path to the degree document JSON file.
    #[arg(long, value_name = "PATH")]
    degree: PathBuf,
    /// Path to the plan JSON file.
    #[arg(long, value_name = "PATH")]
    plan: PathBuf,
    /// Path to a catalog JSON file with courses and sub-degrees.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Path to the config file (defaults to `DEGREE_PLANNER_CONFIG` or
    /// `degree-planner.toml` when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for rule-logic inspection.
#[derive(Args, Debug)]
struct LogicCommand {
    /// Rule-logic expression, e.g. `Part A and (Part B or Part C)`.
    #[arg(value_name = "EXPR")]
    expression: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Validate(command) => command_validate(&command).await,
        Commands::Logic(command) => command_logic(&command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Executes plan validation.
async fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let degree_text = read_text_input(&command.degree, "degree", MAX_DEGREE_BYTES)?;
    let degree = Degree::from_json(&degree_text)
        .map_err(|err| decode_error("degree", &command.degree, &err))?;
    let plan_text = read_text_input(&command.plan, "plan", MAX_PLAN_BYTES)?;
    let plan: Plan = serde_json::from_str(&plan_text)
        .map_err(|err| decode_error("plan", &command.plan, &err))?;
    let catalog = match &command.catalog {
        Some(path) => {
            let text = read_text_input(path, "catalog", MAX_CATALOG_BYTES)?;
            InMemoryCatalog::from_json(&text).map_err(|err| decode_error("catalog", path, &err))?
        }
        None => InMemoryCatalog::new(),
    };
    let audit = config
        .audit_sink()
        .map_err(|err| CliError::new(t!("audit.open_failed", error = err)))?;

    let validator = DegreeValidator::new(&catalog, &catalog)
        .with_options(config.validation_options())
        .with_audit(audit.as_ref());
    let results = validator.validate(&degree, &plan).await;

    let counts = StatusCounts::tally(&results);
    write_json_value(&results_json(&results)?)?;
    write_stderr_line(&t!(
        "validate.summary",
        ok = counts.ok,
        warn = counts.warn,
        error = counts.error
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(if has_errors(&results) { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Loads configuration from an explicit path, the environment, or the
/// default file; falls back to defaults when none of these exist.
fn load_config(path: Option<&Path>) -> CliResult<PlannerConfig> {
    let configured = path.is_some()
        || std::env::var_os(CONFIG_ENV_VAR).is_some()
        || Path::new(DEFAULT_CONFIG_NAME).is_file();
    if !configured {
        return Ok(PlannerConfig::default());
    }
    PlannerConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Serializes validation results as a JSON array.
fn results_json(results: &[ValidateResult]) -> CliResult<Value> {
    serde_json::to_value(results)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))
}

/// Returns whether any result is an error.
fn has_errors(results: &[ValidateResult]) -> bool {
    results.iter().any(ValidateResult::is_error)
}

// ============================================================================
// SECTION: Logic Command
// ============================================================================

/// Executes rule-logic inspection.
fn command_logic(command: &LogicCommand) -> CliResult<ExitCode> {
    let requirement = parse_requirement(&command.expression)
        .map_err(|err| CliError::new(t!("logic.parse_failed", error = err)))?;
    write_json_value(&logic_summary(&requirement)?)?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the canonical form, atom list, and tree for a requirement.
fn logic_summary(requirement: &Requirement) -> CliResult<Value> {
    let tree = serde_json::to_value(requirement)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    Ok(json!({
        "canonical": requirement.to_string(),
        "atoms": requirement.atoms(),
        "tree": tree,
    }))
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a bounded UTF-8 input file.
fn read_text_input(path: &Path, kind: &str, max_bytes: usize) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(error) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = error
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    String::from_utf8(bytes).map_err(|_| {
        CliError::new(t!("input.utf8_invalid", kind = kind, path = path.display()))
    })
}

/// Formats a decode failure for an input file.
fn decode_error(kind: &str, path: &Path, error: &impl std::fmt::Display) -> CliError {
    CliError::new(t!("input.decode_failed", kind = kind, path = path.display(), error = error))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes pretty JSON to stdout followed by a newline.
fn write_json_value(value: &Value) -> CliResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    bytes.push(b'\n');
    let mut stdout = std::io::stdout();
    stdout.write_all(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
