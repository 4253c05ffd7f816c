// audit-pilot-cli/src/main.rs
// ============================================================================
// Module: Audit Pilot CLI Entry Point
// Description: Command dispatcher for repository audit workflows.
// Purpose: Drive ingest, browse, analyze, fuzz, and attestation from a shell.
// Dependencies: audit-pilot-client, audit-pilot-config, audit-pilot-core,
//               clap, thiserror, time, tokio.
// ============================================================================

//! ## Overview
//! The Audit Pilot CLI drives audit sessions against a remote audit service.
//! Each subcommand builds a fresh session over the configured gateway; the
//! `audit` subcommand runs the whole pipeline and attests the rendered report
//! on the ledger. Security posture: repository URLs and report files are
//! untrusted inputs and are validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use audit_pilot_client::AuditGateway;
use audit_pilot_client::GatewayConfig;
use audit_pilot_client::SessionDriver;
use audit_pilot_config::AuditPilotConfig;
use audit_pilot_core::AttestationRecord;
use audit_pilot_core::AttestationService;
use audit_pilot_core::BrowseContents;
use audit_pilot_core::BrowseView;
use audit_pilot_core::FilePreview;
use audit_pilot_core::FuzzOutcome;
use audit_pilot_core::FuzzPlan;
use audit_pilot_core::OperationKind;
use audit_pilot_core::RepoRef;
use audit_pilot_core::RepoSummary;
use audit_pilot_core::ScanReport;
use audit_pilot_core::SessionPhase;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a report file submitted for attestation.
const MAX_REPORT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "audit-pilot", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Configuration file path (defaults to `audit-pilot.toml`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Audit service endpoint, overriding the configured one.
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a repository and print its eligibility classification.
    Ingest(IngestCommand),
    /// List a directory or preview a file in an eligible repository.
    Contents(ContentsCommand),
    /// Run the static scan against an eligible repository.
    Analyze(AnalyzeCommand),
    /// Run a bounded fuzz pass against one instruction.
    Fuzz(FuzzCommand),
    /// Attest a report file on the ledger.
    Attest(AttestCommand),
    /// Run the full audit pipeline and attest the rendered report.
    Audit(AuditCommand),
}

/// Arguments for the `ingest` subcommand.
#[derive(Args, Debug)]
struct IngestCommand {
    /// Repository URL to ingest.
    #[arg(long, value_name = "URL")]
    repo: String,
}

/// Arguments for the `contents` subcommand.
#[derive(Args, Debug)]
struct ContentsCommand {
    /// Repository URL to browse.
    #[arg(long, value_name = "URL")]
    repo: String,
    /// Repository-relative path to resolve (defaults to the root).
    #[arg(long, value_name = "PATH", default_value = "")]
    path: String,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
struct AnalyzeCommand {
    /// Repository URL to scan.
    #[arg(long, value_name = "URL")]
    repo: String,
}

/// Arguments for the `fuzz` subcommand.
#[derive(Args, Debug)]
struct FuzzCommand {
    /// Repository URL to fuzz.
    #[arg(long, value_name = "URL")]
    repo: String,
    /// Instruction to target (defaults to the configured instruction).
    #[arg(long, value_name = "NAME")]
    instruction: Option<String>,
    /// Time budget in seconds (defaults to the configured budget).
    #[arg(long = "timeout-seconds", value_name = "SECONDS")]
    timeout_seconds: Option<u64>,
}

/// Arguments for the `attest` subcommand.
#[derive(Args, Debug)]
struct AttestCommand {
    /// Path of the report file to attest.
    #[arg(long, value_name = "PATH")]
    report: PathBuf,
}

/// Arguments for the `audit` subcommand.
#[derive(Args, Debug)]
struct AuditCommand {
    /// Repository URL to audit.
    #[arg(long, value_name = "URL")]
    repo: String,
    /// Instruction to fuzz (defaults to the configured instruction).
    #[arg(long, value_name = "NAME")]
    instruction: Option<String>,
    /// Fuzz time budget in seconds (defaults to the configured budget).
    #[arg(long = "timeout-seconds", value_name = "SECONDS")]
    timeout_seconds: Option<u64>,
    /// Report timestamp override; the current UTC time when omitted.
    #[arg(long = "generated-at", value_name = "TIMESTAMP")]
    generated_at: Option<String>,
    /// Write the report to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
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
        emit_line(&format!("audit-pilot {version}"))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = load_config(cli.config.as_deref(), cli.endpoint.as_deref())?;
    match command {
        Commands::Ingest(command) => command_ingest(&config, &command).await,
        Commands::Contents(command) => command_contents(&config, &command).await,
        Commands::Analyze(command) => command_analyze(&config, &command).await,
        Commands::Fuzz(command) => command_fuzz(&config, &command).await,
        Commands::Attest(command) => command_attest(&config, &command).await,
        Commands::Audit(command) => command_audit(&config, &command).await,
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    emit_line("")?;
    Ok(())
}

// ============================================================================
// SECTION: Configuration Helpers
// ============================================================================

/// Loads configuration and applies the endpoint override.
fn load_config(path: Option<&Path>, endpoint: Option<&str>) -> CliResult<AuditPilotConfig> {
    let mut config = AuditPilotConfig::load(path)
        .map_err(|err| CliError::new(format!("configuration load failed: {err}")))?;
    if let Some(endpoint) = endpoint {
        config.service.endpoint = endpoint.to_string();
        config
            .validate()
            .map_err(|err| CliError::new(format!("endpoint override rejected: {err}")))?;
    }
    Ok(config)
}

/// Builds the audit gateway from service configuration.
fn build_gateway(config: &AuditPilotConfig) -> CliResult<AuditGateway> {
    let gateway_config = GatewayConfig {
        endpoint: config.service.endpoint.clone(),
        request_timeout: config.service.request_timeout(),
        max_response_bytes: config.service.max_response_bytes,
        ..GatewayConfig::default()
    };
    AuditGateway::new(gateway_config)
        .map_err(|err| CliError::new(format!("gateway setup failed: {err}")))
}

/// Builds a session driver over one configured gateway.
fn build_driver(config: &AuditPilotConfig) -> CliResult<SessionDriver> {
    Ok(SessionDriver::new(Arc::new(build_gateway(config)?)))
}

// ============================================================================
// SECTION: Session Helpers
// ============================================================================

/// Parses the repository argument into a validated reference.
fn parse_repo(input: &str) -> CliResult<RepoRef> {
    RepoRef::parse(input).map_err(|err| CliError::new(err.to_string()))
}

/// Runs ingestion to completion, surfacing a captured session error.
async fn ingest_step(driver: &mut SessionDriver, repo: RepoRef) -> CliResult<()> {
    let _completion = driver.ingest(repo).await;
    operation_error(driver, OperationKind::Ingest)
}

/// Surfaces the captured session error for one operation as a CLI failure.
fn operation_error(driver: &SessionDriver, kind: OperationKind) -> CliResult<()> {
    match driver.session().error_for(kind) {
        Some(err) => Err(CliError::new(err.to_string())),
        None => Ok(()),
    }
}

/// Requires the eligible phase, rendering the refusal reason otherwise.
fn require_eligible(driver: &SessionDriver) -> CliResult<()> {
    match driver.session().phase() {
        SessionPhase::Eligible => Ok(()),
        SessionPhase::Ineligible => {
            let reason = driver
                .session()
                .ingestion()
                .and_then(|result| result.reason.clone())
                .map_or_else(String::new, |reason| format!(": {reason}"));
            Err(CliError::new(format!("repository is not eligible{reason}")))
        }
        SessionPhase::Idle | SessionPhase::Ingesting => {
            Err(CliError::new("no eligible repository in session".to_string()))
        }
    }
}

// ============================================================================
// SECTION: Ingest Command
// ============================================================================

/// Executes the `ingest` command.
async fn command_ingest(config: &AuditPilotConfig, command: &IngestCommand) -> CliResult<ExitCode> {
    let repo = parse_repo(&command.repo)?;
    let mut driver = build_driver(config)?;
    ingest_step(&mut driver, repo).await?;

    let result = driver
        .session()
        .ingestion()
        .ok_or_else(|| CliError::new("ingestion produced no result".to_string()))?;
    let verdict = if result.eligible { "eligible" } else { "ineligible" };
    emit_line(&format!("Classification: {verdict}"))?;
    if let Some(reason) = &result.reason {
        emit_line(&format!("Message: {reason}"))?;
    }
    if let Some(summary) = &result.repo {
        print_summary(summary)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints repository metadata lines.
fn print_summary(summary: &RepoSummary) -> CliResult<()> {
    emit_line(&format!("Repository: {}", summary.full_name))?;
    emit_line(&format!("URL: {}", summary.html_url))?;
    if let Some(description) = &summary.description {
        emit_line(&format!("Description: {description}"))?;
    }
    if let Some(language) = &summary.language {
        emit_line(&format!("Language: {language}"))?;
    }
    emit_line(&format!(
        "Stars: {}, forks: {}, open issues: {}",
        summary.stargazers_count, summary.forks_count, summary.open_issues_count
    ))?;
    Ok(())
}

// ============================================================================
// SECTION: Contents Command
// ============================================================================

/// Executes the `contents` command.
async fn command_contents(
    config: &AuditPilotConfig,
    command: &ContentsCommand,
) -> CliResult<ExitCode> {
    let repo = parse_repo(&command.repo)?;
    let mut driver = build_driver(config)?;
    ingest_step(&mut driver, repo).await?;
    require_eligible(&driver)?;

    let _completion =
        driver.browse(&command.path).await.map_err(|err| CliError::new(err.to_string()))?;
    operation_error(&driver, OperationKind::Browse)?;
    let view = driver
        .session()
        .browse_view()
        .ok_or_else(|| CliError::new("browsing produced no view".to_string()))?;
    print_view(view)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints a browse view: a directory listing or a file preview.
fn print_view(view: &BrowseView) -> CliResult<()> {
    let location = if view.path.is_empty() { "/" } else { view.path.as_str() };
    match &view.contents {
        BrowseContents::Listing(entries) => {
            emit_line(&format!("Listing of {location}:"))?;
            if entries.is_empty() {
                emit_line("(empty directory)")?;
                return Ok(());
            }
            for entry in entries {
                let size = entry.size.map_or_else(String::new, |size| format!("  {size} B"));
                emit_line(&format!("{:<5} {}{size}", entry.kind.as_str(), entry.name))?;
            }
            Ok(())
        }
        BrowseContents::File(preview) => print_preview(location, preview),
    }
}

/// Prints a single-file preview.
fn print_preview(location: &str, preview: &FilePreview) -> CliResult<()> {
    emit_line(&format!("File: {location}"))?;
    if let Some(size) = preview.size {
        emit_line(&format!("Size: {size} bytes"))?;
    }
    match &preview.text {
        Some(text) => emit_line(text),
        None => emit_line("(no text preview available)"),
    }
}

// ============================================================================
// SECTION: Analyze Command
// ============================================================================

/// Executes the `analyze` command.
async fn command_analyze(
    config: &AuditPilotConfig,
    command: &AnalyzeCommand,
) -> CliResult<ExitCode> {
    let repo = parse_repo(&command.repo)?;
    let mut driver = build_driver(config)?;
    ingest_step(&mut driver, repo).await?;
    require_eligible(&driver)?;

    let _completion = driver.analyze().await.map_err(|err| CliError::new(err.to_string()))?;
    operation_error(&driver, OperationKind::Analyze)?;
    let scan = driver
        .session()
        .scan_report()
        .ok_or_else(|| CliError::new("analysis produced no report".to_string()))?;
    print_scan(scan)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the scan message and its findings.
fn print_scan(scan: &ScanReport) -> CliResult<()> {
    emit_line(&scan.message)?;
    if scan.findings.is_empty() {
        emit_line("No findings.")?;
        return Ok(());
    }
    for (index, finding) in scan.findings.iter().enumerate() {
        emit_line(&format!(
            "{}. [{}] line {}: {}",
            index.saturating_add(1),
            finding.severity,
            finding.line,
            finding.description
        ))?;
        emit_line(&format!("   fix: {}", finding.suggested_fix))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Fuzz Command
// ============================================================================

/// Executes the `fuzz` command.
async fn command_fuzz(config: &AuditPilotConfig, command: &FuzzCommand) -> CliResult<ExitCode> {
    let repo = parse_repo(&command.repo)?;
    let plan = resolve_plan(config, command.instruction.as_deref(), command.timeout_seconds)?;
    let mut driver = build_driver(config)?;
    ingest_step(&mut driver, repo).await?;
    require_eligible(&driver)?;

    let _completion = driver.fuzz(&plan).await.map_err(|err| CliError::new(err.to_string()))?;
    operation_error(&driver, OperationKind::Fuzz)?;
    let outcome = driver
        .session()
        .fuzz_outcome()
        .ok_or_else(|| CliError::new("fuzzing produced no outcome".to_string()))?;
    print_outcome(outcome)?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the fuzz plan from flags, falling back to configured defaults.
fn resolve_plan(
    config: &AuditPilotConfig,
    instruction: Option<&str>,
    timeout_seconds: Option<u64>,
) -> CliResult<FuzzPlan> {
    let instruction = instruction.unwrap_or(&config.fuzz.default_instruction);
    let timeout = timeout_seconds.unwrap_or(config.fuzz.default_timeout_seconds);
    FuzzPlan::new(instruction, timeout).map_err(|err| CliError::new(err.to_string()))
}

/// Prints the fuzz run outcome.
fn print_outcome(outcome: &FuzzOutcome) -> CliResult<()> {
    emit_line(&outcome.message)?;
    let verdict = if outcome.passed { "passed" } else { "issues found" };
    emit_line(&format!("Result: {verdict} ({} ms)", outcome.elapsed_ms))?;
    for issue in &outcome.issues {
        emit_line(&format!("- {issue}"))?;
    }
    if let Some(artifact) = &outcome.generated_artifact {
        emit_line("")?;
        emit_line("Generated test:")?;
        emit_line(artifact)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Attest Command
// ============================================================================

/// Executes the `attest` command against a report file.
async fn command_attest(config: &AuditPilotConfig, command: &AttestCommand) -> CliResult<ExitCode> {
    let report = read_report(&command.report)?;
    let gateway = build_gateway(config)?;
    let record = gateway
        .log_report(&report)
        .await
        .map_err(|err| CliError::new(format!("attestation failed: {err}")))?;
    print_attestation(config, &record)
}

/// Reads the report file under the size limit, requiring UTF-8 content.
fn read_report(path: &Path) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, MAX_REPORT_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "report {} exceeds the size limit ({size} > {limit})",
            path.display()
        )),
    })?;
    String::from_utf8(bytes)
        .map_err(|_| CliError::new(format!("report {} must be utf-8", path.display())))
}

/// Prints the attested digest, transaction, and explorer link.
fn print_attestation(config: &AuditPilotConfig, record: &AttestationRecord) -> CliResult<ExitCode> {
    emit_line(&format!("Digest: {}", record.content_hash.value))?;
    emit_line(&format!("Transaction: {}", record.transaction_ref))?;
    emit_line(&format!(
        "Explorer: {}",
        record.explorer_url(&config.ledger.explorer_base, &config.ledger.cluster)
    ))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Audit Command
// ============================================================================

/// Executes the full audit pipeline: ingest, root listing, analyze, fuzz,
/// report, and attestation.
async fn command_audit(config: &AuditPilotConfig, command: &AuditCommand) -> CliResult<ExitCode> {
    let repo = parse_repo(&command.repo)?;
    let plan = resolve_plan(config, command.instruction.as_deref(), command.timeout_seconds)?;
    let generated_at = resolve_generated_at(command.generated_at.as_deref())?;
    let mut driver = build_driver(config)?;

    ingest_step(&mut driver, repo).await?;
    require_eligible(&driver)?;
    let name = driver
        .session()
        .ingestion()
        .and_then(|result| result.repo.as_ref())
        .map_or_else(|| command.repo.clone(), |summary| summary.full_name.clone());
    emit_progress(&format!("Ingested {name} (eligible)"))?;

    let _completion = driver.browse("").await.map_err(|err| CliError::new(err.to_string()))?;
    operation_error(&driver, OperationKind::Browse)?;
    let entries = driver.session().browse_view().map_or(0, |view| match &view.contents {
        BrowseContents::Listing(entries) => entries.len(),
        BrowseContents::File(_) => 1,
    });
    emit_progress(&format!("Listed {entries} entries at the repository root"))?;

    let _completion = driver.analyze().await.map_err(|err| CliError::new(err.to_string()))?;
    operation_error(&driver, OperationKind::Analyze)?;
    let findings = driver.session().scan_report().map_or(0, |scan| scan.findings.len());
    emit_progress(&format!("Scan committed with {findings} findings"))?;

    let _completion = driver.fuzz(&plan).await.map_err(|err| CliError::new(err.to_string()))?;
    operation_error(&driver, OperationKind::Fuzz)?;
    let issues = driver.session().fuzz_outcome().map_or(0, |outcome| outcome.issues.len());
    emit_progress(&format!("Fuzz run committed with {issues} issues"))?;

    let report = driver
        .session()
        .render_report(&generated_at)
        .ok_or_else(|| CliError::new("no report available to attest".to_string()))?;
    write_report(command.output.as_deref(), &report)?;

    let _completion =
        driver.attest(&generated_at).await.map_err(|err| CliError::new(err.to_string()))?;
    operation_error(&driver, OperationKind::Attest)?;
    let record = driver
        .session()
        .attestation_record()
        .ok_or_else(|| CliError::new("attestation produced no record".to_string()))?;
    print_attestation(config, record)
}

/// Writes the report to the output path, or to stdout when none was given.
fn write_report(output: Option<&Path>, report: &str) -> CliResult<()> {
    match output {
        Some(path) => {
            fs::write(path, report).map_err(|err| {
                CliError::new(format!("failed to write {}: {err}", path.display()))
            })?;
            emit_progress(&format!("Report written to {}", path.display()))
        }
        None => emit_line(report),
    }
}

/// Resolves the report timestamp: the override verbatim, or current UTC time.
fn resolve_generated_at(override_value: Option<&str>) -> CliResult<String> {
    if let Some(value) = override_value {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CliError::new("generated-at override must not be empty".to_string()));
        }
        return Ok(trimmed.to_string());
    }

    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| CliError::new(format!("failed to format the current time: {err}")))
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

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
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

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes one result line to stdout, wrapping failures as CLI errors.
fn emit_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes one progress line to stderr, wrapping failures as CLI errors.
fn emit_progress(message: &str) -> CliResult<()> {
    write_stderr_line(message).map_err(|err| CliError::new(output_error("stderr", &err)))
}

/// Formats an output write failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
