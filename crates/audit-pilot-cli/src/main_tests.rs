// audit-pilot-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and input handling in the CLI.
// Purpose: Ensure bounded reads fail closed and defaults resolve predictably.
// Dependencies: audit-pilot-cli main helpers
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit` and `read_report` enforce input limits,
//! timestamp and fuzz-plan resolution honor overrides, and the argument
//! grammar parses the documented flags.
//!
//! Security posture: CLI inputs are untrusted; size limits must fail closed.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use audit_pilot_config::AuditPilotConfig;
use clap::Parser;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::Cli;
use super::Commands;
use super::ReadLimitError;
use super::read_bytes_with_limit;
use super::read_report;
use super::resolve_generated_at;
use super::resolve_plan;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn temp_file(label: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock drift").as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("audit-pilot-cli-{label}-{nanos}.bin"));
    path
}

fn cleanup(path: &PathBuf) {
    let _ = fs::remove_file(path);
}

// ============================================================================
// SECTION: Bounded Read Tests
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let path = temp_file("io-small");
    fs::write(&path, b"ok").expect("write small file");

    let bytes = read_bytes_with_limit(&path, 16).expect("read small file");
    assert_eq!(bytes, b"ok");

    cleanup(&path);
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let path = temp_file("io-large");
    let limit = 8_usize;
    let payload = vec![0_u8; limit + 1];
    fs::write(&path, payload).expect("write large file");

    let err = read_bytes_with_limit(&path, limit).expect_err("expected size limit failure");
    match err {
        ReadLimitError::TooLarge { size, limit: reported } => {
            let limit_u64 = u64::try_from(limit).expect("limit fits");
            assert!(size > limit_u64);
            assert_eq!(reported, limit);
        }
        ReadLimitError::Io(err) => panic!("unexpected IO error: {err}"),
    }

    cleanup(&path);
}

#[test]
fn read_report_returns_utf8_text() {
    let path = temp_file("report-text");
    fs::write(&path, "# Security Audit Report\n").expect("write report file");

    let report = read_report(&path).expect("read report");
    assert!(report.starts_with("# Security Audit Report"));

    cleanup(&path);
}

#[test]
fn read_report_rejects_non_utf8_content() {
    let path = temp_file("report-binary");
    fs::write(&path, [0xFF_u8, 0xFE, 0x00]).expect("write binary file");

    let err = read_report(&path).expect_err("expected utf-8 failure");
    assert!(err.to_string().contains("utf-8"));

    cleanup(&path);
}

// ============================================================================
// SECTION: Resolution Tests
// ============================================================================

#[test]
fn resolve_generated_at_passes_override_through() {
    let resolved = resolve_generated_at(Some("  2025-06-02 12:00:00 UTC  "))
        .expect("override should resolve");
    assert_eq!(resolved, "2025-06-02 12:00:00 UTC");
}

#[test]
fn resolve_generated_at_rejects_blank_override() {
    let err = resolve_generated_at(Some("   ")).expect_err("blank override should fail");
    assert!(err.to_string().contains("must not be empty"));
}

#[test]
fn resolve_generated_at_defaults_to_rfc3339() {
    let resolved = resolve_generated_at(None).expect("current time should resolve");
    OffsetDateTime::parse(&resolved, &Rfc3339).expect("default timestamp parses as RFC 3339");
}

#[test]
fn resolve_plan_uses_configured_defaults() {
    let config = AuditPilotConfig::default();

    let plan = resolve_plan(&config, None, None).expect("defaults should resolve");
    assert_eq!(plan.instruction_name(), config.fuzz.default_instruction);
    assert_eq!(plan.timeout_seconds(), config.fuzz.default_timeout_seconds);
}

#[test]
fn resolve_plan_honors_flag_overrides() {
    let config = AuditPilotConfig::default();

    let plan = resolve_plan(&config, Some("withdraw"), Some(45)).expect("overrides resolve");
    assert_eq!(plan.instruction_name(), "withdraw");
    assert_eq!(plan.timeout_seconds(), 45);
}

#[test]
fn resolve_plan_rejects_out_of_range_timeout() {
    let config = AuditPilotConfig::default();

    let err = resolve_plan(&config, None, Some(0)).expect_err("zero budget should fail");
    assert!(err.to_string().contains("timeout"));
}

// ============================================================================
// SECTION: Argument Grammar Tests
// ============================================================================

#[test]
fn cli_parses_audit_flags() {
    let cli = Cli::try_parse_from([
        "audit-pilot",
        "audit",
        "--repo",
        "https://github.com/acme/vault",
        "--instruction",
        "withdraw",
        "--timeout-seconds",
        "45",
        "--generated-at",
        "2025-06-02 12:00:00 UTC",
    ])
    .expect("audit flags should parse");

    let Some(Commands::Audit(command)) = cli.command else {
        panic!("expected the audit subcommand");
    };
    assert_eq!(command.repo, "https://github.com/acme/vault");
    assert_eq!(command.instruction.as_deref(), Some("withdraw"));
    assert_eq!(command.timeout_seconds, Some(45));
    assert_eq!(command.generated_at.as_deref(), Some("2025-06-02 12:00:00 UTC"));
    assert!(command.output.is_none());
}

#[test]
fn cli_contents_path_defaults_to_root() {
    let cli = Cli::try_parse_from([
        "audit-pilot",
        "contents",
        "--repo",
        "https://github.com/acme/vault",
    ])
    .expect("contents flags should parse");

    let Some(Commands::Contents(command)) = cli.command else {
        panic!("expected the contents subcommand");
    };
    assert_eq!(command.path, "");
}

#[test]
fn cli_version_flag_is_global() {
    let cli = Cli::try_parse_from(["audit-pilot", "--version"]).expect("version flag parses");
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn cli_endpoint_flag_is_global() {
    let cli = Cli::try_parse_from([
        "audit-pilot",
        "ingest",
        "--repo",
        "https://github.com/acme/vault",
        "--endpoint",
        "http://127.0.0.1:9999",
    ])
    .expect("global endpoint flag parses after the subcommand");
    assert_eq!(cli.endpoint.as_deref(), Some("http://127.0.0.1:9999"));
}
