// audit-pilot-core/src/runtime/report.rs
// ============================================================================
// Module: Audit Pilot Report Builder
// Description: Markdown rendering of accumulated session results.
// Purpose: Produce the report content submitted for ledger attestation.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! The report is a markdown document built from the session's committed
//! results: repository identity and metadata, findings in detection order,
//! and the fuzz outcome with its issue list and generated artifact. The
//! rendered string is the exact content whose digest is attested, so
//! rendering is deterministic for a given session state and timestamp.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FuzzOutcome;
use crate::core::RepoRef;
use crate::core::RepoSummary;
use crate::core::ScanReport;
use crate::runtime::session::AuditSession;

// ============================================================================
// SECTION: Report Inputs
// ============================================================================

/// Borrowed inputs for one report rendering.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    /// Repository under audit.
    pub repo: &'a RepoRef,
    /// Provider metadata, when ingestion resolved it.
    pub summary: Option<&'a RepoSummary>,
    /// Committed scan report, when analysis ran.
    pub scan: Option<&'a ScanReport>,
    /// Committed fuzz outcome, when fuzzing ran.
    pub fuzz: Option<&'a FuzzOutcome>,
    /// Caller-supplied generation timestamp.
    pub generated_at: &'a str,
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the markdown report for the given inputs.
#[must_use]
pub fn render_markdown(inputs: &ReportInputs<'_>) -> String {
    let mut out = String::new();
    out.push_str("# Security Audit Report\n\n");
    out.push_str(&format!("Generated: {}\n\n", inputs.generated_at));

    out.push_str("## Repository\n\n");
    out.push_str(&format!("- Name: {}\n", inputs.repo.full_name()));
    out.push_str(&format!("- URL: {}\n", inputs.repo.url()));
    if let Some(summary) = inputs.summary {
        if let Some(description) = &summary.description {
            out.push_str(&format!("- Description: {description}\n"));
        }
        if let Some(language) = &summary.language {
            out.push_str(&format!("- Language: {language}\n"));
        }
        out.push_str(&format!(
            "- Stars: {} | Forks: {} | Open issues: {}\n",
            summary.stargazers_count, summary.forks_count, summary.open_issues_count
        ));
        out.push_str(&format!("- Created: {}\n", summary.created_at));
        out.push_str(&format!("- Updated: {}\n", summary.updated_at));
    }
    out.push('\n');

    out.push_str("## Static Analysis\n\n");
    match inputs.scan {
        Some(scan) => {
            out.push_str(&format!("{}\n\n", scan.message));
            if scan.findings.is_empty() {
                out.push_str("No findings.\n\n");
            } else {
                out.push_str("| # | Severity | Line | Finding | Suggested fix |\n");
                out.push_str("|---|----------|------|---------|---------------|\n");
                for (index, finding) in scan.findings.iter().enumerate() {
                    out.push_str(&format!(
                        "| {} | {} | {} | {} | {} |\n",
                        index.saturating_add(1),
                        finding.severity,
                        finding.line,
                        table_cell(&finding.description),
                        table_cell(&finding.suggested_fix)
                    ));
                }
                out.push('\n');
            }
        }
        None => out.push_str("Not run.\n\n"),
    }

    out.push_str("## Fuzz Testing\n\n");
    match inputs.fuzz {
        Some(fuzz) => {
            out.push_str(&format!("{}\n\n", fuzz.message));
            out.push_str(&format!(
                "- Result: {}\n",
                if fuzz.passed { "passed" } else { "failed" }
            ));
            out.push_str(&format!("- Elapsed: {} ms\n", fuzz.elapsed_ms));
            if !fuzz.issues.is_empty() {
                out.push_str("- Issues:\n");
                for issue in &fuzz.issues {
                    out.push_str(&format!("  - {issue}\n"));
                }
            }
            out.push('\n');
            if let Some(artifact) = &fuzz.generated_artifact {
                out.push_str("### Generated Test\n\n");
                out.push_str("```rust\n");
                out.push_str(artifact);
                if !artifact.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("```\n");
            }
        }
        None => out.push_str("Not run.\n"),
    }

    out
}

/// Flattens a value for embedding in a markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

// ============================================================================
// SECTION: Session Integration
// ============================================================================

impl AuditSession {
    /// Renders the report for this session's committed results.
    ///
    /// Returns `None` until the session is eligible and at least one scan or
    /// fuzz result has committed.
    #[must_use]
    pub fn render_report(&self, generated_at: &str) -> Option<String> {
        if !self.has_report() {
            return None;
        }
        let repo = self.repo()?;
        let inputs = ReportInputs {
            repo,
            summary: self.ingestion().and_then(|result| result.repo.as_ref()),
            scan: self.scan_report(),
            fuzz: self.fuzz_outcome(),
            generated_at,
        };
        Some(render_markdown(&inputs))
    }
}
