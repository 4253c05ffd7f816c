// audit-pilot-client/src/gateway/analyze.rs
// ============================================================================
// Module: Analyze Endpoint Client
// Description: Static-analysis scans for eligible repositories.
// Purpose: Map the analyze-code wire contract onto ScanReport.
// Dependencies: audit-pilot-core, serde
// ============================================================================

//! ## Overview
//! The service clones the repository server-side and scans it, returning
//! findings in detection order. Scan failures arrive as non-2xx statuses and
//! surface through the transport layer; a well-formed body always maps onto
//! a report, so a failure-shaped body renders as a report whose message
//! carries the failure and whose finding list is empty. Zero findings with a
//! completion message is a clean scan, not an absent result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use audit_pilot_core::Finding;
use audit_pilot_core::GatewayError;
use audit_pilot_core::RepoRef;
use audit_pilot_core::ScanReport;
use audit_pilot_core::Severity;
use audit_pilot_core::StaticAnalyzer;
use serde::Deserialize;
use serde::Serialize;

use crate::gateway::AuditGateway;
use crate::telemetry::GatewayCall;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Endpoint path for static analysis.
const ANALYZE_PATH: &str = "/api/analyze-code";

/// Request body for `POST /api/analyze-code`.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    /// Repository URL to scan.
    repo_url: &'a str,
}

/// Response body for `POST /api/analyze-code`.
#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResponse {
    /// Service-provided scan message.
    pub(crate) message: String,
    /// Findings, absent when the scan produced none.
    pub(crate) bugs: Option<Vec<BugRecord>>,
}

/// One finding as serialized by the analysis service.
#[derive(Debug, Deserialize)]
pub(crate) struct BugRecord {
    /// What was found.
    pub(crate) bug: String,
    /// Source line the finding points at.
    pub(crate) line: u32,
    /// Severity level. Only the three known levels decode.
    pub(crate) severity: Severity,
    /// Suggested remediation.
    pub(crate) fix: String,
}

// ============================================================================
// SECTION: Domain Mapping
// ============================================================================

/// Maps an analyze response onto the domain scan report.
pub(crate) fn map_analyze(response: AnalyzeResponse) -> ScanReport {
    let findings = response
        .bugs
        .unwrap_or_default()
        .into_iter()
        .map(|record| Finding {
            description: record.bug,
            line: record.line,
            severity: record.severity,
            suggested_fix: record.fix,
        })
        .collect();
    ScanReport {
        message: response.message,
        findings,
    }
}

// ============================================================================
// SECTION: Boundary Implementation
// ============================================================================

#[async_trait]
impl StaticAnalyzer for AuditGateway {
    async fn analyze(&self, repo: &RepoRef) -> Result<ScanReport, GatewayError> {
        let request = AnalyzeRequest {
            repo_url: repo.url(),
        };
        let response: AnalyzeResponse =
            self.post_json(GatewayCall::AnalyzeCode, ANALYZE_PATH, &request).await?;
        Ok(map_analyze(response))
    }
}
