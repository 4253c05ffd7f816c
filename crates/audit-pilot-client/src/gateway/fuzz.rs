// audit-pilot-client/src/gateway/fuzz.rs
// ============================================================================
// Module: Fuzz Endpoint Client
// Description: Bounded fuzz runs against a named program instruction.
// Purpose: Map the fuzz-test wire contract onto FuzzOutcome.
// Dependencies: audit-pilot-core, serde
// ============================================================================

//! ## Overview
//! The time budget is validated when the [`FuzzPlan`] is built, so only
//! in-range requests reach this module. A completed run that found issues
//! comes back as a well-formed body with a populated `errors` list and maps
//! onto a failed-but-completed outcome; sandbox crashes and timeouts beyond
//! the budget arrive as non-2xx statuses through the transport layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use audit_pilot_core::FuzzOutcome;
use audit_pilot_core::FuzzPlan;
use audit_pilot_core::FuzzRunner;
use audit_pilot_core::GatewayError;
use audit_pilot_core::RepoRef;
use serde::Deserialize;
use serde::Serialize;

use crate::gateway::AuditGateway;
use crate::telemetry::GatewayCall;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Endpoint path for fuzz runs.
const FUZZ_PATH: &str = "/api/fuzz-test";

/// Request body for `POST /api/fuzz-test`.
#[derive(Debug, Serialize)]
struct FuzzRequest<'a> {
    /// Repository URL to fuzz.
    repo_url: &'a str,
    /// Instruction to target.
    instruction_name: &'a str,
    /// Sandbox time budget in seconds.
    timeout_seconds: u64,
}

/// Response body for `POST /api/fuzz-test`.
#[derive(Debug, Deserialize)]
pub(crate) struct FuzzResponse {
    /// Service-reported completion flag.
    pub(crate) success: bool,
    /// Service-provided outcome message.
    pub(crate) message: String,
    /// Issues discovered during the run.
    pub(crate) errors: Option<Vec<String>>,
    /// Generated test artifact.
    pub(crate) test_file: Option<String>,
    /// Wall-clock run time in milliseconds.
    pub(crate) execution_time_ms: Option<u64>,
}

// ============================================================================
// SECTION: Domain Mapping
// ============================================================================

/// Maps a fuzz response onto the domain outcome.
///
/// The run passes only when the service reports success and the issue list
/// is empty. Service versions disagree on the `success` flag for a run that
/// found issues, so the issue list is authoritative.
pub(crate) fn map_fuzz(response: FuzzResponse) -> FuzzOutcome {
    let issues = response.errors.unwrap_or_default();
    FuzzOutcome {
        passed: response.success && issues.is_empty(),
        issues,
        generated_artifact: response.test_file,
        elapsed_ms: response.execution_time_ms.unwrap_or(0),
        message: response.message,
    }
}

// ============================================================================
// SECTION: Boundary Implementation
// ============================================================================

#[async_trait]
impl FuzzRunner for AuditGateway {
    async fn fuzz(&self, repo: &RepoRef, plan: &FuzzPlan) -> Result<FuzzOutcome, GatewayError> {
        let request = FuzzRequest {
            repo_url: repo.url(),
            instruction_name: plan.instruction_name(),
            timeout_seconds: plan.timeout_seconds(),
        };
        let response: FuzzResponse =
            self.post_json(GatewayCall::FuzzTest, FUZZ_PATH, &request).await?;
        Ok(map_fuzz(response))
    }
}
