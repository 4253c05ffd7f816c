// audit-pilot-client/src/gateway/attest.rs
// ============================================================================
// Module: Attest Endpoint Client
// Description: Ledger attestation of finished audit reports.
// Purpose: Map the log-report wire contract onto a verified AttestationRecord.
// Dependencies: audit-pilot-core, serde
// ============================================================================

//! ## Overview
//! The service hashes the submitted report bytes and writes the digest to an
//! immutable ledger transaction. The client re-hashes the same bytes locally
//! and accepts the receipt only when both digests agree; a mismatch means the
//! service attested different bytes than the client submitted. No partial
//! attestation state is retained on any failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use audit_pilot_core::AttestationRecord;
use audit_pilot_core::AttestationService;
use audit_pilot_core::DEFAULT_HASH_ALGORITHM;
use audit_pilot_core::GatewayError;
use audit_pilot_core::hash_bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::gateway::AuditGateway;
use crate::telemetry::GatewayCall;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Endpoint path for report attestation.
const ATTEST_PATH: &str = "/api/log-report";

/// Request body for `POST /api/log-report`.
#[derive(Debug, Serialize)]
struct AttestRequest<'a> {
    /// Exact report bytes to attest. Hashed without normalization.
    report_content: &'a str,
}

/// Response body for `POST /api/log-report`.
#[derive(Debug, Deserialize)]
pub(crate) struct AttestResponse {
    /// Whether the report was written to the ledger.
    pub(crate) success: bool,
    /// Service-provided status message.
    pub(crate) message: String,
    /// Ledger transaction reference.
    pub(crate) transaction_signature: Option<String>,
    /// Hex digest the service computed over the report bytes.
    pub(crate) hash: Option<String>,
}

// ============================================================================
// SECTION: Domain Mapping
// ============================================================================

/// Verifies an attestation response against the submitted report bytes.
///
/// The local digest is authoritative for the returned record; the service
/// digest only has to reproduce it.
pub(crate) fn map_attest(
    report_content: &str,
    response: AttestResponse,
) -> Result<AttestationRecord, GatewayError> {
    if !response.success {
        return Err(GatewayError::Protocol(format!(
            "attestation failed: {}",
            response.message
        )));
    }
    let Some(signature) = response.transaction_signature else {
        return Err(GatewayError::Protocol(
            "attestation response missing transaction signature".to_string(),
        ));
    };
    let Some(echoed) = response.hash else {
        return Err(GatewayError::Protocol(
            "attestation response missing content hash".to_string(),
        ));
    };
    let local = hash_bytes(DEFAULT_HASH_ALGORITHM, report_content.as_bytes());
    if !local.matches_hex(&echoed) {
        return Err(GatewayError::Protocol(format!(
            "attestation hash mismatch: service hashed {echoed}, local digest is {}",
            local.value
        )));
    }
    Ok(AttestationRecord::new(local, signature))
}

// ============================================================================
// SECTION: Boundary Implementation
// ============================================================================

#[async_trait]
impl AttestationService for AuditGateway {
    async fn log_report(&self, report_content: &str) -> Result<AttestationRecord, GatewayError> {
        let request = AttestRequest { report_content };
        let response: AttestResponse =
            self.post_json(GatewayCall::LogReport, ATTEST_PATH, &request).await?;
        map_attest(report_content, response)
    }
}
