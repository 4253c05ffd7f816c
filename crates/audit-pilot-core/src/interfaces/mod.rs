// audit-pilot-core/src/interfaces/mod.rs
// ============================================================================
// Module: Audit Pilot Boundary Interfaces
// Description: Traits and the error taxonomy for external audit services.
// Purpose: Define the seams the session orchestrator drives without binding
//          to any transport implementation.
// Dependencies: async-trait, thiserror, crate::core
// ============================================================================

//! ## Overview
//! Five boundary seams cover the audit pipeline: ingestion classification,
//! content browsing, static analysis, fuzz execution, and report attestation.
//! All seams share one error taxonomy. Domain-level failures (ineligible
//! repository, failing fuzz run) are data in the result types, never errors;
//! the error type covers validation, transport, and protocol faults only.
//!
//! Security posture: validation errors are raised before any request is
//! dispatched, so malformed input never reaches the network.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::AttestationRecord;
use crate::core::BrowseView;
use crate::core::FuzzOutcome;
use crate::core::FuzzPlan;
use crate::core::FuzzPlanError;
use crate::core::IngestionResult;
use crate::core::RepoRef;
use crate::core::RepoRefError;
use crate::core::ScanReport;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised at the service boundary.
///
/// Exactly one taxonomy applies to all five seams. A well-formed response
/// reporting a domain failure is not a `GatewayError`; it is carried in the
/// seam's result type.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed input caught before dispatch. Never reaches the network.
    #[error("validation error: {0}")]
    Validation(String),
    /// Network failure or non-2xx response status.
    #[error("transport error: {0}")]
    Transport(String),
    /// 2xx response with an empty or undecodable body.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Response body exceeded the configured size limit.
    #[error("response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Bytes received before the limit tripped.
        actual: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
}

impl GatewayError {
    /// Returns the stable label for the error kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::ResponseTooLarge { .. } => "response_too_large",
        }
    }
}

impl From<FuzzPlanError> for GatewayError {
    fn from(err: FuzzPlanError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RepoRefError> for GatewayError {
    fn from(err: RepoRefError) -> Self {
        Self::Validation(err.to_string())
    }
}

// ============================================================================
// SECTION: Boundary Traits
// ============================================================================

/// Classifies a repository as eligible or ineligible for the pipeline.
#[async_trait]
pub trait IngestionGate: Send + Sync {
    /// Resolves the repository and classifies its project type.
    ///
    /// Ineligibility is reported inside the [`IngestionResult`], not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for transport and protocol faults.
    async fn ingest(&self, repo: &RepoRef) -> Result<IngestionResult, GatewayError>;
}

/// Fetches directory listings and file previews for an eligible repository.
#[async_trait]
pub trait ContentBrowser: Send + Sync {
    /// Lists the contents at `path`. The empty path is the repository root.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for transport and protocol faults. An empty
    /// directory is a successful, empty listing.
    async fn list(&self, repo: &RepoRef, path: &str) -> Result<BrowseView, GatewayError>;
}

/// Runs the security-finding scan for an eligible repository.
#[async_trait]
pub trait StaticAnalyzer: Send + Sync {
    /// Scans the repository and returns findings in detection order.
    ///
    /// A clean scan returns an empty finding list; a scan the service could
    /// not complete is reported as an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for transport and protocol faults.
    async fn analyze(&self, repo: &RepoRef) -> Result<ScanReport, GatewayError>;
}

/// Executes one bounded fuzz run against a named instruction.
#[async_trait]
pub trait FuzzRunner: Send + Sync {
    /// Runs the plan inside the execution sandbox.
    ///
    /// A completed run that found issues is a successful [`FuzzOutcome`]
    /// with `passed = false`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for transport and protocol faults.
    async fn fuzz(&self, repo: &RepoRef, plan: &FuzzPlan) -> Result<FuzzOutcome, GatewayError>;
}

/// Attests a report on the ledger and returns a verifiable record.
#[async_trait]
pub trait AttestationService: Send + Sync {
    /// Submits the exact report bytes for attestation.
    ///
    /// Implementations must verify that the digest echoed by the service
    /// matches a locally computed digest of the same bytes before returning.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for transport and protocol faults, including
    /// a digest mismatch (protocol violation).
    async fn log_report(&self, report_content: &str) -> Result<AttestationRecord, GatewayError>;
}
