// audit-pilot-client/src/driver.rs
// ============================================================================
// Module: Session Driver
// Description: Async driver binding the session state machine to the seams.
// Purpose: Run begin/await/complete cycles so callers get committed state.
// Dependencies: audit-pilot-core, crate::telemetry
// ============================================================================

//! ## Overview
//! [`SessionDriver`] owns one [`AuditSession`] and the five boundary seams.
//! Every operation follows the same cycle: begin on the session (which
//! enforces gating and single-flight before any request is dispatched),
//! await the seam, then present the completion under the issued ticket.
//! Gateway errors are absorbed into session state rather than propagated;
//! only begin-time refusals surface to the caller. Per-call latency is
//! reported to the metrics sink whether the call succeeded or failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use audit_pilot_core::AttestationService;
use audit_pilot_core::AuditSession;
use audit_pilot_core::BeginError;
use audit_pilot_core::Completion;
use audit_pilot_core::ContentBrowser;
use audit_pilot_core::FuzzPlan;
use audit_pilot_core::FuzzRunner;
use audit_pilot_core::IngestionGate;
use audit_pilot_core::OperationKind;
use audit_pilot_core::RepoRef;
use audit_pilot_core::StaticAnalyzer;

use crate::gateway::AuditGateway;
use crate::telemetry::GatewayCall;
use crate::telemetry::GatewayMetrics;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Session Driver
// ============================================================================

/// Drives one audit session against the boundary seams.
pub struct SessionDriver {
    /// Session state machine. Sole owner of visible audit state.
    session: AuditSession,
    /// Ingestion seam.
    ingestion: Arc<dyn IngestionGate>,
    /// Browsing seam.
    browser: Arc<dyn ContentBrowser>,
    /// Analysis seam.
    analyzer: Arc<dyn StaticAnalyzer>,
    /// Fuzzing seam.
    fuzzer: Arc<dyn FuzzRunner>,
    /// Attestation seam.
    attestor: Arc<dyn AttestationService>,
    /// Sink for per-call latency.
    metrics: Arc<dyn GatewayMetrics>,
}

impl SessionDriver {
    /// Creates a driver with one gateway serving all five seams.
    #[must_use]
    pub fn new(gateway: Arc<AuditGateway>) -> Self {
        Self::with_metrics(gateway, Arc::new(NoopMetrics))
    }

    /// Creates a driver with one gateway and an explicit metrics sink.
    #[must_use]
    pub fn with_metrics(gateway: Arc<AuditGateway>, metrics: Arc<dyn GatewayMetrics>) -> Self {
        Self::from_parts(
            gateway.clone(),
            gateway.clone(),
            gateway.clone(),
            gateway.clone(),
            gateway,
            metrics,
        )
    }

    /// Creates a driver from individually wired seams.
    #[must_use]
    pub fn from_parts(
        ingestion: Arc<dyn IngestionGate>,
        browser: Arc<dyn ContentBrowser>,
        analyzer: Arc<dyn StaticAnalyzer>,
        fuzzer: Arc<dyn FuzzRunner>,
        attestor: Arc<dyn AttestationService>,
        metrics: Arc<dyn GatewayMetrics>,
    ) -> Self {
        Self {
            session: AuditSession::new(),
            ingestion,
            browser,
            analyzer,
            fuzzer,
            attestor,
            metrics,
        }
    }

    /// Returns the session for state inspection.
    #[must_use]
    pub const fn session(&self) -> &AuditSession {
        &self.session
    }

    /// Clears the captured error for one operation kind.
    pub fn clear_error(&mut self, kind: OperationKind) {
        self.session.clear_error(kind);
    }

    // ========================================================================
    // SECTION: Operations
    // ========================================================================

    /// Submits a repository and runs ingestion to completion.
    ///
    /// Always permitted; prior session state is discarded at submission.
    /// Transport and protocol faults land in the session's ingest slot.
    pub async fn ingest(&mut self, repo: RepoRef) -> Completion {
        let ticket = self.session.submit_repo(repo.clone());
        let started = Instant::now();
        let outcome = self.ingestion.ingest(&repo).await;
        self.metrics.record_latency(GatewayCall::IngestRepo, elapsed_ms(started));
        self.session.complete_ingest(ticket, outcome)
    }

    /// Browses the given repository path to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NotEligible`] outside the eligible phase; the
    /// refusal happens before any request is dispatched.
    pub async fn browse(&mut self, path: &str) -> Result<Completion, BeginError> {
        let repo = self.session.repo().cloned().ok_or(BeginError::NotEligible)?;
        let ticket = self.session.begin_browse()?;
        let started = Instant::now();
        let outcome = self.browser.list(&repo, path).await;
        self.metrics.record_latency(GatewayCall::RepoContents, elapsed_ms(started));
        Ok(self.session.complete_browse(ticket, outcome))
    }

    /// Runs a static-analysis scan to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NotEligible`] outside the eligible phase and
    /// [`BeginError::AlreadyRunning`] while a scan is in flight.
    pub async fn analyze(&mut self) -> Result<Completion, BeginError> {
        let repo = self.session.repo().cloned().ok_or(BeginError::NotEligible)?;
        let ticket = self.session.begin_analyze()?;
        let started = Instant::now();
        let outcome = self.analyzer.analyze(&repo).await;
        self.metrics.record_latency(GatewayCall::AnalyzeCode, elapsed_ms(started));
        Ok(self.session.complete_analyze(ticket, outcome))
    }

    /// Runs a bounded fuzz plan to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NotEligible`] outside the eligible phase and
    /// [`BeginError::AlreadyRunning`] while a run is in flight.
    pub async fn fuzz(&mut self, plan: &FuzzPlan) -> Result<Completion, BeginError> {
        let repo = self.session.repo().cloned().ok_or(BeginError::NotEligible)?;
        let ticket = self.session.begin_fuzz()?;
        let started = Instant::now();
        let outcome = self.fuzzer.fuzz(&repo, plan).await;
        self.metrics.record_latency(GatewayCall::FuzzTest, elapsed_ms(started));
        Ok(self.session.complete_fuzz(ticket, outcome))
    }

    /// Renders the session report and attests it to completion.
    ///
    /// The rendered content is hashed exactly as submitted; the attestation
    /// seam verifies the service digest against it.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NothingToAttest`] until at least one scan or
    /// fuzz result has committed, [`BeginError::NotEligible`] outside the
    /// eligible phase, and [`BeginError::AlreadyRunning`] while an
    /// attestation is in flight.
    pub async fn attest(&mut self, generated_at: &str) -> Result<Completion, BeginError> {
        let report = self
            .session
            .render_report(generated_at)
            .ok_or(BeginError::NothingToAttest)?;
        let ticket = self.session.begin_attest()?;
        let started = Instant::now();
        let outcome = self.attestor.log_report(&report).await;
        self.metrics.record_latency(GatewayCall::LogReport, elapsed_ms(started));
        Ok(self.session.complete_attest(ticket, outcome))
    }
}

// ============================================================================
// SECTION: Timing
// ============================================================================

/// Milliseconds elapsed since `started`, saturating on overflow.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
