// audit-pilot-core/src/runtime/session.rs
// ============================================================================
// Module: Audit Pilot Session State Machine
// Description: Deterministic orchestration state for one audit session.
// Purpose: Enforce gating, single-flight, and stale-response suppression.
// Dependencies: thiserror, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! One [`AuditSession`] owns all visible state for one repository under
//! audit. Operations follow a begin/complete protocol: `begin_*` enforces
//! the gating and single-flight rules and hands out a sequence-stamped
//! [`Ticket`]; `complete_*` commits a result only when the ticket still
//! matches the in-flight sequence for its kind. Completions presenting any
//! other ticket are dropped, which is how stale responses from superseded
//! requests are suppressed without network cancellation.
//!
//! The machine is synchronous and deterministic. All I/O lives behind the
//! boundary interfaces; callers await their own futures and report back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::AttestationRecord;
use crate::core::BrowseView;
use crate::core::FuzzOutcome;
use crate::core::IngestionResult;
use crate::core::RepoRef;
use crate::core::ScanReport;
use crate::interfaces::GatewayError;

// ============================================================================
// SECTION: Session Phase
// ============================================================================

/// Top-level lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No repository submitted, or the last ingestion failed.
    Idle,
    /// Ingestion request in flight.
    Ingesting,
    /// Repository resolved but failed project-type classification.
    Ineligible,
    /// Repository classified eligible; downstream operations are open.
    Eligible,
}

impl SessionPhase {
    /// Returns the stable label for the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ingesting => "ingesting",
            Self::Ineligible => "ineligible",
            Self::Eligible => "eligible",
        }
    }
}

// ============================================================================
// SECTION: Operation Kind
// ============================================================================

/// Kind label for the five session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Repository ingestion and classification.
    Ingest,
    /// Directory or file browsing.
    Browse,
    /// Static-analysis scan.
    Analyze,
    /// Bounded fuzz run.
    Fuzz,
    /// Report attestation.
    Attest,
}

impl OperationKind {
    /// Returns the stable label for the operation kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingest => "ingest",
            Self::Browse => "browse",
            Self::Analyze => "analyze",
            Self::Fuzz => "fuzz",
            Self::Attest => "attest",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Session Errors
// ============================================================================

/// Error captured in a sub-state slot after a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    /// Operation that failed.
    kind: OperationKind,
    /// Rendered error message.
    message: String,
}

impl SessionError {
    /// Creates a session error for the given operation.
    #[must_use]
    pub fn new(kind: OperationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the operation that failed.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the rendered error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Errors raised when an operation may not begin.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BeginError {
    /// Session has no eligible repository.
    #[error("no eligible repository in session")]
    NotEligible,
    /// An operation of this kind is already in flight.
    #[error("{operation} is already running")]
    AlreadyRunning {
        /// Operation kind that refused re-entry.
        operation: OperationKind,
    },
    /// No report content is available to attest.
    #[error("no report available to attest")]
    NothingToAttest,
}

// ============================================================================
// SECTION: Tickets and Operation State
// ============================================================================

/// Sequence-stamped handle for one in-flight operation.
///
/// Issued by `begin_*`; a completion commits only while its ticket matches
/// the current in-flight sequence for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    /// Operation kind the ticket was issued for.
    kind: OperationKind,
    /// Session-wide monotonic sequence number.
    seq: u64,
}

impl Ticket {
    /// Returns the operation kind the ticket was issued for.
    #[must_use]
    pub const fn kind(self) -> OperationKind {
        self.kind
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }
}

/// Lifecycle of one operation kind within a session.
///
/// Explicit variants keep impossible combinations (loading and result at
/// once) unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState<T> {
    /// Never started since the last reset.
    Idle,
    /// Request in flight under the given sequence number.
    Running {
        /// Sequence the in-flight request was issued under.
        seq: u64,
    },
    /// Most recent request committed a result.
    Succeeded(T),
    /// Most recent request failed.
    Failed(SessionError),
}

impl<T> OperationState<T> {
    /// Returns true while a request is in flight.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Returns the committed result, when one exists.
    #[must_use]
    pub const fn result(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the captured error, when the last request failed.
    #[must_use]
    pub const fn error(&self) -> Option<&SessionError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Result of presenting a completion to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Completion {
    /// The completion carried the current ticket and was committed.
    Committed,
    /// The completion was stale or mismatched and was dropped.
    Stale,
}

// ============================================================================
// SECTION: Audit Session
// ============================================================================

/// State machine for one audit session.
///
/// # Invariants
///
/// At most one request per operation kind is in flight. Only the most
/// recently issued request of a kind may commit. Submitting a new repository
/// discards all derived state unconditionally.
#[derive(Debug)]
pub struct AuditSession {
    /// Repository under audit, fixed at submission.
    repo: Option<RepoRef>,
    /// Ingestion sub-state. Drives the session phase.
    ingest: OperationState<IngestionResult>,
    /// Browsing sub-state.
    browse: OperationState<BrowseView>,
    /// Analysis sub-state.
    analysis: OperationState<ScanReport>,
    /// Fuzzing sub-state.
    fuzzing: OperationState<FuzzOutcome>,
    /// Attestation sub-state.
    attestation: OperationState<AttestationRecord>,
    /// Committed browse path. Empty at root.
    current_path: String,
    /// Monotonic sequence source for tickets.
    next_seq: u64,
    /// Kind of the most recent failure, for the error banner.
    last_error: Option<OperationKind>,
}

impl AuditSession {
    /// Creates an empty session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repo: None,
            ingest: OperationState::Idle,
            browse: OperationState::Idle,
            analysis: OperationState::Idle,
            fuzzing: OperationState::Idle,
            attestation: OperationState::Idle,
            current_path: String::new(),
            next_seq: 0,
            last_error: None,
        }
    }

    /// Issues the next ticket sequence number.
    fn issue_seq(&mut self) -> u64 {
        self.next_seq = self.next_seq.saturating_add(1);
        self.next_seq
    }

    /// Requires an eligible repository before a downstream operation.
    fn ensure_eligible(&self) -> Result<(), BeginError> {
        if self.phase() == SessionPhase::Eligible {
            Ok(())
        } else {
            Err(BeginError::NotEligible)
        }
    }

    // ========================================================================
    // SECTION: Begin Protocol
    // ========================================================================

    /// Submits a repository, discarding all state from any prior submission.
    ///
    /// Always permitted. Outstanding tickets from the prior submission become
    /// stale: their sub-states have been reset, so their completions no
    /// longer match a running sequence.
    pub fn submit_repo(&mut self, repo: RepoRef) -> Ticket {
        self.repo = Some(repo);
        self.browse = OperationState::Idle;
        self.analysis = OperationState::Idle;
        self.fuzzing = OperationState::Idle;
        self.attestation = OperationState::Idle;
        self.current_path = String::new();
        self.last_error = None;
        let seq = self.issue_seq();
        self.ingest = OperationState::Running { seq };
        Ticket {
            kind: OperationKind::Ingest,
            seq,
        }
    }

    /// Begins a browse request.
    ///
    /// A browse issued while one is in flight supersedes it: the new ticket
    /// replaces the running sequence and the older response will be dropped
    /// as stale.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NotEligible`] outside the eligible phase.
    pub fn begin_browse(&mut self) -> Result<Ticket, BeginError> {
        self.ensure_eligible()?;
        let seq = self.issue_seq();
        self.browse = OperationState::Running { seq };
        Ok(Ticket {
            kind: OperationKind::Browse,
            seq,
        })
    }

    /// Begins an analysis scan.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NotEligible`] outside the eligible phase and
    /// [`BeginError::AlreadyRunning`] while a scan is in flight.
    pub fn begin_analyze(&mut self) -> Result<Ticket, BeginError> {
        self.ensure_eligible()?;
        if self.analysis.is_running() {
            return Err(BeginError::AlreadyRunning {
                operation: OperationKind::Analyze,
            });
        }
        let seq = self.issue_seq();
        self.analysis = OperationState::Running { seq };
        Ok(Ticket {
            kind: OperationKind::Analyze,
            seq,
        })
    }

    /// Begins a fuzz run.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NotEligible`] outside the eligible phase and
    /// [`BeginError::AlreadyRunning`] while a run is in flight.
    pub fn begin_fuzz(&mut self) -> Result<Ticket, BeginError> {
        self.ensure_eligible()?;
        if self.fuzzing.is_running() {
            return Err(BeginError::AlreadyRunning {
                operation: OperationKind::Fuzz,
            });
        }
        let seq = self.issue_seq();
        self.fuzzing = OperationState::Running { seq };
        Ok(Ticket {
            kind: OperationKind::Fuzz,
            seq,
        })
    }

    /// Begins a report attestation.
    ///
    /// # Errors
    ///
    /// Returns [`BeginError::NotEligible`] outside the eligible phase,
    /// [`BeginError::NothingToAttest`] before any scan or fuzz result
    /// exists, and [`BeginError::AlreadyRunning`] while an attestation is in
    /// flight.
    pub fn begin_attest(&mut self) -> Result<Ticket, BeginError> {
        self.ensure_eligible()?;
        if self.attestation.is_running() {
            return Err(BeginError::AlreadyRunning {
                operation: OperationKind::Attest,
            });
        }
        if !self.has_report() {
            return Err(BeginError::NothingToAttest);
        }
        let seq = self.issue_seq();
        self.attestation = OperationState::Running { seq };
        Ok(Ticket {
            kind: OperationKind::Attest,
            seq,
        })
    }

    // ========================================================================
    // SECTION: Complete Protocol
    // ========================================================================

    /// Returns true when the ticket matches the running sequence for `seq`.
    const fn matches_running<T>(state: &OperationState<T>, ticket: Ticket) -> bool {
        matches!(state, OperationState::Running { seq } if *seq == ticket.seq)
    }

    /// Presents an ingestion completion.
    pub fn complete_ingest(
        &mut self,
        ticket: Ticket,
        outcome: Result<IngestionResult, GatewayError>,
    ) -> Completion {
        if ticket.kind != OperationKind::Ingest || !Self::matches_running(&self.ingest, ticket) {
            return Completion::Stale;
        }
        match outcome {
            Ok(result) => {
                self.ingest = OperationState::Succeeded(result);
            }
            Err(err) => {
                self.ingest =
                    OperationState::Failed(SessionError::new(OperationKind::Ingest, err.to_string()));
                self.last_error = Some(OperationKind::Ingest);
            }
        }
        Completion::Committed
    }

    /// Presents a browse completion. Commits the view path atomically with
    /// the contents.
    pub fn complete_browse(
        &mut self,
        ticket: Ticket,
        outcome: Result<BrowseView, GatewayError>,
    ) -> Completion {
        if ticket.kind != OperationKind::Browse || !Self::matches_running(&self.browse, ticket) {
            return Completion::Stale;
        }
        match outcome {
            Ok(view) => {
                self.current_path = view.path.clone();
                self.browse = OperationState::Succeeded(view);
            }
            Err(err) => {
                self.browse =
                    OperationState::Failed(SessionError::new(OperationKind::Browse, err.to_string()));
                self.last_error = Some(OperationKind::Browse);
            }
        }
        Completion::Committed
    }

    /// Presents an analysis completion.
    pub fn complete_analyze(
        &mut self,
        ticket: Ticket,
        outcome: Result<ScanReport, GatewayError>,
    ) -> Completion {
        if ticket.kind != OperationKind::Analyze || !Self::matches_running(&self.analysis, ticket) {
            return Completion::Stale;
        }
        match outcome {
            Ok(report) => {
                self.analysis = OperationState::Succeeded(report);
            }
            Err(err) => {
                self.analysis = OperationState::Failed(SessionError::new(
                    OperationKind::Analyze,
                    err.to_string(),
                ));
                self.last_error = Some(OperationKind::Analyze);
            }
        }
        Completion::Committed
    }

    /// Presents a fuzz completion.
    pub fn complete_fuzz(
        &mut self,
        ticket: Ticket,
        outcome: Result<FuzzOutcome, GatewayError>,
    ) -> Completion {
        if ticket.kind != OperationKind::Fuzz || !Self::matches_running(&self.fuzzing, ticket) {
            return Completion::Stale;
        }
        match outcome {
            Ok(result) => {
                self.fuzzing = OperationState::Succeeded(result);
            }
            Err(err) => {
                self.fuzzing =
                    OperationState::Failed(SessionError::new(OperationKind::Fuzz, err.to_string()));
                self.last_error = Some(OperationKind::Fuzz);
            }
        }
        Completion::Committed
    }

    /// Presents an attestation completion.
    pub fn complete_attest(
        &mut self,
        ticket: Ticket,
        outcome: Result<AttestationRecord, GatewayError>,
    ) -> Completion {
        if ticket.kind != OperationKind::Attest || !Self::matches_running(&self.attestation, ticket)
        {
            return Completion::Stale;
        }
        match outcome {
            Ok(record) => {
                self.attestation = OperationState::Succeeded(record);
            }
            Err(err) => {
                self.attestation =
                    OperationState::Failed(SessionError::new(OperationKind::Attest, err.to_string()));
                self.last_error = Some(OperationKind::Attest);
            }
        }
        Completion::Committed
    }

    // ========================================================================
    // SECTION: Queries
    // ========================================================================

    /// Returns the current session phase, derived from the ingestion state.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match &self.ingest {
            OperationState::Idle | OperationState::Failed(_) => SessionPhase::Idle,
            OperationState::Running { .. } => SessionPhase::Ingesting,
            OperationState::Succeeded(result) => {
                if result.eligible {
                    SessionPhase::Eligible
                } else {
                    SessionPhase::Ineligible
                }
            }
        }
    }

    /// Returns the repository under audit, when one has been submitted.
    #[must_use]
    pub const fn repo(&self) -> Option<&RepoRef> {
        self.repo.as_ref()
    }

    /// Returns the ingestion sub-state.
    #[must_use]
    pub const fn ingest_state(&self) -> &OperationState<IngestionResult> {
        &self.ingest
    }

    /// Returns the browsing sub-state.
    #[must_use]
    pub const fn browse_state(&self) -> &OperationState<BrowseView> {
        &self.browse
    }

    /// Returns the analysis sub-state.
    #[must_use]
    pub const fn analysis_state(&self) -> &OperationState<ScanReport> {
        &self.analysis
    }

    /// Returns the fuzzing sub-state.
    #[must_use]
    pub const fn fuzzing_state(&self) -> &OperationState<FuzzOutcome> {
        &self.fuzzing
    }

    /// Returns the attestation sub-state.
    #[must_use]
    pub const fn attestation_state(&self) -> &OperationState<AttestationRecord> {
        &self.attestation
    }

    /// Returns the committed ingestion result, when one exists.
    #[must_use]
    pub const fn ingestion(&self) -> Option<&IngestionResult> {
        self.ingest.result()
    }

    /// Returns the committed browse view, when one exists.
    #[must_use]
    pub const fn browse_view(&self) -> Option<&BrowseView> {
        self.browse.result()
    }

    /// Returns the committed scan report, when one exists.
    #[must_use]
    pub const fn scan_report(&self) -> Option<&ScanReport> {
        self.analysis.result()
    }

    /// Returns the committed fuzz outcome, when one exists.
    #[must_use]
    pub const fn fuzz_outcome(&self) -> Option<&FuzzOutcome> {
        self.fuzzing.result()
    }

    /// Returns the committed attestation record, when one exists.
    #[must_use]
    pub const fn attestation_record(&self) -> Option<&AttestationRecord> {
        self.attestation.result()
    }

    /// Returns the committed browse path. Empty at root.
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Returns the path one level above the committed path.
    ///
    /// `None` at root: up-navigation from root is a no-op, not an error.
    #[must_use]
    pub fn parent_path(&self) -> Option<String> {
        if self.current_path.is_empty() {
            return None;
        }
        match self.current_path.rsplit_once('/') {
            Some((parent, _)) => Some(parent.to_string()),
            None => Some(String::new()),
        }
    }

    /// Returns true when enough results exist to build a report.
    #[must_use]
    pub const fn has_report(&self) -> bool {
        matches!(self.phase(), SessionPhase::Eligible)
            && (self.analysis.result().is_some() || self.fuzzing.result().is_some())
    }

    /// Returns the most recent failure across all sub-states.
    #[must_use]
    pub fn latest_error(&self) -> Option<&SessionError> {
        self.last_error.and_then(|kind| self.error_for(kind))
    }

    /// Returns the captured error for one operation kind.
    #[must_use]
    pub const fn error_for(&self, kind: OperationKind) -> Option<&SessionError> {
        match kind {
            OperationKind::Ingest => self.ingest.error(),
            OperationKind::Browse => self.browse.error(),
            OperationKind::Analyze => self.analysis.error(),
            OperationKind::Fuzz => self.fuzzing.error(),
            OperationKind::Attest => self.attestation.error(),
        }
    }

    /// Returns all captured errors, for aggregated display.
    #[must_use]
    pub fn errors(&self) -> Vec<&SessionError> {
        [
            self.ingest.error(),
            self.browse.error(),
            self.analysis.error(),
            self.fuzzing.error(),
            self.attestation.error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Clears the captured error for one operation kind, resetting that
    /// sub-state to idle. Results of other sub-states are untouched.
    pub fn clear_error(&mut self, kind: OperationKind) {
        /// Resets one sub-state to idle when it currently holds a failure.
        fn reset_failed<T>(slot: &mut OperationState<T>) {
            if matches!(slot, OperationState::Failed(_)) {
                *slot = OperationState::Idle;
            }
        }
        match kind {
            OperationKind::Ingest => reset_failed(&mut self.ingest),
            OperationKind::Browse => reset_failed(&mut self.browse),
            OperationKind::Analyze => reset_failed(&mut self.analysis),
            OperationKind::Fuzz => reset_failed(&mut self.fuzzing),
            OperationKind::Attest => reset_failed(&mut self.attestation),
        }
        if self.last_error == Some(kind) {
            self.last_error = None;
        }
    }
}

impl Default for AuditSession {
    fn default() -> Self {
        Self::new()
    }
}
