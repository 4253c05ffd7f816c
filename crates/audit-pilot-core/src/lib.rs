// audit-pilot-core/src/lib.rs
// ============================================================================
// Module: Audit Pilot Core Library
// Description: Public API surface for the Audit Pilot core.
// Purpose: Expose core types, boundary interfaces, and the session runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Audit Pilot core provides the deterministic session state machine and the
//! domain types for repository ingestion, content browsing, static analysis,
//! fuzz testing, and report attestation. It performs no I/O and integrates
//! through explicit boundary interfaces rather than embedding a transport.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::AttestationService;
pub use interfaces::ContentBrowser;
pub use interfaces::FuzzRunner;
pub use interfaces::GatewayError;
pub use interfaces::IngestionGate;
pub use interfaces::StaticAnalyzer;
pub use runtime::AuditSession;
pub use runtime::BeginError;
pub use runtime::Completion;
pub use runtime::OperationKind;
pub use runtime::OperationState;
pub use runtime::ReportInputs;
pub use runtime::SessionError;
pub use runtime::SessionPhase;
pub use runtime::Ticket;
pub use runtime::render_markdown;
