// audit-pilot-core/src/runtime/mod.rs
// ============================================================================
// Module: Audit Pilot Runtime
// Description: Session orchestration and report building.
// Purpose: Expose the deterministic session state machine and report renderer.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime owns everything that changes over a session's life: the
//! state machine enforcing gating and stale-response suppression, and the
//! report builder that snapshots committed results into the attested
//! document. No I/O happens here.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod report;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use report::ReportInputs;
pub use report::render_markdown;
pub use session::AuditSession;
pub use session::BeginError;
pub use session::Completion;
pub use session::OperationKind;
pub use session::OperationState;
pub use session::SessionError;
pub use session::SessionPhase;
pub use session::Ticket;
