// audit-pilot-core/src/core/fuzzing.rs
// ============================================================================
// Module: Audit Pilot Fuzzing Types
// Description: Validated fuzz plans and fuzz run outcomes.
// Purpose: Enforce the sandbox time bound before any request is dispatched.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A fuzz run targets one named instruction inside the audited program with a
//! bounded time budget. The budget is validated here, on the client side, so
//! an out-of-range request never reaches the network. A completed run that
//! found issues is an expected outcome, not a failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Bounds
// ============================================================================

/// Minimum accepted fuzz timeout in seconds.
pub const MIN_FUZZ_TIMEOUT_SECONDS: u64 = 1;

/// Maximum accepted fuzz timeout in seconds. Matches the sandbox cap.
pub const MAX_FUZZ_TIMEOUT_SECONDS: u64 = 120;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing a fuzz plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FuzzPlanError {
    /// Instruction name was empty or whitespace only.
    #[error("fuzz instruction name must not be blank")]
    BlankInstruction,
    /// Timeout fell outside the accepted range.
    #[error(
        "fuzz timeout must be between {MIN_FUZZ_TIMEOUT_SECONDS} and \
         {MAX_FUZZ_TIMEOUT_SECONDS} seconds, got {requested}"
    )]
    TimeoutOutOfRange {
        /// Timeout value that was rejected.
        requested: u64,
    },
}

// ============================================================================
// SECTION: Fuzz Plan
// ============================================================================

/// Validated request for one fuzz run.
///
/// # Invariants
///
/// `instruction_name` is trimmed and non-blank; `timeout_seconds` lies within
/// `MIN_FUZZ_TIMEOUT_SECONDS..=MAX_FUZZ_TIMEOUT_SECONDS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzPlan {
    /// Entry point inside the target program interface.
    instruction_name: String,
    /// Time budget handed to the execution sandbox, in seconds.
    timeout_seconds: u64,
}

impl FuzzPlan {
    /// Builds a fuzz plan, enforcing the instruction and timeout constraints.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzPlanError::BlankInstruction`] for a blank name and
    /// [`FuzzPlanError::TimeoutOutOfRange`] for a budget outside the accepted
    /// range.
    pub fn new(instruction_name: &str, timeout_seconds: u64) -> Result<Self, FuzzPlanError> {
        let trimmed = instruction_name.trim();
        if trimmed.is_empty() {
            return Err(FuzzPlanError::BlankInstruction);
        }
        if !(MIN_FUZZ_TIMEOUT_SECONDS..=MAX_FUZZ_TIMEOUT_SECONDS).contains(&timeout_seconds) {
            return Err(FuzzPlanError::TimeoutOutOfRange {
                requested: timeout_seconds,
            });
        }
        Ok(Self {
            instruction_name: trimmed.to_string(),
            timeout_seconds,
        })
    }

    /// Returns the targeted instruction name.
    #[must_use]
    pub fn instruction_name(&self) -> &str {
        &self.instruction_name
    }

    /// Returns the sandbox time budget in seconds.
    #[must_use]
    pub const fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

// ============================================================================
// SECTION: Fuzz Outcome
// ============================================================================

/// Result of a completed fuzz run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzOutcome {
    /// True when the run completed without discovering issues.
    pub passed: bool,
    /// Issues discovered during the run. Non-empty with `passed = false` is
    /// the expected "found a bug" outcome.
    pub issues: Vec<String>,
    /// Generated test artifact, when the sandbox produced one.
    pub generated_artifact: Option<String>,
    /// Wall-clock run time reported by the sandbox, in milliseconds.
    pub elapsed_ms: u64,
    /// Service-provided outcome message.
    pub message: String,
}
