// audit-pilot-core/tests/fuzz_plan.rs
// ============================================================================
// Module: Fuzz Plan Tests
// Description: Validation coverage for fuzz plan construction.
// ============================================================================
//! ## Overview
//! Validates the client-side timeout bound and instruction name constraints
//! that must hold before a fuzz request may be dispatched.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use audit_pilot_core::FuzzPlan;
use audit_pilot_core::FuzzPlanError;
use audit_pilot_core::MAX_FUZZ_TIMEOUT_SECONDS;
use audit_pilot_core::MIN_FUZZ_TIMEOUT_SECONDS;
use proptest::prelude::*;

// ============================================================================
// SECTION: Accepted Plans
// ============================================================================

/// Tests plan construction inside the bounds.
#[test]
fn test_plan_accepts_bounds_inclusive() {
    let low = FuzzPlan::new("withdraw", MIN_FUZZ_TIMEOUT_SECONDS).unwrap();
    assert_eq!(low.timeout_seconds(), 1);

    let high = FuzzPlan::new("withdraw", MAX_FUZZ_TIMEOUT_SECONDS).unwrap();
    assert_eq!(high.timeout_seconds(), 120);
    assert_eq!(high.instruction_name(), "withdraw");
}

/// Tests that instruction names are stored trimmed.
#[test]
fn test_plan_trims_instruction_name() {
    let plan = FuzzPlan::new("  withdraw  ", 30).unwrap();
    assert_eq!(plan.instruction_name(), "withdraw");
}

// ============================================================================
// SECTION: Rejected Plans
// ============================================================================

/// Tests rejection outside the timeout bounds.
#[test]
fn test_plan_rejects_out_of_range_timeouts() {
    assert_eq!(
        FuzzPlan::new("withdraw", 0),
        Err(FuzzPlanError::TimeoutOutOfRange { requested: 0 })
    );
    assert_eq!(
        FuzzPlan::new("withdraw", 121),
        Err(FuzzPlanError::TimeoutOutOfRange { requested: 121 })
    );
}

/// Tests rejection of blank instruction names.
#[test]
fn test_plan_rejects_blank_instruction() {
    assert_eq!(FuzzPlan::new("", 30), Err(FuzzPlanError::BlankInstruction));
    assert_eq!(FuzzPlan::new("   ", 30), Err(FuzzPlanError::BlankInstruction));
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    /// Every timeout outside the accepted range is rejected.
    #[test]
    fn prop_out_of_range_timeouts_rejected(timeout in prop_oneof![
        Just(0_u64),
        (MAX_FUZZ_TIMEOUT_SECONDS + 1)..10_000_u64,
    ]) {
        prop_assert_eq!(
            FuzzPlan::new("withdraw", timeout),
            Err(FuzzPlanError::TimeoutOutOfRange { requested: timeout })
        );
    }

    /// Every timeout inside the accepted range is accepted.
    #[test]
    fn prop_in_range_timeouts_accepted(
        timeout in MIN_FUZZ_TIMEOUT_SECONDS..=MAX_FUZZ_TIMEOUT_SECONDS,
    ) {
        let plan = FuzzPlan::new("withdraw", timeout).unwrap();
        prop_assert_eq!(plan.timeout_seconds(), timeout);
    }
}
