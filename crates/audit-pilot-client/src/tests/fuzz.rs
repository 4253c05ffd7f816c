// audit-pilot-client/src/tests/fuzz.rs
// ============================================================================
// Module: Fuzz Endpoint Tests
// Description: Unit tests for fuzz response mapping and bound enforcement.
// Purpose: Ensure outcome mapping and the pre-dispatch timeout rejection.
// Dependencies: audit-pilot-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! Validates the fuzz-test mapping: completed runs with and without issues,
//! field defaulting, the request body shape, and that out-of-range plans are
//! rejected before anything reaches the transport.

// ============================================================================
// SECTION: Imports
// ============================================================================

use audit_pilot_core::FuzzPlan;
use audit_pilot_core::FuzzPlanError;
use audit_pilot_core::FuzzRunner;
use serde_json::json;

use crate::tests::support::TestHttpServer;
use crate::tests::support::TestResponse;
use crate::tests::support::test_gateway;
use crate::tests::support::vault_repo;

use crate::gateway::fuzz::FuzzResponse;
use crate::gateway::fuzz::map_fuzz;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn response_from(value: serde_json::Value) -> FuzzResponse {
    serde_json::from_value(value).expect("decode fuzz response")
}

// ============================================================================
// SECTION: Mapping
// ============================================================================

#[test]
fn passing_run_maps_to_passed_outcome() {
    let response = response_from(json!({
        "success": true,
        "message": "Fuzzing tests completed successfully",
        "errors": [],
        "test_file": "#[test]\nfn fuzz_withdraw() {}",
        "execution_time_ms": 812
    }));

    let outcome = map_fuzz(response);
    assert!(outcome.passed);
    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.generated_artifact.as_deref(), Some("#[test]\nfn fuzz_withdraw() {}"));
    assert_eq!(outcome.elapsed_ms, 812);
}

#[test]
fn found_issues_is_completed_outcome_not_error() {
    let response = response_from(json!({
        "success": false,
        "message": "Fuzzing tests found potential issues",
        "errors": ["integer overflow at line 57", "panic on zero amount"],
        "execution_time_ms": 4200
    }));

    let outcome = map_fuzz(response);
    assert!(!outcome.passed);
    assert_eq!(outcome.issues.len(), 2);
    assert_eq!(outcome.issues[0], "integer overflow at line 57");
    assert_eq!(outcome.message, "Fuzzing tests found potential issues");
}

#[test]
fn reported_success_with_issues_still_fails() {
    let response = response_from(json!({
        "success": true,
        "message": "Fuzzing tests completed",
        "errors": ["integer overflow at line 57"],
        "execution_time_ms": 4200
    }));

    let outcome = map_fuzz(response);
    assert!(!outcome.passed, "a run with issues must not pass");
    assert_eq!(outcome.issues, vec!["integer overflow at line 57"]);
}

#[test]
fn missing_optional_fields_default() {
    let response = response_from(json!({
        "success": false,
        "message": "Fuzzing tests timed out"
    }));

    let outcome = map_fuzz(response);
    assert!(!outcome.passed);
    assert!(outcome.issues.is_empty());
    assert!(outcome.generated_artifact.is_none());
    assert_eq!(outcome.elapsed_ms, 0);
}

// ============================================================================
// SECTION: Bound Enforcement
// ============================================================================

#[tokio::test]
async fn out_of_range_plans_never_reach_the_transport() {
    let server = TestHttpServer::start(|_req| {
        TestResponse::json(&json!({
            "success": true,
            "message": "Fuzzing tests completed successfully"
        }))
    })
    .await;
    let _gateway = test_gateway(&server.url());

    assert_eq!(
        FuzzPlan::new("withdraw", 0).unwrap_err(),
        FuzzPlanError::TimeoutOutOfRange { requested: 0 }
    );
    assert_eq!(
        FuzzPlan::new("withdraw", 121).unwrap_err(),
        FuzzPlanError::TimeoutOutOfRange { requested: 121 }
    );
    assert_eq!(FuzzPlan::new("   ", 30).unwrap_err(), FuzzPlanError::BlankInstruction);

    // No plan, no request: the transport spy saw nothing.
    assert!(server.requests().await.is_empty());
    server.shutdown().await;
}

#[test]
fn boundary_timeouts_are_accepted() {
    assert!(FuzzPlan::new("withdraw", 1).is_ok());
    assert!(FuzzPlan::new("withdraw", 120).is_ok());
}

// ============================================================================
// SECTION: Wire Shape
// ============================================================================

#[tokio::test]
async fn fuzz_posts_plan_fields_to_fuzz_path() {
    let server = TestHttpServer::start(|_req| {
        TestResponse::json(&json!({
            "success": false,
            "message": "Fuzzing tests found potential issues",
            "errors": ["integer overflow at line 57"],
            "execution_time_ms": 4200
        }))
    })
    .await;

    let gateway = test_gateway(&server.url());
    let plan = FuzzPlan::new("withdraw", 30).unwrap();
    let outcome = gateway.fuzz(&vault_repo(), &plan).await.unwrap();
    assert!(!outcome.passed);
    assert_eq!(outcome.elapsed_ms, 4200);

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].uri, "/api/fuzz-test");
    assert_eq!(
        requests[0].body_json(),
        json!({
            "repo_url": "https://github.com/acme/vault",
            "instruction_name": "withdraw",
            "timeout_seconds": 30
        })
    );
    server.shutdown().await;
}
