// audit-pilot-client/src/lib.rs
// ============================================================================
// Module: Audit Pilot Client Library
// Description: HTTP boundary clients and the session driver.
// Purpose: Implement the core boundary interfaces over JSON-over-HTTP and
//          drive sessions against them.
// Dependencies: crate::{driver, gateway, telemetry}
// ============================================================================

//! ## Overview
//! This crate is the I/O half of Audit Pilot. [`AuditGateway`] implements
//! all five boundary interfaces over JSON-over-HTTP POST calls with enforced
//! response-size limits, and [`SessionDriver`] binds a gateway to the
//! deterministic session state machine from `audit-pilot-core`. Telemetry is
//! reported through the [`GatewayMetrics`] sink trait; the default sink
//! discards everything.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod driver;
pub mod gateway;
pub mod telemetry;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use driver::SessionDriver;
pub use gateway::AuditGateway;
pub use gateway::GatewayConfig;
pub use telemetry::CallOutcome;
pub use telemetry::GatewayCall;
pub use telemetry::GatewayMetricEvent;
pub use telemetry::GatewayMetrics;
pub use telemetry::LATENCY_BUCKETS_MS;
pub use telemetry::NoopMetrics;
pub use telemetry::latency_bucket_ms;
