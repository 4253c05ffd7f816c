// audit-pilot-client/src/telemetry.rs
// ============================================================================
// Module: Gateway Telemetry
// Description: Dependency-light metric labels and sink for boundary calls.
// Purpose: Let hosts observe gateway traffic without a metrics framework.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! The gateway records one [`GatewayMetricEvent`] per boundary call and the
//! session driver records wall-clock latency per operation it drives. Sinks
//! implement [`GatewayMetrics`]; [`NoopMetrics`] is the default. Labels are
//! static strings so sinks can aggregate without allocation.

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Boundary call label, one per audit service endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayCall {
    /// `POST /api/ingest-repo`.
    IngestRepo,
    /// `POST /api/repo-contents`.
    RepoContents,
    /// `POST /api/analyze-code`.
    AnalyzeCode,
    /// `POST /api/fuzz-test`.
    FuzzTest,
    /// `POST /api/log-report`.
    LogReport,
}

impl GatewayCall {
    /// Returns the stable label for the call.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IngestRepo => "ingest_repo",
            Self::RepoContents => "repo_contents",
            Self::AnalyzeCode => "analyze_code",
            Self::FuzzTest => "fuzz_test",
            Self::LogReport => "log_report",
        }
    }
}

/// Outcome label for a boundary call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallOutcome {
    /// Call produced a decoded domain result.
    Ok,
    /// Call failed with a gateway error.
    Error,
}

impl CallOutcome {
    /// Returns the stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// SECTION: Latency Buckets
// ============================================================================

/// Upper bounds of the latency histogram buckets, in milliseconds.
pub const LATENCY_BUCKETS_MS: [u64; 10] =
    [10, 50, 100, 250, 500, 1_000, 2_500, 5_000, 30_000, 120_000];

/// Returns the histogram bucket upper bound for an observed latency.
///
/// Latencies above the last bucket saturate into it.
#[must_use]
pub fn latency_bucket_ms(elapsed_ms: u64) -> u64 {
    for bound in LATENCY_BUCKETS_MS {
        if elapsed_ms <= bound {
            return bound;
        }
    }
    LATENCY_BUCKETS_MS[LATENCY_BUCKETS_MS.len() - 1]
}

// ============================================================================
// SECTION: Events and Sink
// ============================================================================

/// One observed boundary call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayMetricEvent {
    /// Endpoint the call targeted.
    pub call: GatewayCall,
    /// Call outcome.
    pub outcome: CallOutcome,
    /// Serialized request body size in bytes.
    pub request_bytes: u64,
    /// Received response body size in bytes. Zero when nothing was read.
    pub response_bytes: u64,
    /// Error kind label when the call failed.
    pub error_kind: Option<&'static str>,
}

/// Sink for gateway telemetry.
pub trait GatewayMetrics: Send + Sync {
    /// Records one boundary call event.
    fn record_request(&self, event: &GatewayMetricEvent);

    /// Records the wall-clock latency of one driven operation.
    fn record_latency(&self, call: GatewayCall, elapsed_ms: u64);
}

/// Metrics sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl GatewayMetrics for NoopMetrics {
    fn record_request(&self, _event: &GatewayMetricEvent) {}

    fn record_latency(&self, _call: GatewayCall, _elapsed_ms: u64) {}
}
