// audit-pilot-core/src/core/analysis.rs
// ============================================================================
// Module: Audit Pilot Analysis Types
// Description: Static-analysis findings and scan reports.
// Purpose: Model security findings with ordered severity levels.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A scan produces zero or more findings in detection order; the order is
//! preserved, never re-sorted. Zero findings is a successful scan outcome,
//! distinct from a failed scan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Finding severity. Exactly three ordered levels: low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational or low-impact issue.
    Low,
    /// Issue that should be addressed.
    Medium,
    /// Exploitable or funds-at-risk issue.
    High,
}

impl Severity {
    /// Returns the stable lowercase label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Findings
// ============================================================================

/// Single static-analysis finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// What was found.
    pub description: String,
    /// Source line the finding points at.
    pub line: u32,
    /// Severity level.
    pub severity: Severity,
    /// Suggested remediation.
    pub suggested_fix: String,
}

/// Completed scan: the service message plus findings in detection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Service-provided scan message.
    pub message: String,
    /// Findings in detection order. Empty means a clean scan.
    pub findings: Vec<Finding>,
}

impl ScanReport {
    /// Returns the number of findings at or above the given severity.
    #[must_use]
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity >= severity)
            .count()
    }
}
