// audit-pilot-core/src/core/ingestion.rs
// ============================================================================
// Module: Audit Pilot Ingestion Types
// Description: Repository metadata and eligibility classification results.
// Purpose: Model the outcome of submitting a repository to the audit service.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Ingestion resolves a repository reference against the hosting provider and
//! classifies the project as eligible or ineligible for the audit pipeline.
//! Ineligibility is a terminal classification, not an error: the repository
//! metadata is preserved so callers can still render what was found.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Repository Metadata
// ============================================================================

/// Owner record attached to repository metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    /// Owner login (user or organization).
    pub login: String,
    /// Avatar image URL, when the provider supplies one.
    pub avatar_url: Option<String>,
}

/// Repository metadata returned by the hosting provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    /// Provider-assigned numeric repository id.
    pub id: u64,
    /// Repository name.
    pub name: String,
    /// Full `owner/name` form.
    pub full_name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Web URL of the repository.
    pub html_url: String,
    /// Star count at ingestion time.
    pub stargazers_count: u32,
    /// Fork count at ingestion time.
    pub forks_count: u32,
    /// Open issue count at ingestion time.
    pub open_issues_count: u32,
    /// Owner record.
    pub owner: RepoOwner,
    /// Primary language, when detected.
    pub language: Option<String>,
    /// Creation timestamp as reported by the provider.
    pub created_at: String,
    /// Last-update timestamp as reported by the provider.
    pub updated_at: String,
}

// ============================================================================
// SECTION: Ingestion Result
// ============================================================================

/// Outcome of ingesting a repository reference.
///
/// # Invariants
///
/// `repo` is present iff the reference resolved at the provider. `eligible`
/// may be false while `repo` is present: the repository exists but failed
/// project-type classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Whether the repository may proceed to browsing, analysis, and fuzzing.
    pub eligible: bool,
    /// Repository metadata, when the reference resolved.
    pub repo: Option<RepoSummary>,
    /// Service-provided classification message.
    pub reason: Option<String>,
}

impl IngestionResult {
    /// Creates an eligible result carrying resolved metadata.
    #[must_use]
    pub fn eligible(repo: RepoSummary, reason: Option<String>) -> Self {
        Self {
            eligible: true,
            repo: Some(repo),
            reason,
        }
    }

    /// Creates an ineligible result, preserving any resolved metadata.
    #[must_use]
    pub fn ineligible(repo: Option<RepoSummary>, reason: Option<String>) -> Self {
        Self {
            eligible: false,
            repo,
            reason,
        }
    }
}
