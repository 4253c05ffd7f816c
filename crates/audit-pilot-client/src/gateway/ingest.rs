// audit-pilot-client/src/gateway/ingest.rs
// ============================================================================
// Module: Ingestion Endpoint Client
// Description: Repository ingestion and eligibility classification.
// Purpose: Map the ingest-repo wire contract onto IngestionResult.
// Dependencies: audit-pilot-core, serde
// ============================================================================

//! ## Overview
//! Ingestion submits a repository URL and receives hosting-provider metadata
//! plus the project-type classification. An ineligible repository arrives as
//! a well-formed response with `success = false` and is mapped to a domain
//! result, never an error. The metadata is preserved either way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use audit_pilot_core::GatewayError;
use audit_pilot_core::IngestionGate;
use audit_pilot_core::IngestionResult;
use audit_pilot_core::RepoOwner;
use audit_pilot_core::RepoRef;
use audit_pilot_core::RepoSummary;
use serde::Deserialize;
use serde::Serialize;

use crate::gateway::AuditGateway;
use crate::telemetry::GatewayCall;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Endpoint path for repository ingestion.
const INGEST_PATH: &str = "/api/ingest-repo";

/// Request body for `POST /api/ingest-repo`.
#[derive(Debug, Serialize)]
struct IngestRequest<'a> {
    /// Repository URL to ingest.
    repo_url: &'a str,
}

/// Response body for `POST /api/ingest-repo`.
#[derive(Debug, Deserialize)]
pub(crate) struct IngestResponse {
    /// Whether ingestion and classification succeeded.
    pub(crate) success: bool,
    /// Service-provided status message.
    pub(crate) message: String,
    /// Repository metadata, present when the reference resolved.
    pub(crate) repo: Option<RepoRecord>,
    /// Project-type classification flag.
    pub(crate) is_anchor_project: Option<bool>,
}

/// Repository metadata record as serialized by the hosting provider.
#[derive(Debug, Deserialize)]
pub(crate) struct RepoRecord {
    /// Provider-assigned numeric repository id.
    pub(crate) id: u64,
    /// Repository name.
    pub(crate) name: String,
    /// Full `owner/name` form.
    pub(crate) full_name: String,
    /// Free-text description.
    pub(crate) description: Option<String>,
    /// Web URL of the repository.
    pub(crate) html_url: String,
    /// Star count.
    pub(crate) stargazers_count: u32,
    /// Fork count.
    pub(crate) forks_count: u32,
    /// Open issue count.
    pub(crate) open_issues_count: u32,
    /// Owner record.
    pub(crate) owner: OwnerRecord,
    /// Primary language, when detected.
    pub(crate) language: Option<String>,
    /// Creation timestamp.
    pub(crate) created_at: String,
    /// Last-update timestamp.
    pub(crate) updated_at: String,
}

/// Owner record attached to repository metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct OwnerRecord {
    /// Owner login.
    pub(crate) login: String,
    /// Avatar image URL.
    pub(crate) avatar_url: Option<String>,
}

// ============================================================================
// SECTION: Domain Mapping
// ============================================================================

impl From<RepoRecord> for RepoSummary {
    fn from(record: RepoRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            full_name: record.full_name,
            description: record.description,
            html_url: record.html_url,
            stargazers_count: record.stargazers_count,
            forks_count: record.forks_count,
            open_issues_count: record.open_issues_count,
            owner: RepoOwner {
                login: record.owner.login,
                avatar_url: record.owner.avatar_url,
            },
            language: record.language,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Maps an ingest response onto the domain result.
///
/// An explicit `is_anchor_project = false` or an in-band failure both mean
/// ineligible; resolved metadata is preserved in either case.
pub(crate) fn map_ingest(response: IngestResponse) -> Result<IngestionResult, GatewayError> {
    let summary = response.repo.map(RepoSummary::from);
    let eligible = response.success && response.is_anchor_project.unwrap_or(true);
    if eligible {
        let Some(repo) = summary else {
            return Err(GatewayError::Protocol(
                "ingest response missing repository metadata".to_string(),
            ));
        };
        return Ok(IngestionResult::eligible(repo, Some(response.message)));
    }
    Ok(IngestionResult::ineligible(summary, Some(response.message)))
}

// ============================================================================
// SECTION: Boundary Implementation
// ============================================================================

#[async_trait]
impl IngestionGate for AuditGateway {
    async fn ingest(&self, repo: &RepoRef) -> Result<IngestionResult, GatewayError> {
        let request = IngestRequest {
            repo_url: repo.url(),
        };
        let response: IngestResponse =
            self.post_json(GatewayCall::IngestRepo, INGEST_PATH, &request).await?;
        map_ingest(response)
    }
}
