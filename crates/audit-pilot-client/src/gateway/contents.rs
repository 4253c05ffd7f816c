// audit-pilot-client/src/gateway/contents.rs
// ============================================================================
// Module: Contents Endpoint Client
// Description: Directory listings and file previews for eligible repositories.
// Purpose: Map the repo-contents wire contract onto BrowseView.
// Dependencies: audit-pilot-core, base64, serde
// ============================================================================

//! ## Overview
//! A contents request resolves to either a directory listing or a single
//! file. The provider encodes file bodies as base64 with embedded newlines;
//! decoding strips whitespace first and degrades to a preview without text
//! when the content is not valid base64 or not UTF-8. The external URL stays
//! usable either way, so an undecodable preview is never an operation
//! failure. An empty listing is a successful result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use audit_pilot_core::BrowseContents;
use audit_pilot_core::BrowseView;
use audit_pilot_core::ContentBrowser;
use audit_pilot_core::ContentEntry;
use audit_pilot_core::EntryKind;
use audit_pilot_core::FilePreview;
use audit_pilot_core::GatewayError;
use audit_pilot_core::RepoRef;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::Serialize;

use crate::gateway::AuditGateway;
use crate::telemetry::GatewayCall;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Endpoint path for repository contents.
const CONTENTS_PATH: &str = "/api/repo-contents";

/// Request body for `POST /api/repo-contents`.
#[derive(Debug, Serialize)]
struct ContentsRequest<'a> {
    /// Repository URL to browse.
    repo_url: &'a str,
    /// Repository-relative path. Omitted for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

/// Response body for `POST /api/repo-contents`.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentsResponse {
    /// Whether the fetch succeeded.
    pub(crate) success: bool,
    /// Service-provided status message.
    pub(crate) message: String,
    /// Directory entries, when the path resolved to a directory.
    pub(crate) contents: Option<Vec<ContentRecord>>,
    /// Single file record, when the path resolved to a file.
    pub(crate) file_content: Option<ContentRecord>,
    /// Path the response was resolved for, echoed by the service.
    pub(crate) path: String,
}

/// One content record as serialized by the hosting provider.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentRecord {
    /// Entry name within its directory.
    pub(crate) name: String,
    /// Repository-relative path of the entry.
    pub(crate) path: String,
    /// Size in bytes, when the provider reports one.
    pub(crate) size: Option<u64>,
    /// Provider-reported entry type.
    #[serde(rename = "type")]
    pub(crate) content_type: String,
    /// Raw download URL.
    pub(crate) download_url: Option<String>,
    /// Web URL of the entry.
    pub(crate) html_url: Option<String>,
    /// Embedded file body, when the provider inlines it.
    pub(crate) content: Option<String>,
    /// Encoding of the embedded body.
    pub(crate) encoding: Option<String>,
}

// ============================================================================
// SECTION: Domain Mapping
// ============================================================================

/// Maps a contents response onto the domain browse view.
///
/// A one-element listing whose entry embeds content is the provider's
/// single-file shape and maps to a preview, same as `file_content`.
pub(crate) fn map_contents(response: ContentsResponse) -> Result<BrowseView, GatewayError> {
    if !response.success {
        return Err(GatewayError::Protocol(format!(
            "contents unavailable: {}",
            response.message
        )));
    }
    let path = response.path;
    if let Some(file) = response.file_content {
        return Ok(BrowseView {
            path,
            contents: BrowseContents::File(map_preview(file)),
        });
    }
    let Some(mut entries) = response.contents else {
        return Err(GatewayError::Protocol(
            "contents response carried neither a listing nor a file".to_string(),
        ));
    };
    if entries.len() == 1
        && entries[0].content.is_some()
        && let Some(file) = entries.pop()
    {
        return Ok(BrowseView {
            path,
            contents: BrowseContents::File(map_preview(file)),
        });
    }
    let entries = entries.into_iter().map(map_entry).collect();
    Ok(BrowseView {
        path,
        contents: BrowseContents::Listing(entries),
    })
}

/// Maps one content record onto a directory entry.
fn map_entry(record: ContentRecord) -> ContentEntry {
    ContentEntry {
        name: record.name,
        path: record.path,
        kind: EntryKind::from_wire(&record.content_type),
        size: record.size,
        html_url: record.html_url,
        download_url: record.download_url,
    }
}

/// Maps one content record onto a file preview, decoding embedded content.
fn map_preview(record: ContentRecord) -> FilePreview {
    let text = decode_embedded(record.content.as_deref(), record.encoding.as_deref());
    FilePreview {
        name: record.name,
        path: record.path,
        size: record.size,
        text,
        html_url: record.html_url,
    }
}

/// Decodes an embedded file body into preview text.
///
/// Base64 content is decoded after stripping embedded whitespace; anything
/// undecodable (or any unknown encoding) yields `None` so the preview
/// degrades without failing the operation.
pub(crate) fn decode_embedded(content: Option<&str>, encoding: Option<&str>) -> Option<String> {
    let content = content?;
    match encoding {
        Some("base64") => {
            let compact: String = content.chars().filter(|ch| !ch.is_whitespace()).collect();
            let bytes = STANDARD.decode(compact.as_bytes()).ok()?;
            String::from_utf8(bytes).ok()
        }
        None | Some("utf-8") => Some(content.to_string()),
        Some(_) => None,
    }
}

// ============================================================================
// SECTION: Boundary Implementation
// ============================================================================

#[async_trait]
impl ContentBrowser for AuditGateway {
    async fn list(&self, repo: &RepoRef, path: &str) -> Result<BrowseView, GatewayError> {
        let request = ContentsRequest {
            repo_url: repo.url(),
            path: if path.is_empty() { None } else { Some(path) },
        };
        let response: ContentsResponse =
            self.post_json(GatewayCall::RepoContents, CONTENTS_PATH, &request).await?;
        map_contents(response)
    }
}
