// audit-pilot-core/src/core/repo.rs
// ============================================================================
// Module: Audit Pilot Repository References
// Description: Validated repository references for GitHub-hosted projects.
// Purpose: Reject malformed repository URLs before any request is dispatched.
// Dependencies: serde, thiserror, url
// ============================================================================

//! ## Overview
//! A [`RepoRef`] is the validated identity of an audited repository: owner,
//! name, and the canonical URL submitted to the audit service. Parsing accepts
//! the common GitHub URL shapes (with or without a scheme, with trailing
//! slashes or extra path segments) and fails closed on anything else.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing a repository reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoRefError {
    /// Input was empty or whitespace only.
    #[error("repository url is empty")]
    Empty,
    /// Input could not be parsed as a URL at all.
    #[error("repository url is malformed: {0}")]
    Malformed(String),
    /// URL host is not a recognized GitHub host.
    #[error("unsupported repository host: {0}")]
    UnsupportedHost(String),
    /// URL path does not contain both an owner and a repository name.
    #[error("repository url must include owner and name")]
    MissingSegments,
}

// ============================================================================
// SECTION: Repository Reference
// ============================================================================

/// Validated reference to a GitHub-hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization login).
    owner: String,
    /// Repository name.
    name: String,
    /// Canonical URL as submitted to the audit service.
    url: String,
}

impl RepoRef {
    /// Parses a repository reference from user input.
    ///
    /// Accepted shapes are `https://github.com/OWNER/NAME`,
    /// `github.com/OWNER/NAME`, and either form with trailing slashes or
    /// extra path segments such as `/tree/main`. The stored canonical URL is
    /// the trimmed input with trailing slashes removed.
    ///
    /// # Errors
    ///
    /// Returns [`RepoRefError`] when the input is empty, unparsable, hosted
    /// outside GitHub, or missing the owner or name path segments.
    pub fn parse(input: &str) -> Result<Self, RepoRefError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RepoRefError::Empty);
        }
        let canonical = trimmed.trim_end_matches('/');
        let with_scheme = if canonical.contains("://") {
            canonical.to_string()
        } else {
            format!("https://{canonical}")
        };
        let parsed =
            Url::parse(&with_scheme).map_err(|err| RepoRefError::Malformed(err.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| RepoRefError::Malformed("missing host".to_string()))?;
        if !host.contains("github") {
            return Err(RepoRefError::UnsupportedHost(host.to_string()));
        }
        let mut segments = parsed.path_segments().ok_or(RepoRefError::MissingSegments)?;
        let owner = segments
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or(RepoRefError::MissingSegments)?;
        let name = segments
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or(RepoRefError::MissingSegments)?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            url: canonical.to_string(),
        })
    }

    /// Returns the repository owner login.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the canonical URL submitted to the audit service.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the `owner/name` form used in report headers.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
