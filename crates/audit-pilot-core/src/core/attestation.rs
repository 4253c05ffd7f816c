// audit-pilot-core/src/core/attestation.rs
// ============================================================================
// Module: Audit Pilot Attestation Types
// Description: Ledger attestation records for audit reports.
// Purpose: Bind a report content hash to a resolvable ledger transaction.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An attestation binds the SHA-256 digest of the exact report bytes to an
//! immutable ledger transaction. The transaction stores the 32-byte digest,
//! so the reference can be independently resolved to recover the same hash.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::HashDigest;

// ============================================================================
// SECTION: Attestation Record
// ============================================================================

/// Verified attestation of a report.
///
/// # Invariants
///
/// `content_hash` equals the digest of the exact submitted report bytes and
/// has been checked against the digest echoed by the attestation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Digest of the submitted report bytes.
    pub content_hash: HashDigest,
    /// Opaque ledger transaction reference, resolvable via an explorer.
    pub transaction_ref: String,
}

impl AttestationRecord {
    /// Creates a record from a verified digest and transaction reference.
    #[must_use]
    pub fn new(content_hash: HashDigest, transaction_ref: impl Into<String>) -> Self {
        Self {
            content_hash,
            transaction_ref: transaction_ref.into(),
        }
    }

    /// Renders the explorer URL for the transaction.
    #[must_use]
    pub fn explorer_url(&self, explorer_base: &str, cluster: &str) -> String {
        let base = explorer_base.trim_end_matches('/');
        format!("{base}/tx/{}?cluster={cluster}", self.transaction_ref)
    }
}
