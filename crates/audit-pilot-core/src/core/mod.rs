// audit-pilot-core/src/core/mod.rs
// ============================================================================
// Module: Audit Pilot Core Types
// Description: Canonical domain types for the audit pipeline.
// Purpose: Provide stable, serializable types for ingestion, browsing,
//          analysis, fuzzing, and attestation results.
// Dependencies: serde, sha2, thiserror, url
// ============================================================================

//! ## Overview
//! Core types model the audit pipeline's data: validated repository
//! references, ingestion classification, directory listings and file
//! previews, findings, fuzz plans and outcomes, attestation records, and
//! content hashing. These types are the canonical source of truth for any
//! derived API surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod analysis;
pub mod attestation;
pub mod browse;
pub mod fuzzing;
pub mod hashing;
pub mod ingestion;
pub mod repo;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use analysis::Finding;
pub use analysis::ScanReport;
pub use analysis::Severity;
pub use attestation::AttestationRecord;
pub use browse::BrowseContents;
pub use browse::BrowseView;
pub use browse::ContentEntry;
pub use browse::EntryKind;
pub use browse::FilePreview;
pub use fuzzing::FuzzOutcome;
pub use fuzzing::FuzzPlan;
pub use fuzzing::FuzzPlanError;
pub use fuzzing::MAX_FUZZ_TIMEOUT_SECONDS;
pub use fuzzing::MIN_FUZZ_TIMEOUT_SECONDS;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::hash_bytes;
pub use ingestion::IngestionResult;
pub use ingestion::RepoOwner;
pub use ingestion::RepoSummary;
pub use repo::RepoRef;
pub use repo::RepoRefError;
