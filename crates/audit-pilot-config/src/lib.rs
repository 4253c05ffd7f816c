// audit-pilot-config/src/lib.rs
// ============================================================================
// Module: Audit Pilot Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for audit-pilot.toml semantics.
// Dependencies: audit-pilot-core, serde, toml
// ============================================================================

//! ## Overview
//! `audit-pilot-config` defines the canonical configuration model for Audit
//! Pilot: the audit service endpoint and transport limits, fuzzing defaults,
//! and the ledger explorer used to resolve attestations. Loading is strict
//! and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
