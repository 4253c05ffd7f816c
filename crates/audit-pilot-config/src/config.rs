// audit-pilot-config/src/config.rs
// ============================================================================
// Module: Audit Pilot Configuration
// Description: Configuration loading and validation for Audit Pilot.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: audit-pilot-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! An explicitly named file that is missing or invalid fails closed; only
//! when no file was named and the default file does not exist do validated
//! defaults apply.
//!
//! Security posture: config inputs are untrusted. Out-of-range limits and
//! malformed endpoints are rejected before any client is built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use audit_pilot_core::MAX_FUZZ_TIMEOUT_SECONDS;
use audit_pilot_core::MIN_FUZZ_TIMEOUT_SECONDS;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "audit-pilot.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "AUDIT_PILOT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum allowed request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum allowed request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 120_000;
/// Maximum allowed response size limit in bytes.
pub(crate) const MAX_RESPONSE_BYTES_LIMIT: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Audit Pilot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditPilotConfig {
    /// Audit service configuration.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Fuzzing defaults.
    #[serde(default)]
    pub fuzz: FuzzConfig,
    /// Ledger explorer configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl AuditPilotConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path resolves from the argument, then the `AUDIT_PILOT_CONFIG`
    /// environment variable, then `audit-pilot.toml`. A missing explicitly
    /// named file is an error; a missing default file yields validated
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()?;
        self.fuzz.validate()?;
        self.ledger.validate()?;
        Ok(())
    }
}

/// Audit service endpoint and transport limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the audit service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Transport-wide request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_ms: default_request_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl ServiceConfig {
    /// Validates service endpoint and transport limits.
    fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Invalid("service.endpoint must be set".to_string()));
        }
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::Invalid(
                "service.endpoint must include http:// or https://".to_string(),
            ));
        }
        if !(MIN_REQUEST_TIMEOUT_MS..=MAX_REQUEST_TIMEOUT_MS).contains(&self.request_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "service.request_timeout_ms must be between {MIN_REQUEST_TIMEOUT_MS} and \
                 {MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "service.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Defaults applied when a fuzz run omits explicit parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Instruction targeted when none is named.
    #[serde(default = "default_instruction")]
    pub default_instruction: String,
    /// Time budget used when none is given, in seconds.
    #[serde(default = "default_fuzz_timeout_seconds")]
    pub default_timeout_seconds: u64,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            default_instruction: default_instruction(),
            default_timeout_seconds: default_fuzz_timeout_seconds(),
        }
    }
}

impl FuzzConfig {
    /// Validates fuzz defaults against the sandbox bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_instruction.trim().is_empty() {
            return Err(ConfigError::Invalid("fuzz.default_instruction must be set".to_string()));
        }
        if !(MIN_FUZZ_TIMEOUT_SECONDS..=MAX_FUZZ_TIMEOUT_SECONDS)
            .contains(&self.default_timeout_seconds)
        {
            return Err(ConfigError::Invalid(format!(
                "fuzz.default_timeout_seconds must be between {MIN_FUZZ_TIMEOUT_SECONDS} and \
                 {MAX_FUZZ_TIMEOUT_SECONDS}"
            )));
        }
        Ok(())
    }
}

/// Ledger explorer used to resolve attestation transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Explorer base URL.
    #[serde(default = "default_explorer_base")]
    pub explorer_base: String,
    /// Cluster query parameter appended to explorer links.
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            explorer_base: default_explorer_base(),
            cluster: default_cluster(),
        }
    }
}

impl LedgerConfig {
    /// Validates explorer settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let base = self.explorer_base.trim();
        if base.is_empty() {
            return Err(ConfigError::Invalid("ledger.explorer_base must be set".to_string()));
        }
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::Invalid(
                "ledger.explorer_base must include http:// or https://".to_string(),
            ));
        }
        let cluster = self.cluster.trim();
        if cluster.is_empty() {
            return Err(ConfigError::Invalid("ledger.cluster must be set".to_string()));
        }
        if cluster.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "ledger.cluster must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// The boolean is true when the path was explicitly named via argument or
/// environment, which makes a missing file an error instead of defaults.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Default audit service endpoint.
fn default_endpoint() -> String {
    "http://127.0.0.1:8080".to_string()
}

/// Default request timeout in milliseconds.
pub(crate) const fn default_request_timeout_ms() -> u64 {
    30_000
}

/// Default maximum response body size in bytes.
pub(crate) const fn default_max_response_bytes() -> usize {
    1024 * 1024
}

/// Default fuzz instruction name.
fn default_instruction() -> String {
    "increment".to_string()
}

/// Default fuzz time budget in seconds.
pub(crate) const fn default_fuzz_timeout_seconds() -> u64 {
    30
}

/// Default ledger explorer base URL.
fn default_explorer_base() -> String {
    "https://explorer.solana.com".to_string()
}

/// Default ledger cluster.
fn default_cluster() -> String {
    "devnet".to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
