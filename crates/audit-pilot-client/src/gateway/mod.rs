// audit-pilot-client/src/gateway/mod.rs
// ============================================================================
// Module: Audit Service Gateway
// Description: Shared JSON-over-HTTP transport for the audit service.
// Purpose: Drive all five endpoints through one bounded POST helper.
// Dependencies: audit-pilot-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! One [`AuditGateway`] implements all five boundary seams. The per-endpoint
//! modules own their wire types and domain mapping; this module owns the
//! HTTP client, the shared `post_json` helper, and the response size limit.
//! Redirects are disabled and bodies are read chunk-wise against the limit.
//!
//! Security posture: service responses are untrusted. Oversized, non-2xx,
//! empty, and undecodable bodies all fail closed with distinct errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use audit_pilot_core::GatewayError;
use reqwest::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::telemetry::CallOutcome;
use crate::telemetry::GatewayCall;
use crate::telemetry::GatewayMetricEvent;
use crate::telemetry::GatewayMetrics;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Modules
// ============================================================================

pub(crate) mod analyze;
pub(crate) mod attest;
pub(crate) mod contents;
pub(crate) mod fuzz;
pub(crate) mod ingest;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum response body preview included in error strings.
const MAX_ERROR_BODY_BYTES: usize = 2048;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the audit service gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the audit service.
    pub endpoint: String,
    /// Transport-wide request timeout.
    pub request_timeout: Duration,
    /// Maximum accepted response body size in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_string(),
            request_timeout: Duration::from_millis(30_000),
            max_response_bytes: 1024 * 1024,
            user_agent: "audit-pilot/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// JSON-over-HTTP client for the audit service.
///
/// Implements [`audit_pilot_core::IngestionGate`],
/// [`audit_pilot_core::ContentBrowser`], [`audit_pilot_core::StaticAnalyzer`],
/// [`audit_pilot_core::FuzzRunner`], and
/// [`audit_pilot_core::AttestationService`].
pub struct AuditGateway {
    /// Service base URL (no trailing slash).
    endpoint: String,
    /// HTTP client with timeout and redirects disabled.
    client: Client,
    /// Maximum accepted response body size in bytes.
    max_response_bytes: usize,
    /// Metrics sink receiving one event per boundary call.
    metrics: Arc<dyn GatewayMetrics>,
}

impl AuditGateway {
    /// Builds a gateway with a no-op metrics sink.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        Self::with_metrics(config, Arc::new(NoopMetrics))
    }

    /// Builds a gateway with an explicit metrics sink.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the HTTP client cannot be built.
    pub fn with_metrics(
        config: GatewayConfig,
        metrics: Arc<dyn GatewayMetrics>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| GatewayError::Transport(format!("http client build failed: {err}")))?;
        let mut endpoint = config.endpoint;
        let trimmed_len = endpoint.trim_end_matches('/').len();
        endpoint.truncate(trimmed_len);
        Ok(Self {
            endpoint,
            client,
            max_response_bytes: config.max_response_bytes,
            metrics,
        })
    }

    /// Posts a JSON request and decodes the typed JSON response.
    ///
    /// All five endpoints go through here. One metric event is recorded per
    /// call that reaches the boundary.
    pub(crate) async fn post_json<Req, Resp>(
        &self,
        call: GatewayCall,
        path: &str,
        request: &Req,
    ) -> Result<Resp, GatewayError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request)
            .map_err(|err| GatewayError::Validation(format!("request serialization failed: {err}")))?;
        let request_bytes = u64::try_from(payload.len()).unwrap_or(u64::MAX);
        let sent = self.send_bytes(path, payload).await;
        let response_bytes = match &sent {
            Ok(body) => u64::try_from(body.len()).unwrap_or(u64::MAX),
            Err(_) => 0,
        };
        let decoded = sent.and_then(|body| decode_body::<Resp>(&body));
        let event = GatewayMetricEvent {
            call,
            outcome: if decoded.is_ok() {
                CallOutcome::Ok
            } else {
                CallOutcome::Error
            },
            request_bytes,
            response_bytes,
            error_kind: decoded.as_ref().err().map(|err| err.kind_label()),
        };
        self.metrics.record_request(&event);
        decoded
    }

    /// Sends the serialized request and returns the raw 2xx body.
    async fn send_bytes(&self, path: &str, payload: Vec<u8>) -> Result<Vec<u8>, GatewayError> {
        let url = format!("{}{path}", self.endpoint);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(format!("http request failed: {err}")))?;
        let status = response.status();
        let mut response = response;
        let body = self.read_body_with_limit(&mut response).await?;
        if !status.is_success() {
            if body.is_empty() {
                return Err(GatewayError::Transport(format!("http status {status}")));
            }
            let detail = in_band_message(&body).unwrap_or_else(|| body_preview(&body));
            return Err(GatewayError::Transport(format!("http status {status}: {detail}")));
        }
        Ok(body)
    }

    /// Reads the response body while enforcing the configured size limit.
    async fn read_body_with_limit(
        &self,
        response: &mut reqwest::Response,
    ) -> Result<Vec<u8>, GatewayError> {
        let limit = u64::try_from(self.max_response_bytes)
            .map_err(|_| GatewayError::Protocol("response size limit out of range".to_string()))?;
        if let Some(length) = response.content_length()
            && length > limit
        {
            return Err(GatewayError::ResponseTooLarge {
                actual: usize::try_from(length).unwrap_or(usize::MAX),
                limit: self.max_response_bytes,
            });
        }
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| GatewayError::Transport(format!("failed to read response body: {err}")))?
        {
            let next_len = body.len().checked_add(chunk.len()).ok_or(
                GatewayError::ResponseTooLarge {
                    actual: usize::MAX,
                    limit: self.max_response_bytes,
                },
            )?;
            if next_len > self.max_response_bytes {
                return Err(GatewayError::ResponseTooLarge {
                    actual: next_len,
                    limit: self.max_response_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// In-band failure detail carried by service response bodies.
#[derive(Debug, Deserialize)]
struct ServiceFault {
    /// Human-readable failure message.
    message: String,
}

/// Decodes a 2xx body, failing closed on empty or undecodable content.
fn decode_body<Resp: DeserializeOwned>(bytes: &[u8]) -> Result<Resp, GatewayError> {
    if bytes.is_empty() {
        return Err(GatewayError::Protocol("empty response body".to_string()));
    }
    serde_json::from_slice(bytes)
        .map_err(|err| GatewayError::Protocol(format!("undecodable response body: {err}")))
}

/// Extracts the service message from a structured failure body.
fn in_band_message(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ServiceFault>(bytes).ok().map(|fault| fault.message)
}

/// Produces a bounded UTF-8 preview of response bodies for error reporting.
fn body_preview(bytes: &[u8]) -> String {
    let preview_len = bytes.len().min(MAX_ERROR_BODY_BYTES);
    let preview = String::from_utf8_lossy(&bytes[.. preview_len]);
    if bytes.len() > preview_len {
        let remaining = bytes.len() - preview_len;
        format!("{preview}...[truncated {remaining} bytes]")
    } else {
        preview.to_string()
    }
}
