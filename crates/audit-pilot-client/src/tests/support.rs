// audit-pilot-client/src/tests/support.rs
// ============================================================================
// Module: Client Test Support Helpers
// Description: Shared helpers for HTTP test servers and gateway fixtures.
// Purpose: Provide reusable fixtures for client unit tests without external
//          services.
// Dependencies: hyper, tokio, http-body-util, serde_json
// ============================================================================

use std::convert::Infallible;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Context;
use std::task::Poll;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::Full;
use http_body_util::combinators::BoxBody;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Body;
use hyper::body::Frame;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use audit_pilot_core::RepoRef;

use crate::gateway::AuditGateway;
use crate::gateway::GatewayConfig;
use crate::telemetry::GatewayCall;
use crate::telemetry::GatewayMetricEvent;
use crate::telemetry::GatewayMetrics;

/// Captured HTTP request data for assertions.
#[derive(Clone, Debug)]
pub struct CapturedRequest {
    /// Request path with query.
    pub uri: String,
    /// Request headers.
    pub headers: hyper::HeaderMap,
    /// Raw request body bytes.
    pub body: Bytes,
}

impl CapturedRequest {
    /// Parses the captured body as JSON.
    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("captured body is json")
    }
}

/// Test response wrapper.
#[derive(Clone, Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: hyper::HeaderMap,
    /// Response body bytes.
    pub body: Bytes,
    /// Whether to omit the Content-Length header.
    pub omit_content_length: bool,
}

impl TestResponse {
    /// Builds a 200 JSON response with Content-Type set.
    pub fn json(value: &Value) -> Self {
        Self::json_with_status(StatusCode::OK, value)
    }

    /// Builds a JSON response with an explicit status.
    pub fn json_with_status(status: StatusCode, value: &Value) -> Self {
        let body = serde_json::to_vec(value).expect("serialize json response");
        let mut headers = hyper::HeaderMap::new();
        headers.insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        Self {
            status,
            headers,
            body: Bytes::from(body),
            omit_content_length: false,
        }
    }

    /// Builds a raw response with custom status and headers.
    pub fn raw(status: StatusCode, headers: hyper::HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            omit_content_length: false,
        }
    }

    /// Builds a response without Content-Length.
    pub fn raw_without_length(status: StatusCode, headers: hyper::HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            omit_content_length: true,
        }
    }
}

/// One-shot body with no exact size hint, forcing chunked transfer encoding
/// so no Content-Length header is ever announced.
struct UnsizedBody(Option<Bytes>);

impl Body for UnsizedBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().0.take().map(|bytes| Ok(Frame::data(bytes))))
    }
}

impl From<TestResponse> for Response<BoxBody<Bytes, Infallible>> {
    fn from(value: TestResponse) -> Self {
        let announced_len = value.body.len();
        let body = if value.omit_content_length {
            BodyExt::boxed(UnsizedBody(Some(value.body)))
        } else {
            BodyExt::boxed(Full::new(value.body))
        };
        let mut response = Response::new(body);
        *response.status_mut() = value.status;
        *response.headers_mut() = value.headers;
        if !value.omit_content_length
            && !response.headers().contains_key(hyper::header::CONTENT_LENGTH)
        {
            let _ = response.headers_mut().insert(
                hyper::header::CONTENT_LENGTH,
                hyper::header::HeaderValue::from_str(&announced_len.to_string())
                    .expect("content-length header value"),
            );
        }
        response
    }
}

type Responder = Arc<Mutex<Box<dyn FnMut(CapturedRequest) -> TestResponse + Send>>>;

/// Lightweight HTTP test server with request capture.
pub struct TestHttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestHttpServer {
    /// Starts the server with a responder callback.
    pub async fn start<F>(responder: F) -> Self
    where
        F: FnMut(CapturedRequest) -> TestResponse + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responder: Responder = Arc::new(Mutex::new(Box::new(responder)));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let requests_task = Arc::clone(&requests);
        let responder_task = Arc::clone(&responder);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    accept = listener.accept() => {
                        let Ok((stream, _)) = accept else { continue };
                        let requests = Arc::clone(&requests_task);
                        let responder = Arc::clone(&responder_task);
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);
                            let service = service_fn(move |req: Request<Incoming>| {
                                let requests = Arc::clone(&requests);
                                let responder = Arc::clone(&responder);
                                async move {
                                    let (parts, body) = req.into_parts();
                                    let bytes = body.collect().await?.to_bytes();
                                    let captured = CapturedRequest {
                                        uri: parts.uri.to_string(),
                                        headers: parts.headers,
                                        body: bytes,
                                    };
                                    let response = responder.lock().await.as_mut()(captured.clone());
                                    requests.lock().await.push(captured);
                                    let response: Response<BoxBody<Bytes, Infallible>> =
                                        response.into();
                                    Ok::<_, hyper::Error>(response)
                                }
                            });
                            let _ = http1::Builder::new().serve_connection(io, service).await;
                        });
                    }
                }
            }
        });

        Self {
            addr,
            requests,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// Returns the base URL for the server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns a snapshot of captured requests.
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }

    /// Shuts down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}

/// Metrics sink that records every event for assertions.
#[derive(Default)]
pub struct RecordingMetrics {
    events: std::sync::Mutex<Vec<GatewayMetricEvent>>,
    latencies: std::sync::Mutex<Vec<(GatewayCall, u64)>>,
}

impl RecordingMetrics {
    /// Returns a snapshot of recorded request events.
    pub fn events(&self) -> Vec<GatewayMetricEvent> {
        self.events.lock().expect("events lock").clone()
    }

    /// Returns a snapshot of recorded operation latencies.
    pub fn latencies(&self) -> Vec<(GatewayCall, u64)> {
        self.latencies.lock().expect("latencies lock").clone()
    }
}

impl GatewayMetrics for RecordingMetrics {
    fn record_request(&self, event: &GatewayMetricEvent) {
        self.events.lock().expect("events lock").push(*event);
    }

    fn record_latency(&self, call: GatewayCall, elapsed_ms: u64) {
        self.latencies.lock().expect("latencies lock").push((call, elapsed_ms));
    }
}

/// Builds a gateway pointed at a test server with tight test limits.
pub fn test_gateway(endpoint: &str) -> AuditGateway {
    test_gateway_with_limit(endpoint, 64 * 1024)
}

/// Builds a gateway with an explicit response size limit.
pub fn test_gateway_with_limit(endpoint: &str, max_response_bytes: usize) -> AuditGateway {
    AuditGateway::new(GatewayConfig {
        endpoint: endpoint.to_string(),
        request_timeout: Duration::from_secs(5),
        max_response_bytes,
        user_agent: "audit-pilot-tests/0".to_string(),
    })
    .expect("build test gateway")
}

/// Parses the fixture repository reference.
pub fn vault_repo() -> RepoRef {
    RepoRef::parse("https://github.com/acme/vault").expect("parse fixture repo")
}

/// Repository metadata JSON as the hosting provider serializes it.
pub fn vault_repo_json() -> Value {
    serde_json::json!({
        "id": 7,
        "name": "vault",
        "full_name": "acme/vault",
        "description": "Token vault program",
        "html_url": "https://github.com/acme/vault",
        "stargazers_count": 42,
        "forks_count": 3,
        "open_issues_count": 1,
        "owner": { "login": "acme", "avatar_url": "https://avatars.example/acme.png" },
        "language": "Rust",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-06-01T00:00:00Z"
    })
}
