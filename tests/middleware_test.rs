// ABOUTME: Integration tests for the middleware chain in front of /mcp
// ABOUTME: Rate limiting, validation, security headers, CORS, request ids, deadlines, and panic recovery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use async_trait::async_trait;
use calculator_mcp_server::{
    config::environment::{Environment, ServerConfig},
    errors::ToolError,
    mcp::resources::ServerResources,
    protocol::{InputSchema, ToolDescriptor},
    routes::build_router,
    tools::ToolRegistry,
};
use helpers::axum_test::AxumTestRequest;
use helpers::mcp_client::{
    init_test_logging, mcp_post, single_envelope, test_config, test_resources, test_router,
    McpTestClient, MCP_PATH, SESSION_HEADER,
};
use serde_json::{json, Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

fn peer(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, last_octet], 40_000))
}

fn initialize_body() -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})
}

// ============================================================================
// Rate limiting
// ============================================================================

fn rate_limited_config(limit: u32, window_seconds: u64) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_window = limit;
    config.rate_limit.window_seconds = window_seconds;
    config
}

#[tokio::test]
async fn test_concurrent_burst_admits_exactly_the_limit() {
    let resources = test_resources(rate_limited_config(100, 60));
    let router = test_router(&resources);
    let session = initialized_session(&router).await;
    let sessions_before = resources.sessions.len().await;

    let tasks: Vec<_> = (0..150)
        .map(|i| {
            let router = router.clone();
            let session = session.clone();
            tokio::spawn(async move {
                let body = json!({
                    "jsonrpc": "2.0",
                    "id": i,
                    "method": "tools/call",
                    "params": {"name": "add", "arguments": {"a": i, "b": 1}}
                });
                let response = mcp_post(Some(&session), &body)
                    .from_peer(peer(1))
                    .send(router)
                    .await;
                (i, response)
            })
        })
        .collect();

    let mut ok = 0;
    let mut limited = 0;
    for task in tasks {
        let (i, response) = task.await.unwrap();
        match response.status() {
            200 => {
                let envelope = single_envelope(&response);
                assert_eq!(envelope["id"], i);
                assert_eq!(envelope["result"]["isError"], false);
                assert_eq!(envelope["result"]["structuredContent"]["result"], i + 1);
                assert_eq!(response.header(SESSION_HEADER), Some(session.as_str()));
                ok += 1;
            }
            429 => limited += 1,
            other => panic!("unexpected status {other}: {}", response.text()),
        }
    }

    assert_eq!(ok, 100);
    assert_eq!(limited, 50);
    assert_eq!(resources.metrics.rate_limited_total(), 50);
    assert!(resources.sessions.contains(&session).await);
    assert_eq!(resources.sessions.len().await, sessions_before);
}

#[tokio::test]
async fn test_limits_are_per_address() {
    let router = test_router(&test_resources(rate_limited_config(2, 60)));

    for _ in 0..2 {
        let response = AxumTestRequest::get("/health")
            .from_peer(peer(1))
            .send(router.clone())
            .await;
        assert_eq!(response.status(), 200);
    }
    let blocked = AxumTestRequest::get("/health")
        .from_peer(peer(1))
        .send(router.clone())
        .await;
    assert_eq!(blocked.status(), 429);

    let other = AxumTestRequest::get("/health")
        .from_peer(peer(2))
        .send(router)
        .await;
    assert_eq!(other.status(), 200);
}

#[tokio::test]
async fn test_rate_limit_headers() {
    let router = test_router(&test_resources(rate_limited_config(1, 60)));

    let allowed = AxumTestRequest::get("/health")
        .from_peer(peer(3))
        .send(router.clone())
        .await;
    assert_eq!(allowed.header("x-ratelimit-limit"), Some("1"));
    assert_eq!(allowed.header("x-ratelimit-remaining"), Some("0"));
    assert_eq!(allowed.header("x-ratelimit-window"), Some("60"));
    assert!(allowed.header("retry-after").is_none());

    let rejected = AxumTestRequest::get("/health")
        .from_peer(peer(3))
        .send(router)
        .await;
    assert_eq!(rejected.status(), 429);
    let retry_after: u64 = rejected.header("retry-after").unwrap().parse().unwrap();
    assert!((1..=60).contains(&retry_after));
    let body: Value = rejected.json();
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_disabled_rate_limiting_adds_no_headers() {
    let router = test_router(&test_resources(test_config()));
    let response = AxumTestRequest::get("/health").send(router).await;
    assert!(response.header("x-ratelimit-limit").is_none());
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_post_without_json_content_type_is_unsupported() {
    let router = test_router(&test_resources(test_config()));
    let response = AxumTestRequest::post(MCP_PATH)
        .header("accept", "text/event-stream")
        .header("content-type", "text/plain")
        .raw_body(serde_json::to_vec(&initialize_body()).unwrap())
        .send(router)
        .await;

    assert_eq!(response.status(), 415);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn test_json_content_type_with_charset_is_accepted() {
    let router = test_router(&test_resources(test_config()));
    let response = AxumTestRequest::post(MCP_PATH)
        .header("accept", "text/event-stream")
        .header("content-type", "application/json; charset=utf-8")
        .raw_body(serde_json::to_vec(&initialize_body()).unwrap())
        .send(router)
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_declared_oversize_body_is_rejected_before_handler() {
    let mut config = test_config();
    config.http.max_body_bytes = 64;
    let resources = test_resources(config);
    let router = test_router(&resources);

    let response = AxumTestRequest::post(MCP_PATH)
        .header("accept", "text/event-stream")
        .header("content-type", "application/json")
        .header("content-length", "65")
        .raw_body(vec![b' '; 65])
        .send(router)
        .await;

    assert_eq!(response.status(), 413);
    assert!(resources.sessions.is_empty().await);
}

// ============================================================================
// Security headers, request ids, CORS
// ============================================================================

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let router = test_router(&test_resources(test_config()));

    for response in [
        AxumTestRequest::get("/health").send(router.clone()).await,
        AxumTestRequest::get("/missing").send(router.clone()).await,
        mcp_post(None, &initialize_body()).send(router).await,
    ] {
        assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(response.header("x-frame-options"), Some("DENY"));
        assert!(response.header("content-security-policy").is_some());
        assert!(response.header("strict-transport-security").is_none());
    }
}

#[tokio::test]
async fn test_production_adds_hsts() {
    let mut config = test_config();
    config.environment = Environment::Production;
    let router = test_router(&test_resources(config));

    let response = AxumTestRequest::get("/health").send(router).await;
    assert_eq!(
        response.header("strict-transport-security"),
        Some("max-age=31536000; includeSubDomains")
    );
}

#[tokio::test]
async fn test_request_id_generated_and_adopted() {
    let router = test_router(&test_resources(test_config()));

    let generated = AxumTestRequest::get("/health").send(router.clone()).await;
    let id = generated.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let adopted = AxumTestRequest::get("/health")
        .header("x-request-id", "client-trace-7")
        .send(router)
        .await;
    assert_eq!(adopted.header("x-request-id"), Some("client-trace-7"));
}

#[tokio::test]
async fn test_cors_preflight_exposes_session_header() {
    let router = test_router(&test_resources(test_config()));

    let preflight = AxumTestRequest::method(axum::http::Method::OPTIONS, MCP_PATH)
        .header("origin", "https://client.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type, mcp-session-id")
        .send(router.clone())
        .await;
    assert_eq!(preflight.status(), 200);
    assert_eq!(preflight.header("access-control-allow-origin"), Some("*"));
    let allowed = preflight.header("access-control-allow-headers").unwrap();
    assert!(allowed.contains("mcp-session-id"));

    let response = mcp_post(None, &initialize_body())
        .header("origin", "https://client.example")
        .send(router)
        .await;
    let exposed = response.header("access-control-expose-headers").unwrap();
    assert!(exposed.contains("mcp-session-id"));
}

// ============================================================================
// Deadline and panic recovery, driven through misbehaving tools
// ============================================================================

struct MisbehavingRegistry;

fn no_arguments_tool(name: &str) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_owned(),
        description: format!("{name} test tool"),
        input_schema: InputSchema::object(),
    }
}

#[async_trait]
impl ToolRegistry for MisbehavingRegistry {
    fn list_tools(&self) -> Vec<ToolDescriptor> {
        vec![no_arguments_tool("slow"), no_arguments_tool("explode")]
    }

    async fn invoke(&self, name: &str, _arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        match name {
            "slow" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(json!(0))
            }
            "explode" => panic!("registry invariant broken"),
            other => Err(ToolError::unknown_tool(other)),
        }
    }
}

fn misbehaving_router(request_timeout_secs: u64) -> axum::Router {
    init_test_logging();
    let mut config = test_config();
    config.http.request_timeout_secs = request_timeout_secs;
    let resources = Arc::new(ServerResources::new(config, Arc::new(MisbehavingRegistry)));
    build_router(resources)
}

async fn initialized_session(router: &axum::Router) -> String {
    let mut client = McpTestClient::new(router.clone());
    client.initialize().await;
    client.session_id().to_owned()
}

fn call(name: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {"name": name, "arguments": {}}})
}

#[tokio::test]
async fn test_slow_non_streaming_request_times_out() {
    let router = misbehaving_router(1);
    let session = initialized_session(&router).await;

    let response = AxumTestRequest::post(MCP_PATH)
        .header("accept", "*/*")
        .header("mcp-session-id", &session)
        .json(&call("slow"))
        .send(router)
        .await;

    assert_eq!(response.status(), 504);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "REQUEST_TIMEOUT");
}

#[tokio::test]
async fn test_event_stream_requests_are_exempt_from_deadline() {
    let router = misbehaving_router(1);
    let session = initialized_session(&router).await;

    let pending = tokio::time::timeout(
        Duration::from_secs(2),
        mcp_post(Some(&session), &call("slow")).send(router),
    )
    .await;

    assert!(pending.is_err(), "streaming request should not be cut off by the deadline");
}

#[tokio::test]
async fn test_handler_panic_becomes_generic_500() {
    let router = misbehaving_router(30);
    let session = initialized_session(&router).await;

    let response = mcp_post(Some(&session), &call("explode"))
        .send(router.clone())
        .await;

    assert_eq!(response.status(), 500);
    let body = response.text();
    assert!(body.contains("INTERNAL_ERROR"));
    assert!(!body.contains("registry invariant broken"));
    assert!(response.header("x-request-id").is_some());

    let health = AxumTestRequest::get("/health").send(router).await;
    assert_eq!(health.status(), 200);
}

#[tokio::test]
async fn test_panic_under_deadline_is_recovered() {
    let router = misbehaving_router(30);
    let session = initialized_session(&router).await;

    let response = AxumTestRequest::post(MCP_PATH)
        .header("accept", "*/*")
        .header("mcp-session-id", &session)
        .json(&call("explode"))
        .send(router)
        .await;
    assert_eq!(response.status(), 500);
}
