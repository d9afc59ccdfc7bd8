// ABOUTME: MCP client helpers driving the in-process router over POST /mcp
// ABOUTME: Handles the session header, Accept negotiation, and SSE response parsing

#![allow(dead_code)]

use super::axum_test::{AxumTestRequest, AxumTestResponse};
use axum::Router;
use calculator_mcp_server::{
    config::environment::ServerConfig, mcp::resources::ServerResources, routes::build_router,
    tools::CalculatorRegistry,
};
use serde_json::{json, Value};
use std::sync::{Arc, Once};

pub const MCP_PATH: &str = "/mcp";
pub const SESSION_HEADER: &str = "mcp-session-id";
pub const EVENT_STREAM: &str = "text/event-stream";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Defaults with rate limiting off so unrelated tests never share a bucket
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.rate_limit.enabled = false;
    config
}

/// Resources over the calculator registry
pub fn test_resources(config: ServerConfig) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(config, Arc::new(CalculatorRegistry)))
}

/// Full router with the middleware chain
pub fn test_router(resources: &Arc<ServerResources>) -> Router {
    build_router(Arc::clone(resources))
}

/// One parsed SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub event: Option<String>,
    pub id: Option<String>,
    pub data: String,
}

/// Split an SSE body into events
pub fn parse_sse(text: &str) -> Vec<ParsedEvent> {
    text.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let mut event = None;
            let mut id = None;
            let mut data = Vec::new();
            for line in block.lines() {
                if let Some(value) = line.strip_prefix("event: ") {
                    event = Some(value.to_owned());
                } else if let Some(value) = line.strip_prefix("id: ") {
                    id = Some(value.to_owned());
                } else if let Some(value) = line.strip_prefix("data: ") {
                    data.push(value);
                }
            }
            ParsedEvent {
                event,
                id,
                data: data.join("\n"),
            }
        })
        .collect()
}

/// The JSON-RPC envelope carried by a single-event SSE response
pub fn single_envelope(response: &AxumTestResponse) -> Value {
    let events = parse_sse(&response.text());
    assert_eq!(events.len(), 1, "expected exactly one SSE event: {events:?}");
    assert_eq!(events[0].event.as_deref(), Some("message"));
    serde_json::from_str(&events[0].data).expect("SSE data is not JSON")
}

/// POST builder with the headers every MCP client sends
pub fn mcp_post(session_id: Option<&str>, body: &Value) -> AxumTestRequest {
    let request = AxumTestRequest::post(MCP_PATH)
        .header("accept", "application/json, text/event-stream")
        .json(body);
    match session_id {
        Some(id) => request.header(SESSION_HEADER, id),
        None => request,
    }
}

/// Client that remembers the session minted by `initialize`
pub struct McpTestClient {
    router: Router,
    session_id: Option<String>,
    next_id: i64,
}

impl McpTestClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            session_id: None,
            next_id: 1,
        }
    }

    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().expect("client is not initialized")
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run `initialize` and keep the session id
    pub async fn initialize(&mut self) -> Value {
        let response = mcp_post(
            None,
            &json!({
                "jsonrpc": "2.0",
                "id": 0,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "1.0.0"}
                }
            }),
        )
        .send(self.router())
        .await;
        assert_eq!(response.status(), 200, "initialize failed: {}", response.text());

        self.session_id = Some(
            response
                .header(SESSION_HEADER)
                .expect("initialize response lacks a session header")
                .to_owned(),
        );
        single_envelope(&response)
    }

    /// Send one request envelope on the session and return the raw response
    pub async fn send(&self, body: &Value) -> AxumTestResponse {
        mcp_post(self.session_id.as_deref(), body)
            .send(self.router())
            .await
    }

    /// Call `method` and return the response envelope
    pub async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        let response = self
            .send(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await;
        assert_eq!(response.status(), 200, "{method} failed: {}", response.text());
        let envelope = single_envelope(&response);
        assert_eq!(envelope["id"], id);
        envelope
    }

    /// Call a tool and return the `tools/call` result
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        let envelope = self
            .request("tools/call", json!({"name": name, "arguments": arguments}))
            .await;
        envelope["result"].clone()
    }
}
