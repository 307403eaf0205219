//! MCP server over stdio.
//!
//! One JSON-RPC message per line on the input, one response per line on the
//! output. Requests are handled to completion one at a time.

use std::io::{BufRead, Write};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::protocol::{
    error_codes, CallToolParams, CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListResourcesResult, ListToolsResult, MCPInitializeResult, MCPServerCapabilities,
    MCPServerInfo, ReadResourceParams, ReadResourceResult, RequestId, PROTOCOL_VERSION,
};
use super::resources::{list_resources, read_resource};
use super::tools::tool_definitions;
use crate::core::{CommandRunner, ServerConfig, SystemRunner};
use crate::tools::{call_tool, ToolContext};
use crate::workflow::{DocumentStore, FsStore};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "cycles-mcp";

/// The workflow server: tool and resource handlers behind JSON-RPC.
pub struct CyclesServer {
    config: ServerConfig,
    store: Box<dyn DocumentStore>,
    runner: Box<dyn CommandRunner>,
}

impl CyclesServer {
    /// Server backed by the filesystem and real `git`/`gh` processes.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_backends(config, Box::new(FsStore::new()), Box::new(SystemRunner::new()))
    }

    pub fn with_backends(
        config: ServerConfig,
        store: Box<dyn DocumentStore>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self { config, store, runner }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the tool `name` directly, bypassing JSON-RPC.
    pub fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let ctx = ToolContext {
            store: self.store.as_ref(),
            runner: self.runner.as_ref(),
            config: &self.config,
        };
        let output = call_tool(&ctx, name, arguments);
        CallToolResult::text(output.text, output.is_error)
    }

    /// Serve requests from `input` until it is exhausted.
    pub fn serve<R: BufRead, W: Write>(&self, input: R, mut output: W) -> std::io::Result<()> {
        tracing::info!(server = SERVER_NAME, version = env!("CARGO_PKG_VERSION"), "Serving on stdio");

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line) {
                let encoded = serde_json::to_string(&response)?;
                tracing::debug!(response = %encoded, "Sending response");
                writeln!(output, "{encoded}")?;
                output.flush()?;
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        tracing::debug!(request = %line, "Received message");

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error(e)));
            }
        };

        let id = value.get("id").cloned().and_then(|id| serde_json::from_value::<RequestId>(id).ok());
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(&request),
            Err(e) => Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(error_codes::INVALID_REQUEST, format!("Invalid request: {e}")),
            )),
        }
    }

    /// Dispatch a request to its handler.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let params = request.params.as_ref();
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => to_value(&ListToolsResult { tools: tool_definitions() }),
            "tools/call" => self.tools_call(params),
            "resources/list" => to_value(&ListResourcesResult { resources: list_resources() }),
            "resources/read" => self.resources_read(params),
            method => Err(JsonRpcError::method_not_found(method)),
        };

        let id = request.id.clone();
        Some(match result {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                tracing::debug!(method = %request.method, %error, "Request failed");
                JsonRpcResponse::failure(id, error)
            }
        })
    }

    fn initialize(&self) -> Value {
        let result = MCPInitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: MCPServerCapabilities {
                tools: Some(json!({})),
                resources: Some(json!({})),
            },
            server_info: MCPServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
        };
        serde_json::to_value(result).unwrap_or_default()
    }

    fn tools_call(&self, params: Option<&Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;
        tracing::info!(tool = %params.name, "Tool call");
        to_value(&self.call_tool(&params.name, params.arguments.unwrap_or(Value::Null)))
    }

    fn resources_read(&self, params: Option<&Value>) -> Result<Value, JsonRpcError> {
        let params: ReadResourceParams = parse_params(params)?;
        let contents = read_resource(&params.uri)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown resource: {}", params.uri)))?;
        to_value(&ReadResourceResult { contents: vec![contents] })
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<&Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params.clone())
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {e}")))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::new(error_codes::INTERNAL_ERROR, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> CyclesServer {
        CyclesServer::new(ServerConfig::default())
    }

    fn request(line: &str) -> Value {
        let response = server().handle_line(line).unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_initialize() {
        let response = request(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#);
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "cycles-mcp");
        assert!(response["result"]["capabilities"]["tools"].is_object());
        assert!(response["result"]["capabilities"]["resources"].is_object());
    }

    #[test]
    fn test_notifications_get_no_response() {
        assert!(server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(request("{not json")["error"]["code"], -32700);
        assert_eq!(request(r#"{"jsonrpc":"2.0","id":2,"method":"nope"}"#)["error"]["code"], -32601);
        assert_eq!(
            request(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call"}"#)["error"]["code"],
            -32602
        );
        assert_eq!(
            request(
                r#"{"jsonrpc":"2.0","id":4,"method":"resources/read","params":{"uri":"template://x"}}"#
            )["error"]["code"],
            -32602
        );
        assert_eq!(request(r#"{"jsonrpc":"2.0","id":5}"#)["error"]["code"], -32600);
    }

    #[test]
    fn test_unknown_tool_is_error_result() {
        let response = request(
            r#"{"jsonrpc":"2.0","id":"x","method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
        );
        assert_eq!(response["id"], "x");
        assert_eq!(response["result"]["isError"], true);
        assert_eq!(response["result"]["content"][0]["text"], "❌ Unknown tool: nope");
    }

    #[test]
    fn test_serve_skips_blank_lines() {
        let input = "\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\n";
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n");
    }
}
