//! MCP (Model Context Protocol) server.
//!
//! Exposes the workflow tools and the document templates to an MCP client
//! over JSON-RPC 2.0 on stdio.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  stdin   ┌──────────────────────────────────┐
//! │  MCP client  │ ───────▶ │           CyclesServer           │
//! │ (AI editor)  │ ◀─────── │  • tools/list, tools/call        │
//! └──────────────┘  stdout  │  • resources/list, resources/read│
//!                           └────────────────┬─────────────────┘
//!                                            │
//!                  ┌─────────────────────────┼──────────────────┐
//!                  ▼                         ▼                  ▼
//!            DocumentStore            workflow engine      CommandRunner
//!            (markdown files)    (records, groups, progress)  (git, gh)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cycles_mcp::core::ServerConfig;
//! use cycles_mcp::mcp::CyclesServer;
//!
//! let server = CyclesServer::new(ServerConfig::load()?);
//! server.serve(std::io::stdin().lock(), std::io::stdout())?;
//! ```

mod protocol;
mod resources;
mod server;
mod tools;

pub use protocol::{
    error_codes, CallToolParams, CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListResourcesResult, ListToolsResult, MCPInitializeResult, MCPResource, MCPServerCapabilities,
    MCPServerInfo, MCPTool, ReadResourceParams, ReadResourceResult, RequestId, ResourceContents,
    ToolContent, PROTOCOL_VERSION,
};
pub use resources::{list_resources, read_resource, resource_uri};
pub use server::{CyclesServer, SERVER_NAME};
pub use tools::{format_tool, tool_definitions};
