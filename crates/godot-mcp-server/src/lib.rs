//! # godot-mcp-server
//!
//! MCP server implementation for the Godot bridge.
//!
//! This crate provides:
//! - `EngineBridge` trait for wiring an engine installation
//! - MCP JSON-RPC protocol handling
//! - Tool definitions and dispatch
//! - stdio transport

pub mod bridge;
pub mod mcp;
pub mod tools;
pub mod transport;

pub use bridge::EngineBridge;

use godot_mcp_core::Result;
use mcp::ServerInfo;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Godot MCP server
pub struct GodotMcpServer<B: EngineBridge> {
    /// Engine bridge implementation
    pub(crate) bridge: Arc<RwLock<B>>,
    /// Identity reported during initialize
    pub(crate) info: ServerInfo,
}

impl<B: EngineBridge> GodotMcpServer<B> {
    /// Create a new server with the given bridge
    pub fn new(bridge: B) -> Self {
        Self {
            bridge: Arc::new(RwLock::new(bridge)),
            info: ServerInfo {
                name: "godot-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Run the server on stdio transport
    pub async fn run_stdio(self) -> Result<()> {
        transport::stdio::run(self).await
    }
}
