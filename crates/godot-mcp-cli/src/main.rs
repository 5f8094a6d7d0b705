//! Godot MCP Server
//!
//! Exposes Godot editor and project operations as MCP tools over stdio.
//! Configuration comes from the environment: `GODOT_PATH`,
//! `GODOT_OPERATIONS_SCRIPT`, `GODOT_MCP_STRICT_PATHS`, and `DEBUG=true`
//! for verbose logging.

use anyhow::Result;
use godot_bridge::{BridgeConfig, GodotBridge};
use godot_mcp_server::GodotMcpServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol; all logging goes to stderr
    let default_level = if env_flag("DEBUG") { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Godot MCP server starting...");

    let config = BridgeConfig::from_env();
    let mut bridge = GodotBridge::new(config);
    bridge.initialize().await?;

    let server = GodotMcpServer::new(bridge);
    server.run_stdio().await?;

    info!("Godot MCP server stopped");
    Ok(())
}
