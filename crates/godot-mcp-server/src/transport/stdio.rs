//! stdio transport for MCP JSON-RPC

use crate::bridge::EngineBridge;
use crate::mcp::{
    InitializeParams, InitializeResult, Request, RequestId, Response, ServerCapabilities,
    ServerInfo, ToolsCapability,
};
use crate::tools::{handle_tool_call, list_tools};
use crate::GodotMcpServer;
use godot_mcp_core::{error_codes, GodotMcpError, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Run the MCP server on stdio
pub async fn run<B: EngineBridge>(server: GodotMcpServer<B>) -> Result<()> {
    let result = serve(&server).await;

    // Unconditional cleanup: stop any active engine session, whether the
    // loop ended at EOF or on a transport fault
    {
        let mut bridge = server.bridge.write().await;
        let _ = bridge.shutdown().await;
    }

    result
}

async fn serve<B: EngineBridge>(server: &GodotMcpServer<B>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    info!("Godot MCP server starting on stdio");

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| GodotMcpError::Io(format!("Failed to read stdin: {e}")))?;

        if bytes_read == 0 {
            // EOF - client disconnected
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => handle_request(&request, server).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                Response::error(
                    RequestId::Null,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid request: {e}"),
                )
            }
        };

        let response_json = serde_json::to_string(&response)
            .map_err(|e| GodotMcpError::Serialization(e.to_string()))?;

        debug!("Sending: {}", response_json);

        stdout
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| GodotMcpError::Io(format!("Failed to write stdout: {e}")))?;
        stdout
            .write_all(b"\n")
            .await
            .map_err(|e| GodotMcpError::Io(format!("Failed to write newline: {e}")))?;
        stdout
            .flush()
            .await
            .map_err(|e| GodotMcpError::Io(format!("Failed to flush stdout: {e}")))?;
    }

    Ok(())
}

async fn handle_request<B: EngineBridge>(
    request: &Request,
    server: &GodotMcpServer<B>,
) -> Response {
    match request.method.as_str() {
        "initialize" => handle_initialize(request, server),
        "initialized" | "notifications/initialized" => {
            // Notification, no response needed but we return success
            Response::success(request.id.clone(), serde_json::json!({}))
        }
        "tools/list" => handle_tools_list(request),
        "tools/call" => handle_tools_call(request, server).await,
        _ => Response::error(
            request.id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

fn handle_initialize<B: EngineBridge>(request: &Request, server: &GodotMcpServer<B>) -> Response {
    let _params: InitializeParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                request.id.clone(),
                error_codes::INVALID_PARAMS,
                format!("Invalid initialize params: {e}"),
            );
        }
    };

    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
            logging: serde_json::json!({}),
        },
        server_info: ServerInfo {
            name: server.info.name.clone(),
            version: server.info.version.clone(),
        },
    };

    match serde_json::to_value(result) {
        Ok(value) => Response::success(request.id.clone(), value),
        Err(e) => Response::error(
            request.id.clone(),
            error_codes::INTERNAL_ERROR,
            e.to_string(),
        ),
    }
}

fn handle_tools_list(request: &Request) -> Response {
    let tools = list_tools();
    Response::success(request.id.clone(), serde_json::json!({ "tools": tools }))
}

async fn handle_tools_call<B: EngineBridge>(
    request: &Request,
    server: &GodotMcpServer<B>,
) -> Response {
    #[derive(serde::Deserialize)]
    struct ToolCallParams {
        name: String,
        #[serde(default)]
        arguments: serde_json::Value,
    }

    let params: ToolCallParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                request.id.clone(),
                error_codes::INVALID_PARAMS,
                format!("Invalid tool call params: {e}"),
            );
        }
    };

    handle_tool_call(
        &params.name,
        params.arguments,
        request.id.clone(),
        &server.bridge,
    )
    .await
}
