//! MCP tool handlers for the Godot bridge

use godot_mcp_core::{error_codes, validate_path, GodotMcpError, Result};
use serde::{Deserialize, Serialize};

use crate::bridge::EngineBridge;
use crate::mcp::{RequestId, Response};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Tool definition for MCP tools/list
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Get list of available tools
pub fn list_tools() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "launch_editor".into(),
            description: "Launch Godot editor for a specific project".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "scene": {
                        "type": "string",
                        "description": "Optional: Specific scene to open in the editor"
                    }
                },
                "required": ["projectPath"]
            }),
        },
        ToolDef {
            name: "run_project".into(),
            description: "Run the Godot project and capture output".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "scene": {
                        "type": "string",
                        "description": "Optional: Specific scene to run"
                    }
                },
                "required": ["projectPath"]
            }),
        },
        ToolDef {
            name: "get_debug_output".into(),
            description: "Get the current debug output and errors".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        ToolDef {
            name: "stop_project".into(),
            description: "Stop the currently running Godot project".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        ToolDef {
            name: "get_godot_version".into(),
            description: "Get the installed Godot version".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        ToolDef {
            name: "list_projects".into(),
            description: "List Godot projects in a directory".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Directory to search for Godot projects"
                    },
                    "recursive": {
                        "type": "boolean",
                        "description": "Whether to search recursively (default: false)"
                    }
                },
                "required": ["directory"]
            }),
        },
        ToolDef {
            name: "get_project_info".into(),
            description: "Retrieve metadata about a Godot project".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    }
                },
                "required": ["projectPath"]
            }),
        },
        ToolDef {
            name: "create_scene".into(),
            description: "Create a new Godot scene file".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "scenePath": {
                        "type": "string",
                        "description": "Path where the scene file will be saved (relative to project)"
                    },
                    "rootNodeType": {
                        "type": "string",
                        "description": "Type of the root node (e.g., Node2D, Node3D)",
                        "default": "Node2D"
                    }
                },
                "required": ["projectPath", "scenePath"]
            }),
        },
        ToolDef {
            name: "add_node".into(),
            description: "Add a node to an existing scene".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "scenePath": {
                        "type": "string",
                        "description": "Path to the scene file (relative to project)"
                    },
                    "parentNodePath": {
                        "type": "string",
                        "description": "Path to the parent node (e.g., \"root\" or \"root/Player\")",
                        "default": "root"
                    },
                    "nodeType": {
                        "type": "string",
                        "description": "Type of node to add (e.g., Sprite2D, CollisionShape2D)"
                    },
                    "nodeName": {
                        "type": "string",
                        "description": "Name for the new node"
                    },
                    "properties": {
                        "type": "object",
                        "description": "Optional properties to set on the node"
                    }
                },
                "required": ["projectPath", "scenePath", "nodeType", "nodeName"]
            }),
        },
        ToolDef {
            name: "load_sprite".into(),
            description: "Load a texture into a Sprite2D, Sprite3D or TextureRect node".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "scenePath": {
                        "type": "string",
                        "description": "Path to the scene file (relative to project)"
                    },
                    "nodePath": {
                        "type": "string",
                        "description": "Path to the sprite node (e.g., \"root/Player/Sprite2D\")"
                    },
                    "texturePath": {
                        "type": "string",
                        "description": "Path to the texture file (relative to project)"
                    }
                },
                "required": ["projectPath", "scenePath", "nodePath", "texturePath"]
            }),
        },
        ToolDef {
            name: "export_mesh_library".into(),
            description: "Export a scene as a MeshLibrary resource".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "scenePath": {
                        "type": "string",
                        "description": "Path to the scene file (.tscn) to export"
                    },
                    "outputPath": {
                        "type": "string",
                        "description": "Path where the mesh library (.res) will be saved"
                    },
                    "meshItemNames": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional: Names of specific mesh items to include (defaults to all)"
                    }
                },
                "required": ["projectPath", "scenePath", "outputPath"]
            }),
        },
        ToolDef {
            name: "save_scene".into(),
            description: "Save changes to a scene file".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "scenePath": {
                        "type": "string",
                        "description": "Path to the scene file (relative to project)"
                    },
                    "newPath": {
                        "type": "string",
                        "description": "Optional: New path to save the scene to (for creating variants)"
                    }
                },
                "required": ["projectPath", "scenePath"]
            }),
        },
        ToolDef {
            name: "get_uid".into(),
            description: "Get the UID for a specific file in a Godot project (for Godot 4.4+)".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    },
                    "filePath": {
                        "type": "string",
                        "description": "Path to the file (relative to project) for which to get the UID"
                    }
                },
                "required": ["projectPath", "filePath"]
            }),
        },
        ToolDef {
            name: "update_project_uids".into(),
            description: "Update UID references in a Godot project by resaving resources (for Godot 4.4+)".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "projectPath": {
                        "type": "string",
                        "description": "Path to the Godot project directory"
                    }
                },
                "required": ["projectPath"]
            }),
        },
    ]
}

/// Parameters for launch_editor and run_project
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProjectParams {
    pub project_path: String,
    pub scene: Option<String>,
}

/// Parameters for tools taking only a project path
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPathParams {
    pub project_path: String,
}

/// Parameters for list_projects
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    pub directory: String,
    #[serde(default)]
    pub recursive: bool,
}

/// Parameters for create_scene
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSceneParams {
    pub project_path: String,
    pub scene_path: String,
    #[serde(default = "default_root_node_type")]
    pub root_node_type: String,
}

fn default_root_node_type() -> String {
    "Node2D".to_string()
}

/// Parameters for add_node
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNodeParams {
    pub project_path: String,
    pub scene_path: String,
    pub node_type: String,
    pub node_name: String,
    #[serde(default = "default_parent_node_path")]
    pub parent_node_path: String,
    #[serde(default)]
    pub properties: serde_json::Value,
}

fn default_parent_node_path() -> String {
    "root".to_string()
}

/// Parameters for load_sprite
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSpriteParams {
    pub project_path: String,
    pub scene_path: String,
    pub node_path: String,
    pub texture_path: String,
}

/// Parameters for export_mesh_library
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeshLibraryParams {
    pub project_path: String,
    pub scene_path: String,
    pub output_path: String,
    pub mesh_item_names: Option<Vec<String>>,
}

/// Parameters for save_scene
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSceneParams {
    pub project_path: String,
    pub scene_path: String,
    pub new_path: Option<String>,
}

/// Parameters for get_uid
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUidParams {
    pub project_path: String,
    pub file_path: String,
}

fn parse_params<T: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| GodotMcpError::Validation(format!("invalid tool arguments: {e}")))
}

fn text_result(text: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "content": [{ "type": "text", "text": text.into() }] })
}

fn json_result<T: Serialize>(payload: &T) -> Result<serde_json::Value> {
    let text = serde_json::to_string_pretty(payload)?;
    Ok(text_result(text))
}

/// Handle a tools/call request
pub async fn handle_tool_call<B: EngineBridge>(
    name: &str,
    params: serde_json::Value,
    id: RequestId,
    bridge: &Arc<RwLock<B>>,
) -> Response {
    let result = match name {
        "launch_editor" => handle_launch_editor(params, bridge).await,
        "run_project" => handle_run_project(params, bridge).await,
        "get_debug_output" => handle_get_debug_output(bridge).await,
        "stop_project" => handle_stop_project(bridge).await,
        "get_godot_version" => handle_get_godot_version(bridge).await,
        "list_projects" => handle_list_projects(params, bridge).await,
        "get_project_info" => handle_get_project_info(params, bridge).await,
        "create_scene" => handle_create_scene(params, bridge).await,
        "add_node" => handle_add_node(params, bridge).await,
        "load_sprite" => handle_load_sprite(params, bridge).await,
        "export_mesh_library" => handle_export_mesh_library(params, bridge).await,
        "save_scene" => handle_save_scene(params, bridge).await,
        "get_uid" => handle_get_uid(params, bridge).await,
        "update_project_uids" => handle_update_project_uids(params, bridge).await,
        _ => Err(GodotMcpError::Protocol(format!("Unknown tool: {name}"))),
    };

    match result {
        Ok(value) => Response::success(id, value),
        Err(e) => {
            let code = match &e {
                GodotMcpError::Protocol(_) => error_codes::METHOD_NOT_FOUND,
                other => other.code(),
            };
            let suggestions = e.suggestions();
            if suggestions.is_empty() {
                Response::error(id, code, e.to_string())
            } else {
                Response::error_with_data(
                    id,
                    code,
                    e.to_string(),
                    serde_json::json!({ "possibleSolutions": suggestions }),
                )
            }
        }
    }
}

async fn handle_launch_editor<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: RunProjectParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    if let Some(scene) = &p.scene {
        validate_path("scene", scene)?;
    }

    let mut bridge = bridge.write().await;
    let message = bridge.launch_editor(&p.project_path, p.scene.as_deref()).await?;
    Ok(text_result(message))
}

async fn handle_run_project<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: RunProjectParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    if let Some(scene) = &p.scene {
        validate_path("scene", scene)?;
    }

    let mut bridge = bridge.write().await;
    let message = bridge.run_project(&p.project_path, p.scene.as_deref()).await?;
    Ok(text_result(message))
}

async fn handle_get_debug_output<B: EngineBridge>(
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let mut bridge = bridge.write().await;
    let snapshot = bridge.debug_output().await?;
    json_result(&snapshot)
}

async fn handle_stop_project<B: EngineBridge>(
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let mut bridge = bridge.write().await;
    let outcome = bridge.stop_project().await?;
    json_result(&outcome)
}

async fn handle_get_godot_version<B: EngineBridge>(
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let mut bridge = bridge.write().await;
    let version = bridge.engine_version().await?;
    Ok(text_result(version))
}

async fn handle_list_projects<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: ListProjectsParams = parse_params(params)?;
    validate_path("directory", &p.directory)?;

    let mut bridge = bridge.write().await;
    let projects = bridge.list_projects(&p.directory, p.recursive).await?;
    json_result(&projects)
}

async fn handle_get_project_info<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: ProjectPathParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;

    let mut bridge = bridge.write().await;
    let info = bridge.project_info(&p.project_path).await?;
    json_result(&info)
}

async fn handle_create_scene<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: CreateSceneParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    validate_path("scenePath", &p.scene_path)?;

    let mut bridge = bridge.write().await;
    let message = bridge
        .create_scene(&p.project_path, &p.scene_path, &p.root_node_type)
        .await?;
    Ok(text_result(message))
}

async fn handle_add_node<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: AddNodeParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    validate_path("scenePath", &p.scene_path)?;

    let mut bridge = bridge.write().await;
    let message = bridge
        .add_node(
            &p.project_path,
            &p.scene_path,
            &p.node_type,
            &p.node_name,
            &p.parent_node_path,
            p.properties,
        )
        .await?;
    Ok(text_result(message))
}

async fn handle_load_sprite<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: LoadSpriteParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    validate_path("scenePath", &p.scene_path)?;
    validate_path("texturePath", &p.texture_path)?;

    let mut bridge = bridge.write().await;
    let message = bridge
        .load_sprite(&p.project_path, &p.scene_path, &p.node_path, &p.texture_path)
        .await?;
    Ok(text_result(message))
}

async fn handle_export_mesh_library<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: ExportMeshLibraryParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    validate_path("scenePath", &p.scene_path)?;
    validate_path("outputPath", &p.output_path)?;

    let mut bridge = bridge.write().await;
    let message = bridge
        .export_mesh_library(
            &p.project_path,
            &p.scene_path,
            &p.output_path,
            p.mesh_item_names,
        )
        .await?;
    Ok(text_result(message))
}

async fn handle_save_scene<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: SaveSceneParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    validate_path("scenePath", &p.scene_path)?;
    if let Some(new_path) = &p.new_path {
        validate_path("newPath", new_path)?;
    }

    let mut bridge = bridge.write().await;
    let message = bridge
        .save_scene(&p.project_path, &p.scene_path, p.new_path.as_deref())
        .await?;
    Ok(text_result(message))
}

async fn handle_get_uid<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: GetUidParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;
    validate_path("filePath", &p.file_path)?;

    let mut bridge = bridge.write().await;
    let uid = bridge.get_uid(&p.project_path, &p.file_path).await?;
    Ok(text_result(uid))
}

async fn handle_update_project_uids<B: EngineBridge>(
    params: serde_json::Value,
    bridge: &Arc<RwLock<B>>,
) -> Result<serde_json::Value> {
    let p: ProjectPathParams = parse_params(params)?;
    validate_path("projectPath", &p.project_path)?;

    let mut bridge = bridge.write().await;
    let message = bridge.update_project_uids(&p.project_path).await?;
    Ok(text_result(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use godot_mcp_core::{DebugSnapshot, ProjectInfo, ProjectListing, SessionOutcome};

    /// Bridge double that records which operations were reached
    #[derive(Default)]
    struct RecordingBridge {
        calls: Vec<String>,
    }

    #[async_trait]
    impl EngineBridge for RecordingBridge {
        async fn launch_editor(&mut self, _: &str, _: Option<&str>) -> Result<String> {
            self.calls.push("launch_editor".into());
            Ok("editor launched".into())
        }

        async fn run_project(&mut self, project_path: &str, _: Option<&str>) -> Result<String> {
            self.calls.push(format!("run_project {project_path}"));
            Ok("Godot project started in debug mode. Use get_debug_output to see output.".into())
        }

        async fn debug_output(&mut self) -> Result<DebugSnapshot> {
            self.calls.push("debug_output".into());
            Err(GodotMcpError::NoActiveSession)
        }

        async fn stop_project(&mut self) -> Result<SessionOutcome> {
            self.calls.push("stop_project".into());
            Err(GodotMcpError::NoActiveSession)
        }

        async fn engine_version(&mut self) -> Result<String> {
            self.calls.push("engine_version".into());
            Ok("4.4.1.stable.official".into())
        }

        async fn list_projects(
            &mut self,
            directory: &str,
            _: bool,
        ) -> Result<Vec<ProjectListing>> {
            self.calls.push(format!("list_projects {directory}"));
            Ok(vec![])
        }

        async fn project_info(&mut self, _: &str) -> Result<ProjectInfo> {
            unimplemented!("not exercised")
        }

        async fn create_scene(&mut self, _: &str, scene: &str, root: &str) -> Result<String> {
            self.calls.push(format!("create_scene {scene} {root}"));
            Ok(format!("Scene '{scene}' created successfully"))
        }

        async fn add_node(
            &mut self,
            _: &str,
            _: &str,
            _: &str,
            _: &str,
            parent: &str,
            _: serde_json::Value,
        ) -> Result<String> {
            self.calls.push(format!("add_node parent={parent}"));
            Ok("node added".into())
        }

        async fn load_sprite(&mut self, _: &str, _: &str, _: &str, _: &str) -> Result<String> {
            self.calls.push("load_sprite".into());
            Ok("sprite loaded".into())
        }

        async fn export_mesh_library(
            &mut self,
            _: &str,
            _: &str,
            _: &str,
            _: Option<Vec<String>>,
        ) -> Result<String> {
            self.calls.push("export_mesh_library".into());
            Ok("exported".into())
        }

        async fn save_scene(&mut self, _: &str, _: &str, _: Option<&str>) -> Result<String> {
            self.calls.push("save_scene".into());
            Ok("saved".into())
        }

        async fn get_uid(&mut self, _: &str, _: &str) -> Result<String> {
            self.calls.push("get_uid".into());
            Ok("uid://abc123".into())
        }

        async fn update_project_uids(&mut self, _: &str) -> Result<String> {
            self.calls.push("update_project_uids".into());
            Ok("resaved".into())
        }

        async fn shutdown(&mut self) -> Result<()> {
            self.calls.push("shutdown".into());
            Ok(())
        }
    }

    fn bridge() -> Arc<RwLock<RecordingBridge>> {
        Arc::new(RwLock::new(RecordingBridge::default()))
    }

    #[test]
    fn test_tool_list_is_complete() {
        let tools = list_tools();
        assert_eq!(tools.len(), 14);
        assert!(tools.iter().any(|t| t.name == "export_mesh_library"));
        for tool in &tools {
            assert!(tool.input_schema["type"] == "object", "{}", tool.name);
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_method_not_found() {
        let bridge = bridge();
        let response = handle_tool_call(
            "make_coffee",
            serde_json::json!({}),
            RequestId::Number(1),
            &bridge,
        )
        .await;
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_rejected_before_bridge_runs() {
        let bridge = bridge();
        let response = handle_tool_call(
            "run_project",
            serde_json::json!({ "projectPath": "../secret" }),
            RequestId::Number(2),
            &bridge,
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::VALIDATION);
        assert!(bridge.read().await.calls.is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let bridge = bridge();
        let response = handle_tool_call(
            "create_scene",
            serde_json::json!({ "projectPath": "/tmp/game" }),
            RequestId::Number(3),
            &bridge,
        )
        .await;
        assert_eq!(response.error.unwrap().code, error_codes::VALIDATION);
    }

    #[tokio::test]
    async fn test_no_active_session_maps_to_code_and_solutions() {
        let bridge = bridge();
        let response = handle_tool_call(
            "get_debug_output",
            serde_json::json!({}),
            RequestId::Number(4),
            &bridge,
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::NO_ACTIVE_SESSION);
        let data = error.data.unwrap();
        assert!(data["possibleSolutions"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s.as_str().unwrap().contains("run_project")));
    }

    #[tokio::test]
    async fn test_run_project_returns_text_content() {
        let bridge = bridge();
        let response = handle_tool_call(
            "run_project",
            serde_json::json!({ "projectPath": "/projects/game" }),
            RequestId::Number(5),
            &bridge,
        )
        .await;

        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("get_debug_output"));
        assert_eq!(bridge.read().await.calls, vec!["run_project /projects/game"]);
    }

    #[tokio::test]
    async fn test_add_node_applies_default_parent() {
        let bridge = bridge();
        let response = handle_tool_call(
            "add_node",
            serde_json::json!({
                "projectPath": "/projects/game",
                "scenePath": "main.tscn",
                "nodeType": "Sprite2D",
                "nodeName": "Player"
            }),
            RequestId::Number(6),
            &bridge,
        )
        .await;

        assert!(response.error.is_none());
        assert_eq!(bridge.read().await.calls, vec!["add_node parent=root"]);
    }
}
