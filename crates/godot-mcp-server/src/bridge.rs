//! Engine bridge trait

use async_trait::async_trait;
use godot_mcp_core::{DebugSnapshot, ProjectInfo, ProjectListing, Result, SessionOutcome};

/// Trait for exposing a game engine to the MCP tool surface.
///
/// Implement this trait to wire an engine installation behind the fixed
/// tool set. All string-returning operations yield a human-readable
/// success message.
#[async_trait]
pub trait EngineBridge: Send + Sync + 'static {
    /// Launch the engine editor for a project, fire-and-forget
    async fn launch_editor(&mut self, project_path: &str, scene: Option<&str>) -> Result<String>;

    /// Start the single active session running a project in debug mode
    async fn run_project(&mut self, project_path: &str, scene: Option<&str>) -> Result<String>;

    /// Poll the active session for accumulated output
    async fn debug_output(&mut self) -> Result<DebugSnapshot>;

    /// Stop the active session and return its final output
    async fn stop_project(&mut self) -> Result<SessionOutcome>;

    /// One-shot `--version` invocation
    async fn engine_version(&mut self) -> Result<String>;

    /// Scan a directory for project marker files
    async fn list_projects(&mut self, directory: &str, recursive: bool)
        -> Result<Vec<ProjectListing>>;

    /// Version, structure counts, and name for one project
    async fn project_info(&mut self, project_path: &str) -> Result<ProjectInfo>;

    /// Create a new scene file
    async fn create_scene(
        &mut self,
        project_path: &str,
        scene_path: &str,
        root_node_type: &str,
    ) -> Result<String>;

    /// Add a node to an existing scene
    async fn add_node(
        &mut self,
        project_path: &str,
        scene_path: &str,
        node_type: &str,
        node_name: &str,
        parent_node_path: &str,
        properties: serde_json::Value,
    ) -> Result<String>;

    /// Load a texture into a sprite node
    async fn load_sprite(
        &mut self,
        project_path: &str,
        scene_path: &str,
        node_path: &str,
        texture_path: &str,
    ) -> Result<String>;

    /// Export a scene as a MeshLibrary resource
    async fn export_mesh_library(
        &mut self,
        project_path: &str,
        scene_path: &str,
        output_path: &str,
        mesh_item_names: Option<Vec<String>>,
    ) -> Result<String>;

    /// Save a scene, optionally to a new path
    async fn save_scene(
        &mut self,
        project_path: &str,
        scene_path: &str,
        new_path: Option<&str>,
    ) -> Result<String>;

    /// Look up the UID of a project file (engine >= 4.4)
    async fn get_uid(&mut self, project_path: &str, file_path: &str) -> Result<String>;

    /// Resave resources to refresh UID references (engine >= 4.4)
    async fn update_project_uids(&mut self, project_path: &str) -> Result<String>;

    /// Called when the server shuts down; stops any active session
    async fn shutdown(&mut self) -> Result<()>;
}
