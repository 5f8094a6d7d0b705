//! # godot-bridge
//!
//! Bridge between the MCP server and a local Godot installation.
//!
//! Implements the `EngineBridge` trait by shelling out to the Godot
//! executable: one-shot headless invocations through the operations
//! script, a single managed debug session, and filesystem discovery.

pub mod config;
pub mod invoke;
pub mod locate;
pub mod outcome;
pub mod scan;
pub mod session;

pub use config::BridgeConfig;

use async_trait::async_trait;
use godot_mcp_core::{
    to_snake_case_params, DebugSnapshot, GodotMcpError, GodotVersion, ProjectInfo, ProjectListing,
    Result, SessionOutcome, StructureReport, PROJECT_MARKER,
};
use godot_mcp_server::EngineBridge;
use invoke::CapturedOutput;
use locate::Locator;
use outcome::{classify_outcome, Outcome, DEFAULT_STDERR_MARKERS};
use serde_json::json;
use session::{SessionConfig, SessionManager};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

/// Concrete bridge to a Godot installation
pub struct GodotBridge {
    config: BridgeConfig,
    godot_path: Option<PathBuf>,
    locator: Locator,
    session: SessionManager,
}

impl GodotBridge {
    pub fn new(config: BridgeConfig) -> Self {
        let locator = Locator::new(config.version_timeout);
        let session = SessionManager::new(SessionConfig {
            startup_grace: config.startup_grace,
            stop_grace: config.stop_grace,
        });
        Self {
            config,
            godot_path: None,
            locator,
            session,
        }
    }

    /// Resolve the executable up front. Under strict path validation a
    /// failed detection is fatal; otherwise a platform default is used
    /// as a last resort.
    pub async fn initialize(&mut self) -> Result<()> {
        match self.locator.detect(self.config.godot_path.as_deref()).await {
            Some(path) => {
                self.godot_path = Some(path);
                Ok(())
            }
            None if self.config.strict_path_validation => Err(GodotMcpError::Configuration(
                "Could not find a valid Godot executable path".into(),
            )),
            None => {
                let fallback = locate::fallback_path();
                warn!(
                    "Falling back to default Godot path {}, tools may fail",
                    fallback.display()
                );
                self.godot_path = Some(fallback);
                Ok(())
            }
        }
    }

    /// Resolved executable path, attempting on-demand detection
    async fn ensure_godot(&mut self) -> Result<PathBuf> {
        if let Some(path) = &self.godot_path {
            return Ok(path.clone());
        }
        match self.locator.detect(self.config.godot_path.as_deref()).await {
            Some(path) => {
                self.godot_path = Some(path.clone());
                Ok(path)
            }
            None => Err(GodotMcpError::Configuration(
                "Could not find a valid Godot executable path".into(),
            )),
        }
    }

    /// Absolute project directory, verified to carry the marker file
    fn require_project(&self, project_path: &str) -> Result<PathBuf> {
        let dir = Path::new(project_path).canonicalize().map_err(|_| {
            GodotMcpError::NotFound(format!(
                "Not a valid Godot project ({PROJECT_MARKER} not found): {project_path}"
            ))
        })?;
        if !dir.join(PROJECT_MARKER).is_file() {
            return Err(GodotMcpError::NotFound(format!(
                "Not a valid Godot project ({PROJECT_MARKER} not found): {project_path}"
            )));
        }
        Ok(dir)
    }

    fn require_in_project(&self, project: &Path, relative: &str, what: &str) -> Result<()> {
        if !project.join(relative).exists() {
            return Err(GodotMcpError::NotFound(format!(
                "{what} does not exist: {relative}"
            )));
        }
        Ok(())
    }

    /// Run one operation through the operations script. Wire-style
    /// camelCase params are translated to the script's snake_case here.
    async fn operation(
        &mut self,
        project: &Path,
        operation: &str,
        params: serde_json::Value,
    ) -> Result<CapturedOutput> {
        let godot = self.ensure_godot().await?;
        let params = to_snake_case_params(&params);
        invoke::run_operation(
            &godot,
            project,
            &self.config.operations_script,
            operation,
            &params,
            self.config.engine_debug,
            self.config.invoke_timeout,
        )
        .await
    }

    async fn version_string(&mut self) -> Result<String> {
        let godot = self.ensure_godot().await?;
        let mut command = Command::new(&godot);
        command.arg("--version");
        let captured =
            invoke::capture(command, "get_godot_version", self.config.version_timeout).await?;
        if !captured.success() {
            return Err(GodotMcpError::EngineReported(format!(
                "Failed to get Godot version: {}",
                captured.stderr.trim()
            )));
        }
        Ok(captured.stdout.trim().to_string())
    }

    /// Version gate for UID operations; runs before any script invocation
    async fn require_uid_support(&mut self) -> Result<()> {
        let version_str = self.version_string().await?;
        let version: GodotVersion = version_str.parse()?;
        if !version.supports_uids() {
            return Err(GodotMcpError::UnsupportedVersion(version_str));
        }
        Ok(())
    }
}

fn check(captured: &CapturedOutput, context: &str, stdout_markers: &[&str]) -> Result<()> {
    match classify_outcome(captured, DEFAULT_STDERR_MARKERS, stdout_markers) {
        Outcome::Success => Ok(()),
        Outcome::EngineError(detail) => Err(GodotMcpError::EngineReported(format!(
            "{context}. {detail}"
        ))),
    }
}

fn with_extension(path: &str, extensions: &[&str], default: &str) -> String {
    let lower = path.to_lowercase();
    if extensions.iter().any(|ext| lower.ends_with(ext)) {
        path.to_string()
    } else {
        format!("{path}{default}")
    }
}

#[async_trait]
impl EngineBridge for GodotBridge {
    async fn launch_editor(&mut self, project_path: &str, scene: Option<&str>) -> Result<String> {
        let project = self.require_project(project_path)?;
        let godot = self.ensure_godot().await?;

        let mut command = Command::new(&godot);
        command.arg("-e").arg("--path").arg(&project);
        if let Some(scene) = scene {
            command.arg(scene);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Fire and forget; the editor outlives this request
        command
            .spawn()
            .map_err(|e| GodotMcpError::Configuration(format!("Failed to launch editor: {e}")))?;

        info!("Godot editor launched for {}", project.display());
        Ok(format!(
            "Godot editor launch initiated for project at {}.",
            project.display()
        ))
    }

    async fn run_project(&mut self, project_path: &str, scene: Option<&str>) -> Result<String> {
        let project = self.require_project(project_path)?;
        let godot = self.ensure_godot().await?;

        let mut command = Command::new(&godot);
        command.arg("-d").arg("--path").arg(&project);
        if let Some(scene) = scene {
            command.arg(scene);
        }

        self.session.start(command).await?;
        info!("Godot project started: {}", project.display());
        Ok("Godot project started in debug mode. Use get_debug_output to see output.".to_string())
    }

    async fn debug_output(&mut self) -> Result<DebugSnapshot> {
        self.session.poll().await
    }

    async fn stop_project(&mut self) -> Result<SessionOutcome> {
        self.session.stop().await
    }

    async fn engine_version(&mut self) -> Result<String> {
        self.version_string().await
    }

    async fn list_projects(
        &mut self,
        directory: &str,
        recursive: bool,
    ) -> Result<Vec<ProjectListing>> {
        scan::find_projects(Path::new(directory), recursive)
    }

    async fn project_info(&mut self, project_path: &str) -> Result<ProjectInfo> {
        let project = self.require_project(project_path)?;

        // Version and structure failures degrade to inline messages; the
        // call reports whatever it could gather
        let godot_version = match self.version_string().await {
            Ok(version) => version,
            Err(e) => format!("Error getting version: {e}"),
        };
        let structure = match scan::project_structure(&project) {
            Ok(counts) => StructureReport::Counts(counts),
            Err(e) => StructureReport::Failed {
                error: e.to_string(),
            },
        };
        let name = scan::read_project_name(&project);

        Ok(ProjectInfo {
            name,
            path: project.display().to_string(),
            godot_version,
            structure,
        })
    }

    async fn create_scene(
        &mut self,
        project_path: &str,
        scene_path: &str,
        root_node_type: &str,
    ) -> Result<String> {
        let project = self.require_project(project_path)?;
        let scene_path = with_extension(scene_path, &[".tscn"], ".tscn");

        let captured = self
            .operation(
                &project,
                "create_scene",
                json!({
                    "scenePath": scene_path,
                    "rootNodeType": root_node_type,
                }),
            )
            .await?;
        check(
            &captured,
            &format!("Failed to create scene '{scene_path}'"),
            &["Cannot create file"],
        )?;

        Ok(format!(
            "Scene '{}' created successfully (Root: {}). Godot output: {}",
            scene_path,
            root_node_type,
            captured.stdout.trim()
        ))
    }

    async fn add_node(
        &mut self,
        project_path: &str,
        scene_path: &str,
        node_type: &str,
        node_name: &str,
        parent_node_path: &str,
        properties: serde_json::Value,
    ) -> Result<String> {
        let project = self.require_project(project_path)?;
        self.require_in_project(&project, scene_path, "Scene file")?;

        let properties = if properties.is_null() {
            json!({})
        } else {
            properties
        };
        let captured = self
            .operation(
                &project,
                "add_node",
                json!({
                    "scenePath": scene_path,
                    "parentNodePath": parent_node_path,
                    "nodeType": node_type,
                    "nodeName": node_name,
                    "properties": properties,
                }),
            )
            .await?;
        check(
            &captured,
            &format!("Failed to add node '{node_name}'"),
            &["Failed to add node"],
        )?;

        Ok(format!(
            "Node '{}' ({}) added successfully to '{}' under '{}'. Godot output: {}",
            node_name,
            node_type,
            scene_path,
            parent_node_path,
            captured.stdout.trim()
        ))
    }

    async fn load_sprite(
        &mut self,
        project_path: &str,
        scene_path: &str,
        node_path: &str,
        texture_path: &str,
    ) -> Result<String> {
        let project = self.require_project(project_path)?;
        self.require_in_project(&project, scene_path, "Scene file")?;
        self.require_in_project(&project, texture_path, "Texture file")?;

        let captured = self
            .operation(
                &project,
                "load_sprite",
                json!({
                    "scenePath": scene_path,
                    "nodePath": node_path,
                    "texturePath": texture_path,
                }),
            )
            .await?;
        check(
            &captured,
            &format!("Failed to load sprite for node '{node_path}'"),
            &["Failed to load texture", "Node not found"],
        )?;

        Ok(format!(
            "Texture '{}' loaded successfully into node '{}' in scene '{}'. Godot output: {}",
            texture_path,
            node_path,
            scene_path,
            captured.stdout.trim()
        ))
    }

    async fn export_mesh_library(
        &mut self,
        project_path: &str,
        scene_path: &str,
        output_path: &str,
        mesh_item_names: Option<Vec<String>>,
    ) -> Result<String> {
        let project = self.require_project(project_path)?;
        self.require_in_project(&project, scene_path, "Scene file")?;
        let output_path = with_extension(output_path, &[".res", ".tres"], ".res");

        let mut params = json!({
            "scenePath": scene_path,
            "outputPath": output_path,
        });
        if let Some(names) = mesh_item_names {
            params["meshItemNames"] = json!(names);
        }

        let captured = self
            .operation(&project, "export_mesh_library", params)
            .await?;
        check(
            &captured,
            &format!("Failed to export MeshLibrary to '{output_path}'"),
            &["Failed to export", "No meshes found"],
        )?;

        Ok(format!(
            "MeshLibrary exported successfully from '{}' to '{}'. Godot output: {}",
            scene_path,
            output_path,
            captured.stdout.trim()
        ))
    }

    async fn save_scene(
        &mut self,
        project_path: &str,
        scene_path: &str,
        new_path: Option<&str>,
    ) -> Result<String> {
        let project = self.require_project(project_path)?;
        self.require_in_project(&project, scene_path, "Scene file")?;
        let new_path = new_path.map(|p| with_extension(p, &[".tscn"], ".tscn"));

        let mut params = json!({ "scenePath": scene_path });
        if let Some(new_path) = &new_path {
            params["newPath"] = json!(new_path);
        }

        let captured = self.operation(&project, "save_scene", params).await?;
        check(
            &captured,
            &format!("Failed to save scene '{scene_path}'"),
            &["Failed to save scene", "Cannot create file"],
        )?;

        let target = new_path.as_deref().unwrap_or(scene_path);
        Ok(format!(
            "Scene saved successfully to '{}'. Godot output: {}",
            target,
            captured.stdout.trim()
        ))
    }

    async fn get_uid(&mut self, project_path: &str, file_path: &str) -> Result<String> {
        let project = self.require_project(project_path)?;
        self.require_in_project(&project, file_path, "File")?;
        self.require_uid_support().await?;

        let captured = self
            .operation(&project, "get_uid", json!({ "filePath": file_path }))
            .await?;
        check(
            &captured,
            &format!("Failed to get UID for '{file_path}'"),
            &["Failed to get UID", "not found"],
        )?;

        let uid = captured.stdout.trim().to_string();
        if !uid.starts_with("uid://") {
            return Err(GodotMcpError::EngineReported(format!(
                "Command did not return a valid UID. Output: {uid}"
            )));
        }
        Ok(uid)
    }

    async fn update_project_uids(&mut self, project_path: &str) -> Result<String> {
        let project = self.require_project(project_path)?;
        self.require_uid_support().await?;

        let captured = self
            .operation(&project, "resave_resources", json!({}))
            .await?;
        // Resaving is noisy; only clear failure markers count
        match classify_outcome(
            &captured,
            &["failed to save resource"],
            &["Failed to resave resources"],
        ) {
            Outcome::Success => Ok(format!(
                "Project UIDs update process completed. Godot output:\n{}",
                captured.stdout.trim()
            )),
            Outcome::EngineError(detail) => Err(GodotMcpError::EngineReported(format!(
                "Failed to update project UIDs. {detail}"
            ))),
        }
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.session.shutdown().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_extension_fixups() {
        assert_eq!(with_extension("main", &[".tscn"], ".tscn"), "main.tscn");
        assert_eq!(
            with_extension("Main.TSCN", &[".tscn"], ".tscn"),
            "Main.TSCN"
        );
        assert_eq!(
            with_extension("lib", &[".res", ".tres"], ".res"),
            "lib.res"
        );
        assert_eq!(
            with_extension("lib.tres", &[".res", ".tres"], ".res"),
            "lib.tres"
        );
    }

    #[cfg(unix)]
    mod with_fake_engine {
        use super::super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        fn fake_godot(dir: &Path, version: &str) -> PathBuf {
            let path = dir.join("godot");
            std::fs::write(
                &path,
                format!("#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo {version}; fi\nexit 0\n"),
            )
            .unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        fn bridge_with(godot: PathBuf) -> GodotBridge {
            GodotBridge::new(BridgeConfig {
                godot_path: Some(godot),
                ..BridgeConfig::default()
            })
        }

        fn make_project(dir: &Path) {
            std::fs::write(dir.join(PROJECT_MARKER), "[application]\n").unwrap();
        }

        #[tokio::test]
        async fn test_engine_version_trims_output() {
            let dir = tempfile::tempdir().unwrap();
            let godot = fake_godot(dir.path(), "4.4.1.stable.official.49a5bc7b6");
            let mut bridge = bridge_with(godot);

            let version = bridge.engine_version().await.unwrap();
            assert_eq!(version, "4.4.1.stable.official.49a5bc7b6");
        }

        #[tokio::test]
        async fn test_uid_gate_rejects_old_engine_before_invoking() {
            let dir = tempfile::tempdir().unwrap();
            let godot = fake_godot(dir.path(), "4.2.0.stable.official");
            make_project(dir.path());
            std::fs::write(dir.path().join("thing.tres"), "").unwrap();
            let mut bridge = bridge_with(godot);

            let err = bridge
                .get_uid(&dir.path().display().to_string(), "thing.tres")
                .await
                .unwrap_err();
            assert!(matches!(err, GodotMcpError::UnsupportedVersion(_)));

            let err = bridge
                .update_project_uids(&dir.path().display().to_string())
                .await
                .unwrap_err();
            assert!(matches!(err, GodotMcpError::UnsupportedVersion(_)));
        }

        #[tokio::test]
        async fn test_missing_project_marker() {
            let dir = tempfile::tempdir().unwrap();
            let godot = fake_godot(dir.path(), "4.4.0.stable");
            let mut bridge = bridge_with(godot);

            let err = bridge
                .run_project(&dir.path().display().to_string(), None)
                .await
                .unwrap_err();
            assert!(matches!(err, GodotMcpError::NotFound(_)));
        }

        #[tokio::test]
        async fn test_project_info_reads_name_and_structure() {
            let dir = tempfile::tempdir().unwrap();
            let godot = fake_godot(dir.path(), "4.4.0.stable");
            std::fs::write(
                dir.path().join(PROJECT_MARKER),
                "[application]\n\nconfig/name=\"Demo\"\n",
            )
            .unwrap();
            std::fs::write(dir.path().join("main.tscn"), "").unwrap();
            let mut bridge = bridge_with(godot);

            let info = bridge
                .project_info(&dir.path().display().to_string())
                .await
                .unwrap();
            assert_eq!(info.name, "Demo");
            assert_eq!(info.godot_version, "4.4.0.stable");
            match info.structure {
                StructureReport::Counts(counts) => assert_eq!(counts.scenes, 1),
                other => panic!("unexpected structure report: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_project_info_degrades_unreadable_structure_inline() {
            // Permission bits do not bind root
            if unsafe { libc::geteuid() } == 0 {
                return;
            }

            let dir = tempfile::tempdir().unwrap();
            let godot = fake_godot(dir.path(), "4.4.0.stable");
            make_project(dir.path());
            let sealed = dir.path().join("sealed");
            std::fs::create_dir(&sealed).unwrap();
            let mut perms = std::fs::metadata(&sealed).unwrap().permissions();
            perms.set_mode(0o000);
            std::fs::set_permissions(&sealed, perms.clone()).unwrap();

            let mut bridge = bridge_with(godot);
            let info = bridge
                .project_info(&dir.path().display().to_string())
                .await
                .unwrap();
            assert!(matches!(info.structure, StructureReport::Failed { .. }));

            perms.set_mode(0o755);
            std::fs::set_permissions(&sealed, perms).unwrap();
        }

        #[tokio::test]
        async fn test_strict_validation_fails_initialize() {
            let dir = tempfile::tempdir().unwrap();
            let mut bridge = GodotBridge::new(BridgeConfig {
                godot_path: Some(dir.path().join("missing-godot")),
                strict_path_validation: true,
                ..BridgeConfig::default()
            });

            // The override is invalid and the candidate scan finds nothing
            // in a sandboxed test environment only if godot is absent; the
            // override failure alone must not mask strictness
            match bridge.initialize().await {
                Err(GodotMcpError::Configuration(_)) => {}
                Ok(()) => {
                    // A real godot on PATH was picked up; acceptable
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }
}
