//! Error types for the Godot MCP bridge

use thiserror::Error;

/// Result type for Godot MCP operations
pub type Result<T> = std::result::Result<T, GodotMcpError>;

/// Godot MCP error types
#[derive(Debug, Error)]
pub enum GodotMcpError {
    /// Engine executable missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or traversal-unsafe argument
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// Missing project, scene, or resource file
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation requires a running session that does not exist
    #[error("No active Godot process. Use run_project first.")]
    NoActiveSession,

    /// Bounded one-shot invocation exceeded its limit
    #[error("Godot operation '{0}' timed out")]
    Timeout(String),

    /// Failure detected in the engine's captured output
    #[error("Godot reported an error: {0}")]
    EngineReported(String),

    /// Operation gated on a newer engine version
    #[error("UIDs require Godot 4.4+ (current version: {0})")]
    UnsupportedVersion(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Protocol error (unknown tool, bad request shape)
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl From<serde_json::Error> for GodotMcpError {
    fn from(err: serde_json::Error) -> Self {
        GodotMcpError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GodotMcpError {
    fn from(err: std::io::Error) -> Self {
        GodotMcpError::Io(err.to_string())
    }
}

impl GodotMcpError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            GodotMcpError::Configuration(_) => error_codes::CONFIGURATION,
            GodotMcpError::Validation(_) => error_codes::VALIDATION,
            GodotMcpError::NotFound(_) => error_codes::NOT_FOUND,
            GodotMcpError::NoActiveSession => error_codes::NO_ACTIVE_SESSION,
            GodotMcpError::Timeout(_) => error_codes::TIMEOUT,
            GodotMcpError::EngineReported(_) => error_codes::ENGINE_REPORTED,
            GodotMcpError::UnsupportedVersion(_) => error_codes::UNSUPPORTED_VERSION,
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    /// Suggested remedies surfaced alongside the error message
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            GodotMcpError::Configuration(_) => vec![
                "Ensure Godot is installed correctly",
                "Set the GODOT_PATH environment variable to the Godot executable",
            ],
            GodotMcpError::Validation(_) => vec![
                "Provide a valid path without \"..\" or other unsafe segments",
            ],
            GodotMcpError::NotFound(_) => vec![
                "Ensure the path points to a directory containing a project.godot file",
                "Use list_projects to find valid Godot projects",
            ],
            GodotMcpError::NoActiveSession => vec![
                "Use run_project to start a Godot project first",
                "The process may have already terminated",
            ],
            GodotMcpError::Timeout(_) => vec![
                "Check that the project opens cleanly in the Godot editor",
                "Retry the operation on a smaller scene",
            ],
            GodotMcpError::UnsupportedVersion(_) => vec![
                "Upgrade to Godot 4.4 or later to use UID operations",
            ],
            _ => Vec::new(),
        }
    }
}

/// JSON-RPC error codes for the Godot MCP protocol
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub const CONFIGURATION: i32 = -32000;
    pub const VALIDATION: i32 = -32001;
    pub const NOT_FOUND: i32 = -32002;
    pub const NO_ACTIVE_SESSION: i32 = -32003;
    pub const TIMEOUT: i32 = -32004;
    pub const ENGINE_REPORTED: i32 = -32005;
    pub const UNSUPPORTED_VERSION: i32 = -32006;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GodotMcpError::NoActiveSession.code(),
            error_codes::NO_ACTIVE_SESSION
        );
        assert_eq!(
            GodotMcpError::Timeout("create_scene".into()).code(),
            error_codes::TIMEOUT
        );
        assert_eq!(
            GodotMcpError::Serialization("bad json".into()).code(),
            error_codes::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_timeout_names_operation() {
        let err = GodotMcpError::Timeout("export_mesh_library".into());
        assert!(err.to_string().contains("export_mesh_library"));
    }

    #[test]
    fn test_configuration_suggestions_mention_godot_path() {
        let err = GodotMcpError::Configuration("no executable".into());
        assert!(err.suggestions().iter().any(|s| s.contains("GODOT_PATH")));
    }
}
