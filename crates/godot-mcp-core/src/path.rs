//! Path-safety validation for tool arguments

use crate::error::{GodotMcpError, Result};
use std::path::{Component, Path};

/// Reject empty paths and parent-directory traversal segments.
///
/// Runs before any filesystem or process interaction, for every tool
/// argument that names a path.
pub fn validate_path(label: &str, raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(GodotMcpError::Validation(format!("{label} is required")));
    }

    let has_traversal = Path::new(raw)
        .components()
        .any(|c| matches!(c, Component::ParentDir));
    if has_traversal {
        return Err(GodotMcpError::Validation(format!(
            "{label} must not contain \"..\" segments: {raw}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_normal_paths() {
        assert!(validate_path("projectPath", "/home/dev/game").is_ok());
        assert!(validate_path("scenePath", "scenes/main.tscn").is_ok());
        assert!(validate_path("scenePath", "./scenes/main.tscn").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(validate_path("projectPath", "").is_err());
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(validate_path("filePath", "../secret").is_err());
        assert!(validate_path("filePath", "assets/../../secret").is_err());
        assert!(validate_path("filePath", "..").is_err());
    }

    #[test]
    fn test_dots_inside_names_are_fine() {
        assert!(validate_path("scenePath", "scenes/level..final.tscn").is_ok());
        assert!(validate_path("texturePath", "a..b/texture.png").is_ok());
    }
}
