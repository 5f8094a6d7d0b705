//! Project metadata types

use serde::{Deserialize, Serialize};

/// File name that marks a directory as a Godot project
pub const PROJECT_MARKER: &str = "project.godot";

/// A discovered project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectListing {
    /// Absolute path to the project directory
    pub path: String,
    /// Directory name
    pub name: String,
}

/// Coarse file counts for a project tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStructure {
    pub scenes: u32,
    pub scripts: u32,
    pub assets: u32,
    pub other: u32,
}

/// Structure counts, or the error that prevented the scan.
///
/// Scan failures ride inline so one unreadable subtree does not fail the
/// whole metadata call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureReport {
    Counts(ProjectStructure),
    Failed { error: String },
}

/// Metadata returned by get_project_info
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Name from project.godot, or the directory name
    pub name: String,
    /// Absolute project path
    pub path: String,
    /// Raw `godot --version` output, or an inline error string
    pub godot_version: String,
    pub structure: StructureReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_info_wire_shape() {
        let info = ProjectInfo {
            name: "My Game".into(),
            path: "/projects/my-game".into(),
            godot_version: "4.4.1.stable.official".into(),
            structure: StructureReport::Counts(ProjectStructure {
                scenes: 3,
                scripts: 7,
                assets: 12,
                other: 1,
            }),
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["godotVersion"], "4.4.1.stable.official");
        assert_eq!(value["structure"]["scenes"], 3);
    }

    #[test]
    fn test_failed_structure_carries_inline_error() {
        let report = StructureReport::Failed {
            error: "I/O error: permission denied".into(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["error"], "I/O error: permission denied");
        assert!(value.get("scenes").is_none());
    }
}
