//! Filesystem discovery: project listing, structure counting, name
//! extraction. Pure functions over a directory tree.

use godot_mcp_core::{GodotMcpError, ProjectListing, ProjectStructure, Result, PROJECT_MARKER};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SCRIPT_EXTENSIONS: &[&str] = &["gd", "gdscript", "cs"];
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "svg", "ttf", "wav", "mp3", "ogg", "glb", "gltf", "obj", "tres",
    "res",
];

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_project_dir(dir: &Path) -> bool {
    dir.join(PROJECT_MARKER).is_file()
}

fn listing_for(dir: &Path) -> ProjectListing {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    ProjectListing {
        path: dir.display().to_string(),
        name,
    }
}

/// Find project directories under `directory`.
///
/// Non-recursive: the root itself when it is a project, otherwise its
/// immediate subdirectories. Recursive: every marker file at or below
/// the root, skipping hidden directories, deduplicated by canonical
/// path. Symlinked directories are never followed, so link cycles
/// cannot recurse.
pub fn find_projects(directory: &Path, recursive: bool) -> Result<Vec<ProjectListing>> {
    if !directory.exists() {
        return Err(GodotMcpError::NotFound(format!(
            "Directory does not exist: {}",
            directory.display()
        )));
    }
    if !directory.is_dir() {
        return Err(GodotMcpError::Validation(format!(
            "Path is not a directory: {}",
            directory.display()
        )));
    }

    let root = directory
        .canonicalize()
        .map_err(|e| GodotMcpError::Io(format!("{}: {e}", directory.display())))?;

    let mut projects = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |dir: &Path| {
        let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        if seen.insert(canonical) {
            debug!("Found project at: {}", dir.display());
            projects.push(listing_for(dir));
        }
    };

    if is_project_dir(&root) {
        push(&root);
        if !recursive {
            return Ok(projects);
        }
    }

    if recursive {
        walk_for_projects(&root, &mut push)?;
    } else {
        for entry in fs::read_dir(&root).map_err(|e| GodotMcpError::Io(e.to_string()))? {
            let entry = entry.map_err(|e| GodotMcpError::Io(e.to_string()))?;
            let path = entry.path();
            if path.is_dir()
                && !path.is_symlink()
                && !is_hidden(&entry.file_name())
                && is_project_dir(&path)
            {
                push(&path);
            }
        }
    }

    Ok(projects)
}

fn walk_for_projects(dir: &Path, push: &mut impl FnMut(&Path)) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| GodotMcpError::Io(e.to_string()))? {
        let entry = entry.map_err(|e| GodotMcpError::Io(e.to_string()))?;
        let path = entry.path();
        if !path.is_dir() || path.is_symlink() || is_hidden(&entry.file_name()) {
            continue;
        }
        if is_project_dir(&path) {
            push(&path);
        }
        walk_for_projects(&path, push)?;
    }
    Ok(())
}

/// Count project files into coarse buckets, skipping hidden entries and
/// Godot's generated `.import` metadata.
pub fn project_structure(project_path: &Path) -> Result<ProjectStructure> {
    let mut structure = ProjectStructure::default();
    count_files(project_path, &mut structure)?;
    Ok(structure)
}

fn count_files(dir: &Path, structure: &mut ProjectStructure) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| GodotMcpError::Io(e.to_string()))? {
        let entry = entry.map_err(|e| GodotMcpError::Io(e.to_string()))?;
        let name = entry.file_name();
        if is_hidden(&name) {
            continue;
        }

        let path = entry.path();
        // Links are aliases, not content; following them double-counts
        // and can cycle
        if path.is_symlink() {
            continue;
        }
        if path.is_dir() {
            count_files(&path, structure)?;
            continue;
        }

        let name = name.to_string_lossy();
        if name == PROJECT_MARKER || name.ends_with(".import") {
            continue;
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if ext == "tscn" {
            structure.scenes += 1;
        } else if SCRIPT_EXTENSIONS.contains(&ext.as_str()) {
            structure.scripts += 1;
        } else if ASSET_EXTENSIONS.contains(&ext.as_str()) {
            structure.assets += 1;
        } else {
            structure.other += 1;
        }
    }
    Ok(())
}

/// Project name from the marker file's `config/name=` line, falling back
/// to the directory name.
pub fn read_project_name(project_path: &Path) -> String {
    let fallback = || {
        project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| project_path.display().to_string())
    };

    let Ok(contents) = fs::read_to_string(project_path.join(PROJECT_MARKER)) else {
        return fallback();
    };

    for line in contents.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("config/name=") {
            let value = value.trim();
            let name = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }

    fallback()
}
