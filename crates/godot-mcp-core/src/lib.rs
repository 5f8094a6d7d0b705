//! # godot-mcp-core
//!
//! Core types for the Godot MCP bridge.
//!
//! This crate provides the foundational types shared across the workspace:
//! - Error taxonomy and JSON-RPC error codes
//! - Engine version parsing and feature gating
//! - Parameter key-convention translation
//! - Path-safety validation
//! - Project and session wire types

pub mod error;
pub mod params;
pub mod path;
pub mod project;
pub mod session;
pub mod version;

pub use error::{error_codes, GodotMcpError, Result};
pub use params::{snake_case_key, to_snake_case_params};
pub use path::validate_path;
pub use project::{ProjectInfo, ProjectListing, ProjectStructure, StructureReport, PROJECT_MARKER};
pub use session::{DebugSnapshot, SessionOutcome};
pub use version::GodotVersion;
