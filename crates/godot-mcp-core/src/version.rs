//! Godot version parsing and feature gating

use crate::error::{GodotMcpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parsed Godot engine version.
///
/// `godot --version` prints strings like `4.4.1.stable.official.49a5bc7b6`;
/// only the leading numeric components matter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GodotVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GodotVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Resource UIDs were introduced in Godot 4.4.
    pub fn supports_uids(&self) -> bool {
        *self >= GodotVersion::new(4, 4, 0)
    }
}

impl fmt::Display for GodotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for GodotVersion {
    type Err = GodotMcpError;

    fn from_str(s: &str) -> Result<Self> {
        let mut numbers = s.trim().split('.').map_while(|p| p.parse::<u32>().ok());

        let major = numbers
            .next()
            .ok_or_else(|| GodotMcpError::Validation(format!("unparseable Godot version: {s}")))?;
        let minor = numbers.next().unwrap_or(0);
        let patch = numbers.next().unwrap_or(0);

        Ok(GodotVersion::new(major, minor, patch))
    }
}
