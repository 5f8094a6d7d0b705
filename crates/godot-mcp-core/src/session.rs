//! Wire types for the single active engine session

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot returned by get_debug_output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugSnapshot {
    /// Accumulated stdout lines, in arrival order
    pub output: Vec<String>,
    /// Accumulated stderr lines, in arrival order
    pub errors: Vec<String>,
    /// True when the process has exited and this is the final snapshot
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub terminated: bool,
}

/// Final output reported by stop_project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub message: String,
    pub final_output: Vec<String>,
    pub final_errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminated_flag_omitted_while_running() {
        let snap = DebugSnapshot {
            output: vec!["line".into()],
            errors: vec![],
            terminated: false,
        };
        let value = serde_json::to_value(&snap).unwrap();
        assert!(value.get("terminated").is_none());

        let done = DebugSnapshot {
            terminated: true,
            ..snap
        };
        let value = serde_json::to_value(&done).unwrap();
        assert_eq!(value["terminated"], true);
    }

    #[test]
    fn test_outcome_wire_shape() {
        let outcome = SessionOutcome {
            message: "Godot project stopped".into(),
            final_output: vec!["ready".into()],
            final_errors: vec![],
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["finalOutput"][0], "ready");
        assert!(value["finalErrors"].as_array().unwrap().is_empty());
    }
}
