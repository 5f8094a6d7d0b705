//! One-shot engine invocations.
//!
//! Runs the engine once, non-interactively, waits for exit within a
//! bound, and returns whatever it printed. A non-zero exit is not a
//! failure here; interpretation belongs to the caller.

use godot_mcp_core::{GodotMcpError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Captured output of a completed invocation
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run one operation through the operations script.
///
/// `params` must already be in the script's snake_case convention.
pub async fn run_operation(
    godot: &Path,
    project_path: &Path,
    script: &Path,
    operation: &str,
    params: &serde_json::Value,
    engine_debug: bool,
    timeout: Duration,
) -> Result<CapturedOutput> {
    let params_json = serde_json::to_string(params)?;

    let mut command = Command::new(godot);
    command
        .arg("--headless")
        .arg("--path")
        .arg(project_path)
        .arg("--script")
        .arg(script)
        .arg(operation)
        .arg(&params_json);
    if engine_debug {
        command.arg("--debug-godot");
    }

    debug!(
        "Executing operation '{}' in project {}",
        operation,
        project_path.display()
    );
    capture(command, operation, timeout).await
}

/// Spawn a prepared command and capture its output within the bound.
///
/// The child is killed on timeout (`kill_on_drop`), never abandoned.
pub async fn capture(
    mut command: Command,
    operation: &str,
    timeout: Duration,
) -> Result<CapturedOutput> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command
        .spawn()
        .map_err(|e| GodotMcpError::Configuration(format!("Failed to launch Godot: {e}")))?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| GodotMcpError::Io(e.to_string()))?,
        Err(_) => return Err(GodotMcpError::Timeout(operation.to_string())),
    };

    let captured = CapturedOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
    };
    debug!(
        "Operation '{}' exited with {:?}: stdout {} bytes, stderr {} bytes",
        operation,
        captured.exit_code,
        captured.stdout.len(),
        captured.stderr.len()
    );
    Ok(captured)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[tokio::test]
    async fn test_capture_both_streams() {
        let captured = capture(
            sh("echo hello; echo world 1>&2"),
            "test_op",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(captured.stdout.trim(), "hello");
        assert_eq!(captured.stderr.trim(), "world");
        assert!(captured.success());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let captured = capture(
            sh("echo partial; exit 7"),
            "test_op",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(captured.stdout.trim(), "partial");
        assert_eq!(captured.exit_code, Some(7));
        assert!(!captured.success());
    }

    #[tokio::test]
    async fn test_timeout_names_operation_and_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("child.pid");

        let err = capture(
            sh(&format!("echo $$ > {}; exec sleep 30", pid_file.display())),
            "slow_op",
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();

        match err {
            GodotMcpError::Timeout(op) => assert_eq!(op, "slow_op"),
            other => panic!("unexpected error: {other}"),
        }

        // kill_on_drop reaps the child; give the signal a moment to land
        tokio::time::sleep(Duration::from_millis(300)).await;
        let pid: i32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let alive = unsafe { libc::kill(pid, 0) } == 0;
        assert!(!alive, "timed-out child still running");
    }

    #[tokio::test]
    async fn test_missing_executable_is_configuration_error() {
        let command = Command::new("/nonexistent/godot-binary");
        let err = capture(command, "test_op", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GodotMcpError::Configuration(_)));
    }
}
