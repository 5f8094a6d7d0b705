//! Best-effort classification of captured engine output.
//!
//! The engine gives no structured failure signal, so failure is detected
//! by scanning the captured text for known markers. All call sites go
//! through `classify_outcome` so the heuristic can be replaced with a
//! structured protocol without touching them.

use crate::invoke::CapturedOutput;

/// Stderr markers that indicate failure for most operations
pub const DEFAULT_STDERR_MARKERS: &[&str] = &["error", "failed"];

/// Result of classifying one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Failure-indicating text found in the captured output
    EngineError(String),
}

/// Scan captured output for failure markers.
///
/// `stderr_markers` match case-insensitively anywhere in stderr;
/// `stdout_markers` are operation-specific exact substrings of stdout.
pub fn classify_outcome(
    captured: &CapturedOutput,
    stderr_markers: &[&str],
    stdout_markers: &[&str],
) -> Outcome {
    if !captured.stderr.is_empty() {
        let stderr_lower = captured.stderr.to_lowercase();
        if stderr_markers.iter().any(|m| stderr_lower.contains(m)) {
            return Outcome::EngineError(format!(
                "Godot stderr: {}",
                captured.stderr.trim()
            ));
        }
    }

    if stdout_markers.iter().any(|m| captured.stdout.contains(m)) {
        return Outcome::EngineError(format!("Godot stdout: {}", captured.stdout.trim()));
    }

    Outcome::Success
}
