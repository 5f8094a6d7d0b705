//! Bridge configuration

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Godot bridge, built once at startup and passed
/// down. No module-global flags.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Explicit path to the Godot executable, overriding detection
    pub godot_path: Option<PathBuf>,
    /// Fail startup when no executable can be located, instead of
    /// falling back to a platform default
    pub strict_path_validation: bool,
    /// Pass `--debug-godot` to the operations script
    pub engine_debug: bool,
    /// Path to the GDScript operations script
    pub operations_script: PathBuf,
    /// Bound on one-shot operation invocations
    pub invoke_timeout: Duration,
    /// Bound on `--version` probes
    pub version_timeout: Duration,
    /// Delay before checking a freshly spawned session for immediate exit
    pub startup_grace: Duration,
    /// Wait for graceful exit before force-killing a session
    pub stop_grace: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            godot_path: None,
            strict_path_validation: false,
            engine_debug: true,
            operations_script: default_operations_script(),
            invoke_timeout: Duration::from_secs(60),
            version_timeout: Duration::from_secs(10),
            startup_grace: Duration::from_millis(200),
            stop_grace: Duration::from_secs(5),
        }
    }
}

impl BridgeConfig {
    /// Build configuration from the process environment.
    ///
    /// Recognized variables: `GODOT_PATH`, `GODOT_MCP_STRICT_PATHS`,
    /// `GODOT_OPERATIONS_SCRIPT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("GODOT_PATH") {
            if !path.is_empty() {
                config.godot_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(script) = std::env::var("GODOT_OPERATIONS_SCRIPT") {
            if !script.is_empty() {
                config.operations_script = PathBuf::from(script);
            }
        }
        config.strict_path_validation = env_flag("GODOT_MCP_STRICT_PATHS");

        config
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// The operations script ships next to the binary under `scripts/`
fn default_operations_script() -> PathBuf {
    let relative = PathBuf::from("scripts").join("godot_operations.gd");
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join(&relative))
            .unwrap_or(relative),
        Err(_) => relative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert!(config.godot_path.is_none());
        assert!(!config.strict_path_validation);
        assert!(config.engine_debug);
        assert_eq!(config.invoke_timeout, Duration::from_secs(60));
        assert_eq!(config.stop_grace, Duration::from_secs(5));
        assert!(config
            .operations_script
            .ends_with(PathBuf::from("scripts").join("godot_operations.gd")));
    }
}
