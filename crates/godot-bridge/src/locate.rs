//! Locating the Godot executable.
//!
//! Resolution order: explicit override, then platform candidate list.
//! Each candidate is validated by probing `--version`; verdicts are
//! cached per path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Validates candidate executables and caches the verdicts
pub struct Locator {
    verdicts: HashMap<PathBuf, bool>,
    probe_timeout: Duration,
}

impl Locator {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            verdicts: HashMap::new(),
            probe_timeout,
        }
    }

    /// Check whether a path points at a working Godot executable
    pub async fn validate(&mut self, path: &Path) -> bool {
        if let Some(&verdict) = self.verdicts.get(path) {
            debug!("Using cached verdict for {}: {}", path.display(), verdict);
            return verdict;
        }

        // A bare name relies on PATH lookup; skip the existence check
        let bare = path.components().count() == 1;
        let verdict = (bare || path.exists()) && self.probe(path).await;
        self.verdicts.insert(path.to_path_buf(), verdict);
        verdict
    }

    async fn probe(&self, path: &Path) -> bool {
        debug!("Probing Godot candidate: {}", path.display());
        let child = Command::new(path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                debug!("Candidate {} failed to launch: {}", path.display(), e);
                return false;
            }
        };

        match tokio::time::timeout(self.probe_timeout, child.wait()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!("Candidate {} wait failed: {}", path.display(), e);
                false
            }
            Err(_) => {
                debug!("Candidate {} timed out on --version", path.display());
                false
            }
        }
    }

    /// Resolve the executable: override first, then platform candidates.
    /// Returns None when nothing validates.
    pub async fn detect(&mut self, override_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = override_path {
            if self.validate(path).await {
                info!("Using Godot at: {}", path.display());
                return Some(path.to_path_buf());
            }
            warn!("Configured Godot path is invalid: {}", path.display());
        }

        for candidate in candidate_paths() {
            if self.validate(&candidate).await {
                info!("Found Godot at: {}", candidate.display());
                return Some(candidate);
            }
        }

        warn!("Could not find Godot in common locations");
        None
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    let var = "USERPROFILE";
    #[cfg(not(windows))]
    let var = "HOME";
    std::env::var_os(var).map(PathBuf::from)
}

/// Common install locations per platform, bare `godot` first
fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("godot")];

    #[cfg(target_os = "macos")]
    {
        candidates.push(PathBuf::from("/Applications/Godot.app/Contents/MacOS/Godot"));
        candidates.push(PathBuf::from(
            "/Applications/Godot_4.app/Contents/MacOS/Godot",
        ));
        if let Some(home) = home_dir() {
            candidates.push(home.join("Applications/Godot.app/Contents/MacOS/Godot"));
            candidates.push(home.join("Applications/Godot_4.app/Contents/MacOS/Godot"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        candidates.push(PathBuf::from("C:\\Program Files\\Godot\\Godot.exe"));
        candidates.push(PathBuf::from("C:\\Program Files (x86)\\Godot\\Godot.exe"));
        candidates.push(PathBuf::from("C:\\Program Files\\Godot_4\\Godot.exe"));
        candidates.push(PathBuf::from("C:\\Program Files (x86)\\Godot_4\\Godot.exe"));
        if let Some(home) = home_dir() {
            candidates.push(home.join("Godot").join("Godot.exe"));
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        candidates.push(PathBuf::from("/usr/bin/godot"));
        candidates.push(PathBuf::from("/usr/local/bin/godot"));
        candidates.push(PathBuf::from("/snap/bin/godot"));
        if let Some(home) = home_dir() {
            candidates.push(home.join(".local/bin/godot"));
        }
    }

    candidates
}

/// Lenient-mode default used when detection fails entirely
pub fn fallback_path() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Applications/Godot.app/Contents/MacOS/Godot")
    }
    #[cfg(target_os = "windows")]
    {
        PathBuf::from("C:\\Program Files\\Godot\\Godot.exe")
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("/usr/bin/godot")
    }
}
