//! Single active engine session.
//!
//! At most one long-lived Godot child process exists at a time. Its two
//! output streams are drained by background reader tasks into unbounded
//! per-stream channels; request handlers move queued lines into the
//! accumulated sequences, each line exactly once. Lines keep arrival
//! order within a stream; no ordering holds across streams.

use godot_mcp_core::{DebugSnapshot, GodotMcpError, Result, SessionOutcome};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Timing knobs for session lifecycle
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay before checking a fresh spawn for immediate exit
    pub startup_grace: Duration,
    /// Wait for graceful exit before force-killing
    pub stop_grace: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            startup_grace: Duration::from_millis(200),
            stop_grace: Duration::from_secs(5),
        }
    }
}

struct ActiveSession {
    child: Child,
    stdout_rx: mpsc::UnboundedReceiver<String>,
    stderr_rx: mpsc::UnboundedReceiver<String>,
    output: Vec<String>,
    errors: Vec<String>,
}

impl ActiveSession {
    /// Move currently queued lines into the accumulated sequences
    fn drain_queues(&mut self) {
        while let Ok(line) = self.stdout_rx.try_recv() {
            debug!("[godot stdout] {}", line);
            self.output.push(line);
        }
        while let Ok(line) = self.stderr_rx.try_recv() {
            debug!("[godot stderr] {}", line);
            self.errors.push(line);
        }
    }

    /// Drain until both readers finish. The readers terminate once the
    /// pipes hit EOF, which normally follows child exit immediately; the
    /// wait is bounded in case a grandchild keeps a pipe open.
    async fn drain_to_end(&mut self) {
        let output = &mut self.output;
        let errors = &mut self.errors;
        let stdout_rx = &mut self.stdout_rx;
        let stderr_rx = &mut self.stderr_rx;
        let _ = tokio::time::timeout(Duration::from_millis(500), async {
            while let Some(line) = stdout_rx.recv().await {
                output.push(line);
            }
            while let Some(line) = stderr_rx.recv().await {
                errors.push(line);
            }
        })
        .await;
        self.drain_queues();
    }
}

/// Owns zero-or-one running engine subprocess
pub struct SessionManager {
    config: SessionConfig,
    active: Option<ActiveSession>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Spawn a new session from the prepared command, stopping any prior
    /// session first. Returns an error carrying captured output if the
    /// process exits within the startup grace period.
    pub async fn start(&mut self, mut command: Command) -> Result<()> {
        if self.active.is_some() {
            debug!("Stopping existing Godot process before starting a new one");
            let _ = self.stop().await;
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| GodotMcpError::Configuration(format!("Failed to spawn Godot: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GodotMcpError::Io("child stdout not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GodotMcpError::Io("child stderr not captured".into()))?;

        let (stdout_tx, stdout_rx) = mpsc::unbounded_channel();
        let (stderr_tx, stderr_rx) = mpsc::unbounded_channel();
        tokio::spawn(read_lines(stdout, stdout_tx));
        tokio::spawn(read_lines(stderr, stderr_tx));

        let mut session = ActiveSession {
            child,
            stdout_rx,
            stderr_rx,
            output: Vec::new(),
            errors: Vec::new(),
        };

        // Catches launches that die on bad arguments
        tokio::time::sleep(self.config.startup_grace).await;
        if let Some(status) = session
            .child
            .try_wait()
            .map_err(|e| GodotMcpError::Io(e.to_string()))?
        {
            session.drain_to_end().await;
            return Err(GodotMcpError::EngineReported(format!(
                "Godot process exited immediately with {status}. Stdout: '{}' Stderr: '{}'",
                excerpt(&session.output.join("\n")),
                excerpt(&session.errors.join("\n")),
            )));
        }

        self.active = Some(session);
        Ok(())
    }

    /// Non-blocking snapshot of accumulated output. Repeated polls never
    /// lose or duplicate a line.
    pub async fn poll(&mut self) -> Result<DebugSnapshot> {
        let exited = {
            let session = self.active.as_mut().ok_or(GodotMcpError::NoActiveSession)?;
            session.drain_queues();
            session
                .child
                .try_wait()
                .map_err(|e| GodotMcpError::Io(e.to_string()))?
                .is_some()
        };

        if exited {
            if let Some(mut session) = self.active.take() {
                debug!("Godot process terminated, returning final output");
                session.drain_to_end().await;
                return Ok(DebugSnapshot {
                    output: session.output,
                    errors: session.errors,
                    terminated: true,
                });
            }
        }

        let session = self.active.as_ref().ok_or(GodotMcpError::NoActiveSession)?;
        Ok(DebugSnapshot {
            output: session.output.clone(),
            errors: session.errors.clone(),
            terminated: false,
        })
    }

    /// Stop the active session: drain, terminate gracefully, force-kill
    /// after the grace bound, and return the final sequences.
    pub async fn stop(&mut self) -> Result<SessionOutcome> {
        let mut session = self.active.take().ok_or(GodotMcpError::NoActiveSession)?;

        session.drain_queues();

        let already_exited = session
            .child
            .try_wait()
            .map_err(|e| GodotMcpError::Io(e.to_string()))?
            .is_some();

        let message = if already_exited {
            debug!("Stop requested but Godot process already terminated");
            "Godot process already terminated".to_string()
        } else {
            self.terminate(&mut session.child).await;
            "Godot project stopped".to_string()
        };

        session.drain_to_end().await;

        Ok(SessionOutcome {
            message,
            final_output: session.output,
            final_errors: session.errors,
        })
    }

    /// Cleanup hook for service shutdown; succeeds trivially when idle
    pub async fn shutdown(&mut self) {
        if self.active.is_some() {
            let _ = self.stop().await;
        }
    }

    async fn terminate(&self, child: &mut Child) {
        request_graceful_exit(child);
        match tokio::time::timeout(self.config.stop_grace, child.wait()).await {
            Ok(Ok(status)) => debug!("Godot exited with {}", status),
            Ok(Err(e)) => warn!("Failed waiting for Godot to exit: {}", e),
            Err(_) => {
                warn!("Godot did not exit within grace period, killing");
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill Godot process: {}", e);
                }
            }
        }
    }
}

/// Background reader: one per stream, pushes trimmed lines until EOF
async fn read_lines<R: AsyncRead + Unpin>(stream: R, tx: mpsc::UnboundedSender<String>) {
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line.trim_end().to_string()).is_err() {
            break;
        }
    }
}

#[cfg(unix)]
fn request_graceful_exit(child: &mut Child) {
    if let Some(pid) = child.id() {
        // SAFETY: signalling a child we spawned and still own
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGTERM);
        }
    }
}

#[cfg(not(unix))]
fn request_graceful_exit(child: &mut Child) {
    let _ = child.start_kill();
}

fn excerpt(s: &str) -> &str {
    match s.char_indices().nth(200) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
