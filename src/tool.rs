//! Cleaner Tool
//!
//! The external metadata scrubber behind a trait, so the selection
//! processor can be driven by mat2 in production and by mocks in tests.

use crate::config::Config;
use crate::error::{CleanError, CleanResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, error, warn};

/// Exit code mat2 uses for "format not supported"
pub const EXIT_UNSUPPORTED: i32 = 1;

/// How an invocation of the cleaner ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExit {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolExit {
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            stderr: String::new(),
        }
    }
}

/// Trait for metadata cleaners
#[async_trait]
pub trait CleanerTool: Send + Sync + std::fmt::Debug {
    /// Clean one file, leaving the original untouched
    async fn clean(&self, path: &Path) -> CleanResult<ToolExit>;

    /// Whether the tool answers a version query
    async fn version(&self) -> bool;

    /// Get the tool name
    fn name(&self) -> &str;
}

/// Run a command to completion, killing it if the timeout elapses first.
pub async fn run_with_timeout(command: &mut Command, timeout: Duration) -> CleanResult<Output> {
    let program = command.as_std().get_program().to_string_lossy().to_string();
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(CleanError::Spawn {
            command: program,
            source,
        }),
        Err(_) => Err(CleanError::Timeout(timeout)),
    }
}

/// mat2 command-line backend
#[derive(Debug, Clone)]
pub struct Mat2Tool {
    command: String,
    unknown_members: String,
    clean_timeout: Duration,
    probe_timeout: Duration,
}

impl Mat2Tool {
    pub fn new(config: &Config) -> Self {
        Self {
            command: config.tool_command.clone(),
            unknown_members: config.unknown_members.clone(),
            clean_timeout: config.clean_timeout(),
            probe_timeout: config.probe_timeout(),
        }
    }
}

#[async_trait]
impl CleanerTool for Mat2Tool {
    async fn clean(&self, path: &Path) -> CleanResult<ToolExit> {
        debug!("Running {} on {}", self.command, path.display());

        let output = run_with_timeout(
            Command::new(&self.command)
                .arg("--unknown-members")
                .arg(&self.unknown_members)
                .arg(path),
            self.clean_timeout,
        )
        .await?;

        Ok(ToolExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    async fn version(&self) -> bool {
        match run_with_timeout(Command::new(&self.command).arg("--version"), self.probe_timeout)
            .await
        {
            Ok(output) => {
                debug!(
                    "{} --version: {}",
                    self.command,
                    String::from_utf8_lossy(&output.stdout).trim()
                );
                output.status.success()
            }
            Err(e) => {
                debug!("{} probe failed: {}", self.command, e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Marker recording that the missing tool was already reported this login
/// session. Lives in the runtime dir, which is cleared at logout.
pub fn session_marker_path() -> Option<PathBuf> {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("mat2-menu").join("tool-missing"))
}

/// Availability check for the cleaner, computed once and then reused.
///
/// With a marker file the verdict outlives the process: every right-click
/// runs a fresh `mat2-menu items`, and none after the first may re-probe or
/// show the dialog again.
#[derive(Debug)]
pub struct ToolProbe {
    tool: Arc<dyn CleanerTool>,
    available: OnceCell<bool>,
    missing_reported: AtomicBool,
    marker: Option<PathBuf>,
}

impl ToolProbe {
    pub fn new(tool: Arc<dyn CleanerTool>) -> Self {
        Self {
            tool,
            available: OnceCell::new(),
            missing_reported: AtomicBool::new(false),
            marker: None,
        }
    }

    /// Probe whose "missing" verdict is shared through `marker`
    pub fn with_marker(tool: Arc<dyn CleanerTool>, marker: PathBuf) -> Self {
        let reported = marker.exists();
        if reported {
            debug!("{} already reported missing ({})", tool.name(), marker.display());
        }
        Self {
            tool,
            available: OnceCell::new_with(reported.then_some(false)),
            missing_reported: AtomicBool::new(reported),
            marker: Some(marker),
        }
    }

    /// Forget an earlier "missing" verdict, e.g. after the tool was installed
    pub fn clear_marker(&self) {
        if let Some(marker) = &self.marker {
            if let Err(e) = std::fs::remove_file(marker) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove {}: {}", marker.display(), e);
                }
            }
        }
    }

    /// Probe on first call, answer from cache afterwards
    pub async fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| async {
                let available = self.tool.version().await;
                if !available {
                    error!("{} is not installed or not accessible", self.tool.name());
                }
                available
            })
            .await
    }

    /// Cached verdict, if the probe already ran
    pub fn cached(&self) -> Option<bool> {
        self.available.get().copied()
    }

    /// Returns true exactly once, for whoever should tell the user the tool is missing
    pub fn claim_missing_report(&self) -> bool {
        if self.missing_reported.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(marker) = &self.marker {
            let written = marker
                .parent()
                .map_or(Ok(()), std::fs::create_dir_all)
                .and_then(|_| std::fs::write(marker, b""));
            if let Err(e) = written {
                warn!("Could not write {}: {}", marker.display(), e);
            }
        }
        true
    }
}
