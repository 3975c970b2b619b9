//! Mock Cleaner for Testing
//!
//! Answers with scripted exit codes and records every invocation.

use async_trait::async_trait;
use mat2_menu::error::{CleanError, CleanResult};
use mat2_menu::processor::cleaned_path;
use mat2_menu::tool::{CleanerTool, ToolExit};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug)]
pub struct MockTool {
    /// Exit code per file name; unknown names exit 0
    pub exit_codes: HashMap<String, i32>,
    /// File names that time out instead of exiting
    pub timeouts: Vec<String>,
    /// Whether a successful run writes the cleaned copy
    pub write_copies: bool,
    pub installed: bool,
    pub cleaned: Mutex<Vec<PathBuf>>,
    pub probes: AtomicUsize,
}

impl MockTool {
    pub fn new() -> Self {
        Self {
            exit_codes: HashMap::new(),
            timeouts: Vec::new(),
            write_copies: true,
            installed: true,
            cleaned: Mutex::new(Vec::new()),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn with_exit(mut self, file_name: &str, code: i32) -> Self {
        self.exit_codes.insert(file_name.to_string(), code);
        self
    }

    pub fn with_timeout(mut self, file_name: &str) -> Self {
        self.timeouts.push(file_name.to_string());
        self
    }

    pub fn uninstalled(mut self) -> Self {
        self.installed = false;
        self
    }

    pub fn invocations(&self) -> Vec<PathBuf> {
        self.cleaned.lock().unwrap().clone()
    }
}

impl Default for MockTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CleanerTool for MockTool {
    async fn clean(&self, path: &Path) -> CleanResult<ToolExit> {
        self.cleaned.lock().unwrap().push(path.to_path_buf());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.timeouts.contains(&name) {
            return Err(CleanError::Timeout(Duration::from_secs(300)));
        }

        let code = self.exit_codes.get(&name).copied().unwrap_or(0);
        if code == 0 && self.write_copies {
            std::fs::write(cleaned_path(path), b"cleaned")?;
        }

        Ok(ToolExit {
            code: Some(code),
            stderr: if code > 1 {
                "mock failure".to_string()
            } else {
                String::new()
            },
        })
    }

    async fn version(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.installed
    }

    fn name(&self) -> &str {
        "mock-mat2"
    }
}
