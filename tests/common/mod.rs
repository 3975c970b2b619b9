pub mod mock_notifier;
pub mod mock_tool;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding files to select
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn root(&self) -> PathBuf {
        fs::canonicalize(self.temp_dir.path()).expect("Failed to resolve temp dir")
    }

    /// Create a file with the given content and return its path
    pub fn file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write an executable shell script
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod script");
        path
    }
}

pub fn file_uri(path: &Path) -> String {
    format!(
        "file://{}",
        urlencoding::encode(&path.to_string_lossy()).replace("%2F", "/")
    )
}
