//! mat2-menu Error Types
//!
//! Per-file failures are values of this type. They are counted and logged by
//! the selection processor and never abort a batch.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Central error type for mat2-menu
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Rejected path: {0}")]
    InvalidPath(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Cleaner exited with code {code:?}: {stderr}")]
    ToolFailed { code: Option<i32>, stderr: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Could not run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Format check failed: {0}")]
    Sniff(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for mat2-menu operations
pub type CleanResult<T> = Result<T, CleanError>;
