//! Selection Processor
//!
//! Runs the cleaner over a batch of selected files, one at a time, and
//! folds the per-file outcomes into a single aggregate. Individual failures
//! are counted and logged; they never stop the batch.

use crate::error::{CleanError, CleanResult};
use crate::paths::PathValidator;
use crate::tool::{CleanerTool, ToolExit, EXIT_UNSUPPORTED};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of cleaning one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Cleaned copy written; carries its file name when it could be found
    Success(Option<String>),
    /// The tool does not handle this format
    Unsupported,
    Failed,
}

/// Counts for one user action, consumed by the notification step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub success: usize,
    pub unsupported: usize,
    pub failed: usize,
    pub cleaned_files: Vec<String>,
}

impl AggregateResult {
    pub fn record(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Success(cleaned) => {
                self.success += 1;
                self.cleaned_files.extend(cleaned);
            }
            RunOutcome::Unsupported => self.unsupported += 1,
            RunOutcome::Failed => self.failed += 1,
        }
    }
}

/// Name of the copy the cleaner writes next to `path`.
///
/// `.cleaned` goes before the last extension: `report.pdf` becomes
/// `report.cleaned.pdf`, `archive.tar.gz` becomes `archive.tar.cleaned.gz`.
pub fn cleaned_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{}.cleaned.{}", stem, ext.to_string_lossy()),
        None => format!("{}.cleaned", stem),
    };
    path.with_file_name(name)
}

pub struct SelectionProcessor {
    tool: Arc<dyn CleanerTool>,
    validator: PathValidator,
}

impl SelectionProcessor {
    pub fn new(tool: Arc<dyn CleanerTool>, validator: PathValidator) -> Self {
        Self { tool, validator }
    }

    /// Clean every path in order and aggregate the outcomes
    pub async fn process_selection(&self, paths: &[PathBuf]) -> AggregateResult {
        let mut result = AggregateResult::default();

        for path in paths {
            let outcome = match self.run_one(path).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    match &e {
                        CleanError::InvalidPath(_) | CleanError::NotAFile(_) => {
                            warn!("Skipping {}: {}", path.display(), e)
                        }
                        _ => error!("{} failed on {}: {}", self.tool.name(), path.display(), e),
                    }
                    RunOutcome::Failed
                }
            };
            result.record(outcome);
        }

        info!(
            "Batch done: {} cleaned, {} unsupported, {} failed",
            result.success, result.unsupported, result.failed
        );
        result
    }

    async fn run_one(&self, path: &Path) -> CleanResult<RunOutcome> {
        // Checked again here: the selection may have changed since the menu was built
        if !self.validator.validate(path) {
            return Err(CleanError::InvalidPath(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(CleanError::NotAFile(path.to_path_buf()));
        }

        let ToolExit { code, stderr } = self.tool.clean(path).await?;
        match code {
            Some(0) => {
                info!("Cleaned metadata: {}", path.display());
                let cleaned = cleaned_path(path);
                let name = cleaned
                    .exists()
                    .then(|| cleaned.file_name().map(|n| n.to_string_lossy().to_string()))
                    .flatten();
                Ok(RunOutcome::Success(name))
            }
            Some(EXIT_UNSUPPORTED) => {
                info!("Format not supported by {}: {}", self.tool.name(), path.display());
                Ok(RunOutcome::Unsupported)
            }
            _ => Err(CleanError::ToolFailed {
                code,
                stderr: if stderr.is_empty() {
                    "Unknown error".to_string()
                } else {
                    stderr
                },
            }),
        }
    }
}
