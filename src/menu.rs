//! Menu Adapter
//!
//! The narrow boundary between the file manager and the selection
//! processor. The host only hands over URIs and, later, the activated
//! selection; no host types cross this line.

use crate::formats::FormatFilter;
use crate::notify::{deliver, Notifier};
use crate::paths::{path_from_arg, PathValidator};
use crate::processor::{AggregateResult, SelectionProcessor};
use crate::summary::summarize;
use crate::tool::ToolProbe;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Stable identifier the host uses for the entry
pub const ITEM_NAME: &str = "Mat2Extension::CleanMetadata";

/// Description of one context-menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub label: String,
    pub tip: String,
    /// False when the entry is shown but cannot run
    pub sensitive: bool,
    pub paths: Vec<PathBuf>,
}

impl MenuItem {
    pub fn clean_metadata(paths: Vec<PathBuf>) -> Self {
        let (label, tip) = if paths.len() == 1 {
            (
                "Clean Metadata".to_string(),
                "Remove metadata from this file using mat2".to_string(),
            )
        } else {
            (
                format!("Clean Metadata ({} files)", paths.len()),
                format!("Remove metadata from {} files using mat2", paths.len()),
            )
        };

        Self {
            name: ITEM_NAME.to_string(),
            label,
            tip,
            sensitive: true,
            paths,
        }
    }

    /// Same entry, greyed out because the cleaner is missing
    pub fn degraded(mut self) -> Self {
        self.label = "Clean Metadata (mat2 not installed)".to_string();
        self.tip = "Install mat2 to use this extension".to_string();
        self.sensitive = false;
        self
    }
}

/// What the host calls when the user picks the menu entry
#[async_trait]
pub trait SelectionActivation: Send + Sync {
    async fn on_selection_activated(&self, paths: Vec<PathBuf>) -> AggregateResult;
}

/// Builds menu entries for a selection
pub struct MenuProvider {
    probe: Arc<ToolProbe>,
    filter: FormatFilter,
    validator: PathValidator,
    notifier: Arc<dyn Notifier>,
}

impl MenuProvider {
    pub fn new(
        probe: Arc<ToolProbe>,
        filter: FormatFilter,
        validator: PathValidator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            probe,
            filter,
            validator,
            notifier,
        }
    }

    /// Selected files the entry would act on
    pub fn eligible_paths(&self, uris: &[String]) -> Vec<PathBuf> {
        uris.iter()
            .filter_map(|uri| {
                let path = path_from_arg(uri);
                if path.is_none() {
                    debug!("Ignoring non-local selection entry: {}", uri);
                }
                path
            })
            .filter(|path| {
                path.is_file() && self.validator.validate(path) && self.filter.is_supported(path)
            })
            .collect()
    }

    /// Entries for a right-click on files. A missing mat2 greys the entry
    /// out; the dialog is left to `report_missing_tool` so the host gets its
    /// items first.
    pub async fn menu_items(&self, uris: &[String]) -> Vec<MenuItem> {
        if uris.is_empty() {
            return vec![];
        }

        let paths = self.eligible_paths(uris);
        if paths.is_empty() {
            return vec![];
        }

        let item = MenuItem::clean_metadata(paths);
        if self.probe.is_available().await {
            vec![item]
        } else {
            vec![item.degraded()]
        }
    }

    /// Show the "not installed" dialog if the probe found mat2 missing and
    /// nobody has shown it yet
    pub async fn report_missing_tool(&self) {
        if self.probe.cached() != Some(false) || !self.probe.claim_missing_report() {
            return;
        }
        self.notifier
            .error(
                "mat2 not installed",
                "Install mat2 to use this extension:\n\nsudo apt install mat2",
            )
            .await;
    }

    /// Entries for a right-click on empty folder space
    pub fn background_items(&self) -> Vec<MenuItem> {
        vec![]
    }
}

/// Runs the clean batch for an activated entry and reports the outcome
pub struct CleanMetadataAction {
    processor: SelectionProcessor,
    notifier: Arc<dyn Notifier>,
    delay: Duration,
}

impl CleanMetadataAction {
    pub fn new(processor: SelectionProcessor, notifier: Arc<dyn Notifier>, delay: Duration) -> Self {
        Self {
            processor,
            notifier,
            delay,
        }
    }
}

#[async_trait]
impl SelectionActivation for CleanMetadataAction {
    async fn on_selection_activated(&self, paths: Vec<PathBuf>) -> AggregateResult {
        // Let the context menu close and hand focus back first
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        info!("Cleaning metadata for {} file(s)", paths.len());
        let result = self.processor.process_selection(&paths).await;
        let summary = summarize(&result);
        deliver(self.notifier.as_ref(), &summary).await;
        result
    }
}
