//! Desktop Feedback
//!
//! Best-effort notifications and error dialogs. Nothing here may fail the
//! caller: a missing notification daemon only costs a log line.

use crate::config::Config;
use crate::summary::{Summary, SummaryKind};
use crate::tool::run_with_timeout;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

/// Trait for user feedback backends
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Show a transient notification
    async fn notify(&self, title: &str, message: &str);

    /// Show a blocking error dialog
    async fn error(&self, title: &str, message: &str);
}

/// Route a summary to the right kind of feedback
pub async fn deliver(notifier: &dyn Notifier, summary: &Summary) {
    match summary.kind {
        SummaryKind::Notification => notifier.notify(&summary.title, &summary.message).await,
        SummaryKind::ErrorDialog => notifier.error(&summary.title, &summary.message).await,
    }
}

/// notify-send + zenity backend
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    notify_command: String,
    icon: String,
    notify_timeout: Duration,
    dialog_command: String,
    dialog_width: u32,
    dialog_timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(config: &Config) -> Self {
        Self {
            notify_command: config.notify_command.clone(),
            icon: config.notify_icon.clone(),
            notify_timeout: config.notify_timeout(),
            dialog_command: config.dialog_command.clone(),
            dialog_width: config.dialog_width,
            dialog_timeout: config.dialog_timeout(),
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) {
        let result = run_with_timeout(
            Command::new(&self.notify_command)
                .arg("-i")
                .arg(&self.icon)
                .arg(title)
                .arg(message),
            self.notify_timeout,
        )
        .await;

        if let Err(e) = result {
            debug!("Could not show notification '{}': {}", title, e);
        }
    }

    async fn error(&self, title: &str, message: &str) {
        let result = run_with_timeout(
            Command::new(&self.dialog_command)
                .arg("--error")
                .arg("--title")
                .arg(title)
                .arg("--text")
                .arg(message)
                .arg("--width")
                .arg(self.dialog_width.to_string()),
            self.dialog_timeout,
        )
        .await;

        if let Err(e) = result {
            error!("Dialog error: {} - {} ({})", title, message, e);
        }
    }
}
