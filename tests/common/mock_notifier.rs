//! Mock Notifier for Testing
//!
//! Records every notification and dialog for verification.

use async_trait::async_trait;
use mat2_menu::notify::Notifier;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Notification { title: String, message: String },
    Error { title: String, message: String },
}

#[derive(Debug, Default)]
pub struct MockNotifier {
    pub shown: Mutex<Vec<Shown>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    pub fn error_count(&self) -> usize {
        self.get_shown()
            .iter()
            .filter(|s| matches!(s, Shown::Error { .. }))
            .count()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, title: &str, message: &str) {
        self.shown.lock().unwrap().push(Shown::Notification {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    async fn error(&self, title: &str, message: &str) {
        self.shown.lock().unwrap().push(Shown::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}
