//! Result Summary
//!
//! Turns an aggregate into the single title/message pair the user sees.

use crate::processor::AggregateResult;
use serde::Serialize;

/// How the summary should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    Notification,
    ErrorDialog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub kind: SummaryKind,
    pub title: String,
    pub message: String,
}

impl Summary {
    fn notification(title: &str, message: String) -> Self {
        Self {
            kind: SummaryKind::Notification,
            title: title.to_string(),
            message,
        }
    }
}

pub fn summarize(result: &AggregateResult) -> Summary {
    let AggregateResult {
        success,
        unsupported,
        failed,
        cleaned_files,
    } = result;

    if *success > 0 && *failed == 0 && *unsupported == 0 {
        let message = match cleaned_files.as_slice() {
            [only] if *success == 1 => format!("Created: {}", only),
            _ => format!("{} file(s) cleaned successfully", success),
        };
        Summary::notification("Metadata Cleaned", message)
    } else if *success > 0 {
        let mut parts = vec![format!("{} cleaned", success)];
        if *unsupported > 0 {
            parts.push(format!("{} unsupported", unsupported));
        }
        if *failed > 0 {
            parts.push(format!("{} failed", failed));
        }
        Summary::notification("Metadata Cleaning Complete", parts.join(", "))
    } else if *unsupported > 0 && *failed == 0 {
        Summary::notification(
            "No Files Cleaned",
            format!("{} file(s) not supported by mat2", unsupported),
        )
    } else {
        Summary {
            kind: SummaryKind::ErrorDialog,
            title: "Metadata Cleaning Failed".to_string(),
            message: format!("Could not clean {} file(s). Check file permissions.", failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(success: usize, unsupported: usize, failed: usize, files: &[&str]) -> AggregateResult {
        AggregateResult {
            success,
            unsupported,
            failed,
            cleaned_files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_single_success_names_file() {
        let summary = summarize(&aggregate(1, 0, 0, &["report.cleaned.pdf"]));
        assert_eq!(summary.kind, SummaryKind::Notification);
        assert_eq!(summary.title, "Metadata Cleaned");
        assert_eq!(summary.message, "Created: report.cleaned.pdf");
    }

    #[test]
    fn test_single_success_without_file_name() {
        let summary = summarize(&aggregate(1, 0, 0, &[]));
        assert_eq!(summary.message, "1 file(s) cleaned successfully");
    }

    #[test]
    fn test_many_successes() {
        let summary = summarize(&aggregate(3, 0, 0, &["a.cleaned.png", "b.cleaned.png"]));
        assert_eq!(summary.title, "Metadata Cleaned");
        assert_eq!(summary.message, "3 file(s) cleaned successfully");
    }

    #[test]
    fn test_partial_success_lists_counts() {
        let summary = summarize(&aggregate(1, 1, 1, &["a.cleaned.png"]));
        assert_eq!(summary.kind, SummaryKind::Notification);
        assert_eq!(summary.title, "Metadata Cleaning Complete");
        assert_eq!(summary.message, "1 cleaned, 1 unsupported, 1 failed");

        let summary = summarize(&aggregate(2, 0, 4, &[]));
        assert_eq!(summary.message, "2 cleaned, 4 failed");
    }

    #[test]
    fn test_all_unsupported() {
        let summary = summarize(&aggregate(0, 2, 0, &[]));
        assert_eq!(summary.title, "No Files Cleaned");
        assert_eq!(summary.message, "2 file(s) not supported by mat2");
    }

    #[test]
    fn test_failures_use_error_dialog() {
        let summary = summarize(&aggregate(0, 1, 2, &[]));
        assert_eq!(summary.kind, SummaryKind::ErrorDialog);
        assert_eq!(summary.title, "Metadata Cleaning Failed");
        assert_eq!(
            summary.message,
            "Could not clean 2 file(s). Check file permissions."
        );
    }
}
