//! Change events and per-file sync outcomes.

use serde::Serialize;

/// What happened to a local file, as reported by the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// One filesystem change delivered by the watcher.
///
/// `path` is normalized to a POSIX-style relative path before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: String,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Terminal state of one file within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Uploaded,
    Deleted,
    Failed,
}

/// Structured per-file record: what was attempted and how it ended.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// Template name (relative path on the theme).
    pub name: String,
    pub status: FileStatus,
    /// Failure detail, present only when `status` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FileOutcome {
    #[must_use]
    pub fn uploaded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Uploaded,
            message: None,
        }
    }

    #[must_use]
    pub fn deleted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Deleted,
            message: None,
        }
    }

    #[must_use]
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Failed,
            message: Some(message.into()),
        }
    }
}

/// Aggregated result of one reconciliation batch.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn uploaded(&self) -> usize {
        self.count(FileStatus::Uploaded)
    }

    #[must_use]
    pub fn deleted(&self) -> usize {
        self.count(FileStatus::Deleted)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(FileStatus::Failed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// One-line summary for the end-of-batch log.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} uploaded, {} deleted, {} failed",
            self.uploaded(),
            self.deleted(),
            self.failed()
        )
    }

    fn count(&self, status: FileStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Aggregated result of one pull/checkout run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PullReport {
    /// Template names written locally, in processing order.
    pub written: Vec<String>,
    /// Per-file fetch/write failures; siblings keep processing.
    pub failed: Vec<FileOutcome>,
    /// Local files deleted by `--prune` (empty unless opted in).
    pub pruned: Vec<String>,
}

impl PullReport {
    #[must_use]
    pub fn summary(&self) -> String {
        if self.pruned.is_empty() {
            format!("{} written, {} failed", self.written.len(), self.failed.len())
        } else {
            format!(
                "{} written, {} failed, {} pruned",
                self.written.len(),
                self.failed.len(),
                self.pruned.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_report_counts_by_status() {
        let report = BatchReport {
            outcomes: vec![
                FileOutcome::uploaded("assets/base.css"),
                FileOutcome::uploaded("templates/index.html"),
                FileOutcome::deleted("layouts/old.html"),
                FileOutcome::failed("assets/logo.png", "boom"),
            ],
        };
        assert_eq!(report.uploaded(), 2);
        assert_eq!(report.deleted(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total(), 4);
        assert_eq!(report.summary(), "2 uploaded, 1 deleted, 1 failed");
    }

    #[test]
    fn pull_report_summary_mentions_prune_only_when_used() {
        let mut report = PullReport {
            written: vec!["a".to_string(), "b".to_string()],
            ..PullReport::default()
        };
        assert_eq!(report.summary(), "2 written, 0 failed");

        report.pruned.push("stale.html".to_string());
        assert_eq!(report.summary(), "2 written, 0 failed, 1 pruned");
    }
}
