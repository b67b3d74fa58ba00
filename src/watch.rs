//! Debounced filesystem watcher feeding the reconciler.
//!
//! A long-lived watcher over the theme root that yields batches of change
//! events as they occur. Debouncing (500ms) folds editor save storms into
//! one batch. The loop checks a shutdown flag between receives so Ctrl+C
//! terminates promptly without orphaned handles; once stopped, the watcher
//! is not restartable.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, DebouncedEvent, Debouncer, new_debouncer};

use crate::classify;
use crate::error::{Error, Result};
use crate::sync::types::{ChangeEvent, ChangeKind};

/// Debounce window for folding rapid successive writes.
const DEBOUNCE: Duration = Duration::from_millis(500);

/// How often the receive loop re-checks the shutdown flag.
const POLL: Duration = Duration::from_millis(100);

/// Watches a theme root and yields batches of change events.
pub struct FileWatcher {
    root: PathBuf,
    rx: Receiver<DebounceEventResult>,
    // Held for its Drop: dropping the debouncer stops the native watcher.
    _debouncer: Debouncer<RecommendedWatcher>,
    shutdown: Arc<AtomicBool>,
}

impl FileWatcher {
    /// Start watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Watch`] if the native watcher cannot be created
    /// or the root cannot be watched.
    pub fn new(root: &Path) -> Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut debouncer =
            new_debouncer(DEBOUNCE, tx).map_err(|e| Error::Watch(e.to_string()))?;
        debouncer
            .watcher()
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| Error::Watch(e.to_string()))?;

        Ok(Self {
            root: root.to_path_buf(),
            rx,
            _debouncer: debouncer,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shared flag a signal handler can set to stop the loop.
    #[must_use]
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the watcher to stop.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Block until the next non-empty batch of change events.
    ///
    /// Returns `None` once the watcher is shut down or its event source
    /// disconnects.
    pub fn next_batch(&self) -> Option<Vec<ChangeEvent>> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return None;
            }

            match self.rx.recv_timeout(POLL) {
                Ok(Ok(events)) => {
                    let batch: Vec<ChangeEvent> = events
                        .iter()
                        .filter_map(|e| self.to_change_event(e))
                        .collect();
                    if !batch.is_empty() {
                        return Some(batch);
                    }
                }
                Ok(Err(e)) => {
                    tracing::error!("Watch error: {e}");
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Convert a raw debounced event into a domain change event.
    ///
    /// The debouncer folds create+modify together, so the kind is derived
    /// from whether the path still exists. Directories and paths outside
    /// the root are dropped.
    fn to_change_event(&self, event: &DebouncedEvent) -> Option<ChangeEvent> {
        let path = &event.path;
        if path.is_dir() {
            return None;
        }

        let relative = path.strip_prefix(&self.root).ok()?;
        let name = classify::template_name(&relative.to_string_lossy());
        if name.is_empty() {
            return None;
        }

        let kind = if path.exists() {
            ChangeKind::Modified
        } else {
            ChangeKind::Deleted
        };
        Some(ChangeEvent::new(kind, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_debouncer_mini::DebouncedEventKind;
    use std::fs;
    use tempfile::TempDir;

    fn raw_event(path: PathBuf) -> DebouncedEvent {
        DebouncedEvent {
            path,
            kind: DebouncedEventKind::Any,
        }
    }

    #[test]
    fn existing_file_maps_to_modified() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/base.css"), "body {}").unwrap();

        let watcher = FileWatcher::new(dir.path()).unwrap();
        let event = watcher
            .to_change_event(&raw_event(dir.path().join("assets/base.css")))
            .unwrap();

        assert_eq!(event.kind, ChangeKind::Modified);
        assert_eq!(event.path, "assets/base.css");
    }

    #[test]
    fn missing_file_maps_to_deleted() {
        let dir = TempDir::new().unwrap();
        let watcher = FileWatcher::new(dir.path()).unwrap();

        let event = watcher
            .to_change_event(&raw_event(dir.path().join("layouts/base.html")))
            .unwrap();

        assert_eq!(event.kind, ChangeKind::Deleted);
        assert_eq!(event.path, "layouts/base.html");
    }

    #[test]
    fn directories_are_dropped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();

        let watcher = FileWatcher::new(dir.path()).unwrap();
        assert!(watcher.to_change_event(&raw_event(dir.path().join("assets"))).is_none());
    }

    #[test]
    fn paths_outside_root_are_dropped() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();

        let watcher = FileWatcher::new(dir.path()).unwrap();
        assert!(
            watcher
                .to_change_event(&raw_event(other.path().join("assets/base.css")))
                .is_none()
        );
    }

    #[test]
    fn stop_ends_the_batch_loop() {
        let dir = TempDir::new().unwrap();
        let watcher = FileWatcher::new(dir.path()).unwrap();

        watcher.stop();
        assert!(watcher.next_batch().is_none());
    }

    #[test]
    fn shutdown_flag_is_shared() {
        let dir = TempDir::new().unwrap();
        let watcher = FileWatcher::new(dir.path()).unwrap();

        let flag = watcher.shutdown_flag();
        flag.store(true, Ordering::Relaxed);
        assert!(watcher.next_batch().is_none());
    }
}
