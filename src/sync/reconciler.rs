//! Change reconciliation: local filesystem events to remote API mutations.
//!
//! The reconciler consumes a batch of change events, drops everything the
//! classifier rejects, triggers at most one Sass compile per batch, and maps
//! each remaining event to exactly one gateway call. Gateway calls run
//! strictly sequentially so ordering is deterministic (last event for a path
//! wins) and failure attribution is unambiguous.
//!
//! Per-file failures never abort a batch. A failed file is only retried when
//! the watcher emits a new event for it. `--strict` escalates a batch with
//! any failure into a command-level error after processing completes.

use std::path::{Path, PathBuf};

use crate::classify;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::{TemplatePayload, ThemeApi};
use crate::sass::SassRunner;
use crate::sync::types::{BatchReport, ChangeEvent, ChangeKind, FileOutcome};

/// Maps change events to gateway calls for one configured theme.
pub struct Reconciler<'a, A: ThemeApi, S: SassRunner> {
    api: &'a A,
    config: &'a Config,
    sass: &'a S,
    root: PathBuf,
    strict: bool,
}

impl<'a, A: ThemeApi, S: SassRunner> Reconciler<'a, A, S> {
    pub fn new(api: &'a A, config: &'a Config, sass: &'a S, root: &Path, strict: bool) -> Self {
        Self {
            api,
            config,
            sass,
            root: root.to_path_buf(),
            strict,
        }
    }

    /// Process one batch of change events.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing theme id, or [`Error::SyncFailed`]
    /// in strict mode when any file in the batch failed. Per-file API and
    /// local I/O failures are recorded in the report, not raised.
    pub async fn process_batch(&self, events: &[ChangeEvent]) -> Result<BatchReport> {
        let theme_id = self.config.require_theme_id()?;

        let accepted: Vec<(ChangeKind, String)> = events
            .iter()
            .map(|e| (e.kind, classify::template_name(&e.path)))
            .filter(|(_, name)| classify::is_accepted(name))
            .collect();

        let mut report = BatchReport::default();
        if accepted.is_empty() {
            return Ok(report);
        }

        // Compile once per batch, not once per changed Sass file.
        if accepted.iter().any(|(_, name)| classify::is_sass_source(name)) {
            self.compile_sass();
        }

        tracing::info!(
            "[{}] Syncing {} files to theme id {theme_id} on {}",
            self.config.env,
            accepted.len(),
            self.config.store
        );

        for (kind, name) in &accepted {
            let outcome = match kind {
                ChangeKind::Added | ChangeKind::Modified => self.upload_one(theme_id, name).await,
                ChangeKind::Deleted => self.delete_one(theme_id, name).await,
            };
            match &outcome.message {
                None => tracing::info!("[{}] {kind} {name}", self.config.env),
                Some(message) => {
                    tracing::error!("[{}] {kind} {name}: {message}", self.config.env);
                }
            }
            report.outcomes.push(outcome);
        }

        tracing::info!("[{}] Batch complete: {}", self.config.env, report.summary());

        if self.strict && report.failed() > 0 {
            return Err(Error::SyncFailed {
                failed: report.failed(),
                total: report.total(),
            });
        }
        Ok(report)
    }

    /// Upload every accepted local file, or the accepted subset of `names`.
    ///
    /// Used by `push`: expands the allow-list over the theme root when no
    /// explicit files are given, then drives the same per-file path as a
    /// watch batch.
    pub async fn push(&self, names: &[String]) -> Result<BatchReport> {
        let targets = if names.is_empty() {
            classify::accepted_files_under(&self.root)?
        } else {
            names
                .iter()
                .map(|n| classify::template_name(n))
                .filter(|n| classify::is_accepted(n))
                .collect()
        };

        let events: Vec<ChangeEvent> = targets
            .into_iter()
            .map(|name| ChangeEvent::new(ChangeKind::Modified, name))
            .collect();
        self.process_batch(&events).await
    }

    async fn upload_one(&self, theme_id: u64, name: &str) -> FileOutcome {
        let path = self.root.join(name);

        let payload = if classify::is_media(name) {
            match std::fs::read(&path) {
                Ok(bytes) => TemplatePayload::Media(bytes),
                Err(e) => return FileOutcome::failed(name, e.to_string()),
            }
        } else {
            match std::fs::read_to_string(&path) {
                Ok(content) => TemplatePayload::Text(content),
                Err(e) => return FileOutcome::failed(name, e.to_string()),
            }
        };

        match self.api.upload_template(theme_id, name, &payload).await {
            Ok(()) => FileOutcome::uploaded(name),
            Err(e) => FileOutcome::failed(name, e.to_string()),
        }
    }

    async fn delete_one(&self, theme_id: u64, name: &str) -> FileOutcome {
        match self.api.delete_template(theme_id, name).await {
            Ok(()) => FileOutcome::deleted(name),
            Err(e) => FileOutcome::failed(name, e.to_string()),
        }
    }

    /// Sass failures are reported and the batch continues; the compiled
    /// output simply will not be part of this upload pass.
    fn compile_sass(&self) {
        tracing::info!(
            "[{}] Processing {} to {}.",
            self.config.env,
            classify::SASS_SOURCE,
            classify::SASS_DESTINATION
        );
        match self.sass.compile(&self.root, self.config.sass_output_style) {
            Ok(()) => tracing::info!("[{}] Sass successfully processed.", self.config.env),
            Err(e) => tracing::error!("[{}] {e}", self.config.env),
        }
    }
}
