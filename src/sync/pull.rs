//! Pull/checkout engine: materialize remote theme state locally.
//!
//! Fetches the remote template list (or specific named templates) and writes
//! each to its local relative path, creating directories as needed. Binary
//! templates carry a separate `file` URL and are fetched then written as raw
//! bytes; everything else writes the inline `content` as UTF-8 text.
//!
//! A theme id unknown to the store is a "nothing to do" terminal state, not
//! an error: the pull ends cleanly with zero writes. Individual fetch/write
//! failures are recorded and do not abort the run.

use std::path::{Component, Path, PathBuf};

use crate::classify;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::{Template, ThemeApi};
use crate::sync::types::{FileOutcome, PullReport};

/// Downloads templates from one configured theme into a local root.
pub struct Puller<'a, A: ThemeApi> {
    api: &'a A,
    config: &'a Config,
    root: PathBuf,
    prune: bool,
}

impl<'a, A: ThemeApi> Puller<'a, A> {
    pub fn new(api: &'a A, config: &'a Config, root: &Path, prune: bool) -> Self {
        Self {
            api,
            config,
            root: root.to_path_buf(),
            prune,
        }
    }

    /// Pull all templates, or just the named ones.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing theme id or a transport failure while
    /// fetching the template list. Per-template failures are recorded in
    /// the report instead.
    pub async fn pull(&self, names: &[String]) -> Result<PullReport> {
        let theme_id = self.config.require_theme_id()?;
        let mut report = PullReport::default();

        let templates = if names.is_empty() {
            match self.api.list_templates(theme_id).await {
                Ok(templates) => templates,
                Err(Error::ThemeNotFound { theme_id }) => {
                    tracing::info!(
                        "[{}] Theme id #{theme_id} doesn't exist in the system.",
                        self.config.env
                    );
                    return Ok(report);
                }
                Err(e) => return Err(e),
            }
        } else {
            self.fetch_named(theme_id, names, &mut report).await
        };

        tracing::info!(
            "[{}] Pulling {} files from theme id {theme_id} on {}",
            self.config.env,
            templates.len(),
            self.config.store
        );

        for template in &templates {
            match self.write_template(template).await {
                Ok(name) => {
                    tracing::info!("[{}] Downloaded {name}", self.config.env);
                    report.written.push(name);
                }
                Err(e) => {
                    tracing::error!("[{}] {}: {e}", self.config.env, template.name);
                    report
                        .failed
                        .push(FileOutcome::failed(&template.name, e.to_string()));
                }
            }
        }

        // Mirroring deletes are destructive and only run on a full pull
        // with explicit opt-in.
        if self.prune && names.is_empty() {
            self.prune_absent(&mut report)?;
        }

        tracing::info!("[{}] Pull complete: {}", self.config.env, report.summary());
        Ok(report)
    }

    async fn fetch_named(
        &self,
        theme_id: u64,
        names: &[String],
        report: &mut PullReport,
    ) -> Vec<Template> {
        let mut templates = Vec::with_capacity(names.len());
        for raw in names {
            let name = classify::template_name(raw);
            match self.api.get_template(theme_id, &name).await {
                Ok(template) => templates.push(template),
                Err(e) => {
                    tracing::error!("[{}] {name}: {e}", self.config.env);
                    report.failed.push(FileOutcome::failed(&name, e.to_string()));
                }
            }
        }
        templates
    }

    async fn write_template(&self, template: &Template) -> Result<String> {
        let name = classify::template_name(&template.name);
        let path = self.local_path(&name)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::IoAt {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // A non-null file URL is authoritative: fetch bytes, never trust
        // `content` for media templates.
        if let Some(url) = &template.file {
            let bytes = self.api.download(url).await?;
            std::fs::write(&path, bytes).map_err(|e| Error::IoAt {
                path: path.clone(),
                source: e,
            })?;
        } else {
            let content = template.content.as_deref().unwrap_or_default();
            std::fs::write(&path, content).map_err(|e| Error::IoAt {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(name)
    }

    /// Resolve a template name under the local root, rejecting names that
    /// would escape it.
    fn local_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if name.is_empty() || escapes {
            return Err(Error::Other(format!(
                "refusing to write outside the theme root: {name}"
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Delete local accepted files absent from the remote set.
    ///
    /// Every deletion is logged before it happens.
    fn prune_absent(&self, report: &mut PullReport) -> Result<()> {
        let local = classify::accepted_files_under(&self.root)?;
        for name in local {
            if report.written.iter().any(|w| w == &name) {
                continue;
            }
            tracing::warn!("[{}] Pruning local file {name}", self.config.env);
            match std::fs::remove_file(self.root.join(&name)) {
                Ok(()) => report.pruned.push(name),
                Err(e) => {
                    tracing::error!("[{}] {name}: {e}", self.config.env);
                    report.failed.push(FileOutcome::failed(&name, e.to_string()));
                }
            }
        }
        Ok(())
    }
}
