//! Watch the current directory and push changes as they happen.

use std::path::Path;
use std::sync::atomic::Ordering;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::sass::SassCompiler;
use crate::sync::Reconciler;
use crate::watch::FileWatcher;

/// Execute the watch command.
///
/// Blocks until Ctrl+C. Each debounced batch of filesystem changes is
/// pushed through the reconciler; individual file failures are logged
/// and the loop keeps running.
///
/// # Errors
///
/// Returns an error for missing configuration, a watcher that cannot be
/// started, or (with `--strict`) a batch containing failures.
pub fn execute(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config, &cli.env, &cli.overrides(), true)?;

    tracing::info!("[{}] Connecting to {}", config.env, config.store);
    tracing::info!("[{}] Preview url: {}", config.env, config.preview_url());

    let gateway = Gateway::new(&config.store, &config.apikey);
    let sass = SassCompiler;
    let root = Path::new(".");
    let reconciler = Reconciler::new(&gateway, &config, &sass, root, cli.strict);

    let watcher = FileWatcher::new(root)?;
    let shutdown = watcher.shutdown_flag();
    ctrlc::set_handler(move || {
        shutdown.store(true, Ordering::Relaxed);
    })
    .map_err(|e| Error::Watch(e.to_string()))?;

    tracing::info!("[{}] Watching for file changes. Press Ctrl+C to stop.", config.env);

    let rt = super::runtime()?;
    while let Some(batch) = watcher.next_batch() {
        rt.block_on(reconciler.process_batch(&batch))?;
    }

    tracing::info!("[{}] Stopped watching.", config.env);
    Ok(())
}
