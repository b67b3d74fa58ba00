//! Pull theme files from the store into the local directory.
//!
//! Backs both `pull` (download all or named files) and `checkout`
//! (full download that also persists `config.yml`).

use std::path::Path;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::sync::Puller;

/// Execute the pull/checkout command.
///
/// `persist` writes the effective configuration back to `config.yml`
/// (checkout behavior). `prune` opts into deleting local theme files
/// absent from the remote set after a full pull.
///
/// # Errors
///
/// Returns an error for missing configuration or a transport failure;
/// with `--strict`, also when any individual file failed.
pub fn execute(filenames: &[String], prune: bool, persist: bool, cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config, &cli.env, &cli.overrides(), true)?;
    if persist {
        config.save(&cli.config)?;
    }

    tracing::info!("[{}] Connecting to {}", config.env, config.store);

    let gateway = Gateway::new(&config.store, &config.apikey);
    let puller = Puller::new(&gateway, &config, Path::new("."), prune);

    let rt = super::runtime()?;
    let report = rt.block_on(puller.pull(filenames))?;

    if cli.strict && !report.failed.is_empty() {
        return Err(Error::SyncFailed {
            failed: report.failed.len(),
            total: report.written.len() + report.failed.len(),
        });
    }
    Ok(())
}
