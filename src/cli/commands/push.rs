//! Push local theme files to the store.

use std::path::Path;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::sass::SassCompiler;
use crate::sync::Reconciler;

/// Execute the push command.
///
/// Uploads every accepted file under the current directory, or just the
/// named subset. Sass sources in the selection trigger one compile pass
/// before uploading.
pub fn execute(filenames: &[String], cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config, &cli.env, &cli.overrides(), true)?;

    tracing::info!("[{}] Connecting to {}", config.env, config.store);

    let gateway = Gateway::new(&config.store, &config.apikey);
    let sass = SassCompiler;
    let reconciler = Reconciler::new(&gateway, &config, &sass, Path::new("."), cli.strict);

    let rt = super::runtime()?;
    rt.block_on(reconciler.push(filenames))?;
    Ok(())
}
