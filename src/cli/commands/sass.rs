//! Compile Sass sources into the assets directory.

use std::path::Path;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::sass::{SassCompiler, SassRunner};

/// Execute the sass command.
pub fn execute(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config, &cli.env, &cli.overrides(), false)?;

    tracing::info!("[{}] Processing sass files.", config.env);
    SassCompiler.compile(Path::new("."), config.sass_output_style)?;
    tracing::info!("[{}] Sass files were processed.", config.env);
    Ok(())
}
