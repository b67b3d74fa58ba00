//! List themes available on the store.

use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{Gateway, ThemeApi};

/// Execute the list command.
pub fn execute(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config, &cli.env, &cli.overrides(), false)?;
    let gateway = Gateway::new(&config.store, &config.apikey);

    let rt = super::runtime()?;
    let themes = rt.block_on(gateway.list_themes())?;

    if themes.is_empty() {
        tracing::warn!("[{}] Missing themes in {}", config.env, config.store);
        return Ok(());
    }

    println!("[{}] Available themes:", config.env);
    for theme in themes {
        if theme.active {
            println!("  [{}]\t{} {}", theme.id, theme.name, "(Active)".green());
        } else {
            println!("  [{}]\t{}", theme.id, theme.name);
        }
    }
    Ok(())
}
