//! Create a new theme on the store and persist its id.

use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{Gateway, ThemeApi};

/// Execute the init command.
///
/// Creates the named theme remotely, then writes the returned theme id
/// into `config.yml` under the current environment.
///
/// # Errors
///
/// Returns an error if required credentials are missing, the API rejects
/// the creation, or the config file cannot be written.
pub fn execute(name: &str, cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config, &cli.env, &cli.overrides(), false)?;
    let gateway = Gateway::new(&config.store, &config.apikey);

    let rt = super::runtime()?;
    let theme = rt.block_on(gateway.create_theme(name))?;

    let config = Config {
        theme_id: Some(theme.id),
        ..config
    };
    config.save(&cli.config)?;

    println!(
        "[{}] Theme [{}] \"{}\" has been created {}.",
        config.env,
        theme.id,
        theme.name,
        "successfully".green()
    );
    Ok(())
}
