//! Themekit CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use themekit::cli::commands;
use themekit::cli::{Cli, Commands};
use themekit::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Commands::Init { name } => commands::init::execute(name, cli),
        Commands::List => commands::list::execute(cli),
        Commands::Checkout { prune } => commands::pull::execute(&[], *prune, true, cli),
        Commands::Pull { filenames, prune } => {
            commands::pull::execute(filenames, *prune, false, cli)
        }
        Commands::Push { filenames } => commands::push::execute(filenames, cli),
        Commands::Watch => commands::watch::execute(cli),
        Commands::Sass => commands::sass::execute(cli),
        Commands::Completions { shell } => {
            commands::completions::execute(*shell);
            Ok(())
        }
    }
}
