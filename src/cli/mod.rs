//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::sass::SassOutputStyle;

pub mod commands;

/// Themekit CLI - sync local theme files with a remote storefront theme
#[derive(Parser, Debug)]
#[command(name = "themekit", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API key used to connect to the store
    #[arg(short, long, global = true, env = "THEMEKIT_APIKEY")]
    pub apikey: Option<String>,

    /// Full domain of the store
    #[arg(short, long, global = true, env = "THEMEKIT_STORE")]
    pub store: Option<String>,

    /// ID of the theme
    #[arg(short, long, global = true, env = "THEMEKIT_THEME_ID")]
    pub theme_id: Option<u64>,

    /// Environment section of config.yml to use
    #[arg(short, long, global = true, default_value = "development")]
    pub env: String,

    /// Sass output style (nested, expanded, compact, compressed)
    #[arg(long, global = true, value_enum)]
    pub sass_output_style: Option<SassOutputStyle>,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.yml")]
    pub config: PathBuf,

    /// Exit non-zero when any file in a batch fails to sync
    #[arg(long, global = true)]
    pub strict: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Command-line overrides applied on top of config.yml.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            apikey: self.apikey.clone(),
            store: self.store.clone(),
            theme_id: self.theme_id,
            sass_output_style: self.sass_output_style,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new theme on the store and write its id to config.yml
    Init {
        /// Name of the theme to create
        #[arg(short, long)]
        name: String,
    },

    /// List all themes available on the store
    List,

    /// Pull the whole theme into the current directory and persist config.yml
    Checkout {
        /// Delete local theme files absent from the remote theme
        #[arg(long)]
        prune: bool,
    },

    /// Pull theme files from the store into the current directory
    Pull {
        /// Specific files to pull (default: all)
        filenames: Vec<String>,

        /// Delete local theme files absent from the remote theme
        #[arg(long)]
        prune: bool,
    },

    /// Push theme files from the current directory to the store
    Push {
        /// Specific files to push (default: all accepted files)
        filenames: Vec<String>,
    },

    /// Watch for file changes and push updates to the store
    Watch,

    /// Process Sass files to CSS files in the assets directory
    Sass,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
