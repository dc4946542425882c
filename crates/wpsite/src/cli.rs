//! Clap derive structures for the `wpsite` CLI.
//!
//! There are no subcommands: running `wpsite` starts the interactive
//! installer. Flags only tune output and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// wpsite -- scaffold a local WordPress site
#[derive(Debug, Parser)]
#[command(
    name = "wpsite",
    version,
    about = "Scaffold a local WordPress site",
    long_about = "Interactively creates a local WordPress site.\n\n\
        Asks for a folder name, site title and database name, then creates the\n\
        MySQL database, downloads WordPress with wp-cli, writes wp-config.php,\n\
        runs the installer, removes the bundled plugins and secures\n\
        https://<folder>.test with Laravel Herd."
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// When to use color output
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Path to the configuration file
    #[arg(long, env = "WPSITE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}
