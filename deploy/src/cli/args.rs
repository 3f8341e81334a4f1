//! Command line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Interactive installer for a single-host ERPNext docker deployment.
///
/// Everything is asked interactively; the flags only tune the installer itself.
#[derive(Parser, Debug)]
#[command(name = "easy-install", version)]
#[command(about = "Interactive installer for a single-host ERPNext docker deployment")]
pub struct Cli {
    /// Installer settings file (TOML)
    #[arg(long, env = "EASY_INSTALL_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
