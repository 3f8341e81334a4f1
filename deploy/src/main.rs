//! Installer entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use tracing::{error, info};

use easy_install::cli::Cli;
use easy_install::config::InstallerSettings;
use easy_install::observability::init_observability;
use easy_install::prompt::DialoguerPrompter;
use easy_install::system::{HttpFetcher, ProcessRunner, SystemProviderFactory};
use easy_install::{InstallSummary, Installer};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "❌".red(), e);
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = InstallerSettings::load(cli.settings.as_deref())
        .context("Failed to load installer settings")?;
    let level = if cli.debug { "debug" } else { settings.log_level.as_str() };
    let _guard = init_observability(level, settings.log_dir.as_deref())
        .context("Failed to initialize logging")?;

    // Interrupting a prompt ends the run; nothing is rolled back
    ctrlc::set_handler(|| {
        let _ = console::Term::stdout().show_cursor();
        eprintln!("\n⚠️  Installation interrupted");
        std::process::exit(130);
    })
    .context("Failed to install Ctrl+C handler")?;

    let provider = SystemProviderFactory::detect()?;
    info!("Using {} system provider", provider.name());
    let fetcher = HttpFetcher::new()?;
    let runner = ProcessRunner::new();
    let mut prompter = DialoguerPrompter::new();

    println!("{}", "🚀 ERPNext Easy Install".bright_cyan().bold());
    println!("═══════════════════════════════");

    let mut installer = Installer::new(&settings, provider.as_ref(), &fetcher, &runner, &mut prompter);
    match installer.run().await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("\n{} {}", "❌".red(), e.to_string().bright_red());
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}

fn print_summary(summary: &InstallSummary) {
    println!();
    println!("{}", "🎉 Installation complete!".bright_green().bold());
    println!("  • User: {}", summary.account.username);
    println!("  • Project: {}", summary.project_name);
    println!("  • Site: {}", summary.site);
    println!(
        "  • Compose files: {}",
        summary
            .selection
            .fragments()
            .iter()
            .map(|f| f.path())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if !summary.warnings.is_empty() {
        println!();
        println!("{}", "⚠️  Warnings:".bright_yellow());
        for warning in &summary.warnings {
            println!("  • {warning}");
        }
    }
}
