//! Prerequisite checks
//!
//! Privileges, git and docker are hard requirements and fail the run. A
//! missing environment file only produces a warning: the wizard falls back to
//! empty defaults.

use std::path::Path;
use tracing::{info, warn};

use super::check_result::{CheckItem, PrerequisiteReport};
use super::fetch::Fetcher;
use super::provider::SystemProvider;
use crate::config::InstallerSettings;
use crate::envfile;
use crate::error::{InstallError, Result};
use crate::prompt::{self, Prompter};

const GIT: &str = "git";
const DOCKER: &str = "docker";

/// Outcome of the environment file check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileStatus {
    /// The file was already there
    Present,
    /// A template was downloaded
    Downloaded,
    /// No file; the wizard starts from empty defaults
    Missing,
}

/// Verifies the host before anything is configured
pub struct PrerequisiteChecker<'a> {
    provider: &'a dyn SystemProvider,
    fetcher: &'a dyn Fetcher,
    settings: &'a InstallerSettings,
    report: PrerequisiteReport,
}

impl<'a> PrerequisiteChecker<'a> {
    pub fn new(
        provider: &'a dyn SystemProvider,
        fetcher: &'a dyn Fetcher,
        settings: &'a InstallerSettings,
    ) -> Self {
        Self {
            provider,
            fetcher,
            settings,
            report: PrerequisiteReport::new(),
        }
    }

    /// Run every check in order, failing fast on the first hard failure
    pub async fn run_all(&mut self, prompter: &mut dyn Prompter) -> Result<PrerequisiteReport> {
        self.require_privileged_execution()?;
        self.require_version_control_tool()?;
        self.require_container_runtime(prompter).await?;
        let env_file = self.settings.env_file.clone();
        self.require_environment_file(prompter, &env_file).await?;
        Ok(std::mem::take(&mut self.report))
    }

    pub fn require_privileged_execution(&mut self) -> Result<()> {
        if self.provider.is_privileged() {
            self.report.add_item(CheckItem::ok("Privileges", "running as root"));
            Ok(())
        } else {
            self.report.add_item(CheckItem::error("Privileges", "not running as root"));
            Err(InstallError::Permission)
        }
    }

    pub fn require_version_control_tool(&mut self) -> Result<()> {
        if self.provider.command_exists(GIT) {
            self.report.add_item(CheckItem::ok("Command", GIT));
            Ok(())
        } else {
            self.report.add_item(CheckItem::error("Command", format!("{GIT} (missing)")));
            Err(InstallError::tool_missing(
                GIT,
                "install git with your package manager (e.g. apt-get install git)",
            ))
        }
    }

    /// Require docker, offering one install attempt through the convenience script
    pub async fn require_container_runtime(&mut self, prompter: &mut dyn Prompter) -> Result<()> {
        if self.provider.command_exists(DOCKER) {
            self.report.add_item(CheckItem::ok("Command", DOCKER));
            return Ok(());
        }

        let install = prompt::ask_yes_no(
            prompter,
            "Docker is not installed. Install it now with the official install script?",
        )?;
        if install {
            let url = &self.settings.docker_install_url;
            prompter.say(&format!("🔄 Installing docker from {url}..."));
            let attempt = match self.fetcher.fetch_text(url).await {
                Ok(script) => self.provider.run_shell_script(&script),
                Err(e) => Err(e),
            };
            if let Err(e) = attempt {
                warn!("Docker installation failed: {}", e);
                prompter.say(&format!("❌ Docker installation failed: {e}"));
            }
        }

        if self.provider.command_exists(DOCKER) {
            info!("Docker installed");
            self.report.add_item(CheckItem::ok("Command", format!("{DOCKER} (installed)")));
            Ok(())
        } else {
            self.report.add_item(CheckItem::error("Command", format!("{DOCKER} (missing)")));
            Err(InstallError::tool_missing(
                DOCKER,
                "install docker manually: https://docs.docker.com/engine/install/",
            ))
        }
    }

    /// Offer to download the environment template when `path` is missing. Never fails the run.
    pub async fn require_environment_file(
        &mut self,
        prompter: &mut dyn Prompter,
        path: &Path,
    ) -> Result<EnvFileStatus> {
        if path.exists() {
            self.report
                .add_item(CheckItem::ok("Environment file", path.display().to_string()));
            return Ok(EnvFileStatus::Present);
        }

        let download = prompt::ask_yes_no(
            prompter,
            &format!("No {} found. Download the template?", path.display()),
        )?;
        if download {
            let url = &self.settings.env_template_url;
            let saved = match self.fetcher.fetch_text(url).await {
                Ok(template) => envfile::write_atomically(path, &template),
                Err(e) => Err(e),
            };
            match saved {
                Ok(()) => {
                    info!("Environment template saved to {}", path.display());
                    self.report.add_item(CheckItem::ok(
                        "Environment file",
                        format!("{} (downloaded)", path.display()),
                    ));
                    return Ok(EnvFileStatus::Downloaded);
                }
                Err(e) => {
                    warn!("Could not download environment template: {}", e);
                    prompter.say(&format!("⚠️  Could not download the template: {e}"));
                }
            }
        }

        self.report.add_item(CheckItem::warning(
            "Environment file",
            format!("{} missing, starting from empty defaults", path.display()),
        ));
        Ok(EnvFileStatus::Missing)
    }
}
