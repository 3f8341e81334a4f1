//! Installation pipeline
//!
//! ```text
//! Prerequisites ──→ Configuration ──→ Provisioning ──→ Deployment ──→ Initialization
//!                   (Confirmed)       (SystemAccount)   (Deployment)
//! ```
//!
//! Each stage consumes the previous stage's output by argument, so the
//! orchestrator can only run with a confirmed configuration and an account.

use colored::*;
use std::fmt;
use tracing::{Instrument, Span, info, info_span};

use crate::config::{ConfigWizard, ConfirmedConfiguration, InstallerSettings};
use crate::deployment::DeploymentOrchestrator;
use crate::docker::ComposeSelection;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::system::{
    AccountProvisioner, CommandRunner, Fetcher, PrerequisiteChecker, SystemAccount, SystemProvider,
};

/// Named pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prerequisites,
    Configuration,
    Provisioning,
    Deployment,
    Initialization,
}

impl Stage {
    /// Execution order
    pub const ORDER: [Stage; 5] = [
        Stage::Prerequisites,
        Stage::Configuration,
        Stage::Provisioning,
        Stage::Deployment,
        Stage::Initialization,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Prerequisites => "🔍 Checking prerequisites",
            Stage::Configuration => "⚙️  Configuring the deployment",
            Stage::Provisioning => "👤 Provisioning the system user",
            Stage::Deployment => "🚀 Deploying containers",
            Stage::Initialization => "🛠️  Initializing the site",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Prerequisites => "prerequisites",
            Stage::Configuration => "configuration",
            Stage::Provisioning => "provisioning",
            Stage::Deployment => "deployment",
            Stage::Initialization => "initialization",
        };
        f.write_str(name)
    }
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct InstallSummary {
    pub account: SystemAccount,
    pub project_name: String,
    pub selection: ComposeSelection,
    pub site: String,
    pub warnings: Vec<String>,
}

/// Collaborators for one installer run
pub struct Installer<'a> {
    settings: &'a InstallerSettings,
    provider: &'a dyn SystemProvider,
    fetcher: &'a dyn Fetcher,
    runner: &'a dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Installer<'a> {
    pub fn new(
        settings: &'a InstallerSettings,
        provider: &'a dyn SystemProvider,
        fetcher: &'a dyn Fetcher,
        runner: &'a dyn CommandRunner,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            settings,
            provider,
            fetcher,
            runner,
            prompter,
        }
    }

    /// Run all stages in [`Stage::ORDER`]
    pub async fn run(&mut self) -> Result<InstallSummary> {
        let mut warnings = Vec::new();

        self.enter(Stage::Prerequisites);
        let report = PrerequisiteChecker::new(self.provider, self.fetcher, self.settings)
            .run_all(self.prompter)
            .instrument(stage_span(Stage::Prerequisites))
            .await?;
        self.prompter.say(&report.render());
        warnings.extend(report.warnings().map(|item| format!("{}: {}", item.name, item.message)));

        self.enter(Stage::Configuration);
        let confirmed = self.configure()?;

        self.enter(Stage::Provisioning);
        let account = self.provision()?;

        self.enter(Stage::Deployment);
        let deployment = DeploymentOrchestrator::new(self.runner, self.prompter, self.settings)
            .deploy(&confirmed, &account)
            .instrument(stage_span(Stage::Deployment))
            .await?;
        warnings.extend(deployment.warnings.iter().cloned());

        self.enter(Stage::Initialization);
        let site = DeploymentOrchestrator::new(self.runner, self.prompter, self.settings)
            .initialize(&deployment)
            .instrument(stage_span(Stage::Initialization))
            .await?;

        Ok(InstallSummary {
            account,
            project_name: deployment.project.name.clone(),
            selection: deployment.project.selection.clone(),
            site,
            warnings,
        })
    }

    fn enter(&mut self, stage: Stage) {
        info!(stage = %stage, "Stage started");
        self.prompter.say("");
        self.prompter
            .say(&stage.title().bright_cyan().bold().to_string());
    }

    fn configure(&mut self) -> Result<ConfirmedConfiguration> {
        let _span = stage_span(Stage::Configuration).entered();
        ConfigWizard::new(self.prompter, &self.settings.env_file).run()
    }

    fn provision(&mut self) -> Result<SystemAccount> {
        let _span = stage_span(Stage::Provisioning).entered();
        let mut provisioner = AccountProvisioner::new(
            self.provider,
            self.prompter,
            &self.settings.docker_group,
            &self.settings.login_shell,
        );
        let username = provisioner.prompt_username(&self.settings.default_username)?;
        provisioner.ensure_account(&username)
    }
}

fn stage_span(stage: Stage) -> Span {
    info_span!("stage", name = %stage)
}
