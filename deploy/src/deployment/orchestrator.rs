//! Deployment orchestrator
//!
//! Requires a confirmed configuration and an existing account. Every external
//! call is awaited before the next one starts; nothing is rolled back on
//! failure, so a partly started stack keeps running.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{at_step, start_certificate_proxy};
use crate::config::{ConfirmedConfiguration, InstallerSettings, split_sites};
use crate::docker::{ComposeProject, ComposeSelection};
use crate::envfile::{self, EnvFile};
use crate::error::{DeployStep, InstallError, Result};
use crate::prompt::{self, Prompter};
use crate::system::validation::validate_project_name;
use crate::system::{CommandRunner, Invocation, SystemAccount};
use crate::vcs;

/// Application service the initialization command runs in
pub const APP_SERVICE: &str = "erpnext-python";
/// One-shot site creation command
pub const INIT_COMMAND: [&str; 2] = ["docker-entrypoint.sh", "new"];
/// Environment flag asking the initialization to install the application
pub const INSTALL_APP_FLAG: (&str, &str) = ("INSTALL_ERPNEXT", "1");
const SITE_NAME: &str = "SITE_NAME";

/// A running stack
#[derive(Debug, Clone)]
pub struct Deployment {
    pub project: ComposeProject,
    /// Environment file inside the deployment checkout
    pub env_path: PathBuf,
    /// Recoverable failures met on the way
    pub warnings: Vec<String>,
}

/// Brings the stack up and initializes the site
pub struct DeploymentOrchestrator<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
    settings: &'a InstallerSettings,
}

impl<'a> DeploymentOrchestrator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        prompter: &'a mut dyn Prompter,
        settings: &'a InstallerSettings,
    ) -> Self {
        Self {
            runner,
            prompter,
            settings,
        }
    }

    /// Directory the projects are cloned into
    pub fn work_dir(&self, account: &SystemAccount) -> PathBuf {
        self.settings
            .work_dir
            .clone()
            .unwrap_or_else(|| account.home.clone())
    }

    /// Start the certificate proxy when needed, then the primary stack
    pub async fn deploy(
        &mut self,
        confirmed: &ConfirmedConfiguration,
        account: &SystemAccount,
    ) -> Result<Deployment> {
        let config = confirmed.config();
        let work_dir = self.work_dir(account);
        std::fs::create_dir_all(&work_dir).map_err(|e| at_step(DeployStep::Stack)(e.into()))?;
        let mut warnings = Vec::new();

        if config.setup_networking() && config.setup_letsencrypt() {
            self.prompter.say("🔒 Starting the certificate proxy...");
            let dest = work_dir.join(InstallerSettings::checkout_name(&self.settings.proxy_repo_url));
            match start_certificate_proxy(self.runner, &self.settings.proxy_repo_url, &dest).await {
                Ok(dir) => {
                    self.hand_over(&dir, account).await;
                    self.prompter.say("✅ Certificate proxy started");
                }
                Err(e) if e.is_recoverable() => {
                    warn!("{}", e);
                    self.prompter.say(&format!(
                        "⚠️  {e}\n   Continuing without automatic certificates."
                    ));
                    warnings.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let project = self.start_stack(confirmed, account, &work_dir).await?;
        let env_path = project.directory.join(".env");

        Ok(Deployment {
            project,
            env_path,
            warnings,
        })
    }

    async fn start_stack(
        &mut self,
        confirmed: &ConfirmedConfiguration,
        account: &SystemAccount,
        work_dir: &Path,
    ) -> Result<ComposeProject> {
        let step = DeployStep::Stack;
        let repo_url = &self.settings.deploy_repo_url;
        let dest = work_dir.join(InstallerSettings::checkout_name(repo_url));

        self.prompter.say(&format!("📦 Fetching {repo_url}..."));
        let directory = vcs::clone_repository(self.runner, repo_url, &dest)
            .await
            .map_err(at_step(step))?;

        envfile::write_atomically(&directory.join(".env"), confirmed.snapshot())
            .map_err(at_step(step))?;
        self.hand_over(&directory, account).await;

        let name = prompt::ask_required(
            self.prompter,
            "Project name",
            &self.settings.default_project_name,
            validate_project_name,
        )?;

        let selection = ComposeSelection::for_configuration(confirmed.config());
        let project = ComposeProject::new(name, directory, selection, self.settings.legacy_compose);

        self.prompter
            .say(&format!("🐳 Starting compose project '{}'...", project.name));
        project.up(self.runner).await.map_err(at_step(step))?;
        info!(
            project = %project.name,
            fragments = project.selection.fragments().len(),
            "Compose stack started"
        );
        self.prompter.say("✅ Containers started");

        Ok(project)
    }

    /// Create the site inside the running application service.
    ///
    /// `SITES` is read again from the deployed environment file, which may have
    /// been edited in the checkout since the wizard wrote it.
    pub async fn initialize(&mut self, deployment: &Deployment) -> Result<String> {
        let step = DeployStep::Initialization;
        let env = EnvFile::load(&deployment.env_path).map_err(at_step(step))?;
        let sites = env.get(envfile::SITES);
        let site = split_sites(sites)
            .first()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                InstallError::deployment(
                    step,
                    format!("no site configured in {}", deployment.env_path.display()),
                )
            })?;

        self.prompter
            .say(&format!("🛠️  Creating site '{site}'. This can take a few minutes..."));
        let env_vars = [(SITE_NAME, site.as_str()), INSTALL_APP_FLAG];
        let outcome = deployment
            .project
            .exec(self.runner, APP_SERVICE, &env_vars, &INIT_COMMAND)
            .await
            .map_err(at_step(step))?;

        if !outcome.is_success() {
            let detail = match outcome.code {
                Some(code) => format!("site creation exited with status {code}"),
                None => "site creation terminated by signal".to_string(),
            };
            return Err(InstallError::deployment(step, detail));
        }

        info!(site = %site, "Site initialized");
        self.prompter.say(&format!("✅ Site '{site}' created"));
        Ok(site)
    }

    /// Give the account ownership of `dir`; failure only warns
    async fn hand_over(&self, dir: &Path, account: &SystemAccount) {
        // `user:` also sets the group to the user's login group
        let owner = format!("{}:", account.username);
        let invocation = Invocation::new("chown")
            .args(["-R", owner.as_str()])
            .arg(dir.to_string_lossy())
            .quiet();
        let result = self
            .runner
            .run(&invocation)
            .await
            .and_then(|outcome| outcome.check(&invocation));
        if let Err(e) = result {
            warn!("Could not hand {} over to {}: {}", dir.display(), account.username, e);
        }
    }
}
