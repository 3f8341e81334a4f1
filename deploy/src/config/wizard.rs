//! Interactive configuration wizard
//!
//! Linear steps: load defaults, networking, certificates, version, then a
//! confirmation loop that only ends on an empty answer. The confirmed result is
//! written back to the environment file once.

use std::path::PathBuf;
use tracing::{debug, info};

use super::{Configuration, ConfirmedConfiguration, Exposure, InstallVersion};
use crate::envfile::{self, EnvFile};
use crate::error::{InstallError, Result};
use crate::prompt::{self, Prompter};
use crate::system::validation::{validate_email, validate_sites};

/// Defaults read from the environment file; empty when not configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardDefaults {
    pub mysql_root_password: String,
    pub sites: String,
    pub letsencrypt_email: String,
}

impl WizardDefaults {
    pub fn from_env(env: &EnvFile) -> Self {
        Self {
            mysql_root_password: env.get(envfile::MYSQL_ROOT_PASSWORD).to_string(),
            sites: env.get(envfile::SITES).to_string(),
            letsencrypt_email: env.get(envfile::LETSENCRYPT_EMAIL).to_string(),
        }
    }

    /// Values of a rejected round become the defaults of the next one
    fn from_rejected(config: &Configuration, previous: &WizardDefaults) -> Self {
        Self {
            mysql_root_password: config.mysql_root_password.clone(),
            sites: config.sites.clone(),
            letsencrypt_email: config
                .letsencrypt_email()
                .unwrap_or(&previous.letsencrypt_email)
                .to_string(),
        }
    }
}

/// Produces a confirmed [`Configuration`] through the terminal
pub struct ConfigWizard<'a> {
    prompter: &'a mut dyn Prompter,
    env_path: PathBuf,
}

impl<'a> ConfigWizard<'a> {
    pub fn new(prompter: &'a mut dyn Prompter, env_path: impl Into<PathBuf>) -> Self {
        Self {
            prompter,
            env_path: env_path.into(),
        }
    }

    pub fn run(&mut self) -> Result<ConfirmedConfiguration> {
        self.prompter.say("⚙️  Configuration\n================");

        let env = EnvFile::load_or_default(&self.env_path)?;
        let mut defaults = WizardDefaults::from_env(&env);
        debug!(
            version = %env.get(envfile::VERSION),
            sites = %defaults.sites,
            has_password = !defaults.mysql_root_password.is_empty(),
            has_email = !defaults.letsencrypt_email.is_empty(),
            "Loaded wizard defaults from {}",
            self.env_path.display()
        );

        let setup_networking =
            prompt::ask_yes_no(self.prompter, "Do you want to set up networking?")?;

        // Only offered with networking and a previously configured email
        let setup_letsencrypt = if setup_networking && !defaults.letsencrypt_email.is_empty() {
            prompt::ask_yes_no(
                self.prompter,
                "Do you want to set up Let's Encrypt certificates?",
            )?
        } else {
            false
        };
        debug!(setup_networking, setup_letsencrypt, "Networking decided");

        let install_version = self.choose_version()?;

        let mut round = 1u32;
        let config = loop {
            let config =
                self.collect_round(&defaults, install_version, setup_networking, setup_letsencrypt)?;
            self.prompter.say(&config.summary());

            let answer = self
                .prompter
                .line("Press Enter to confirm, or type anything to change the values")?;
            if answer.is_empty() {
                break config;
            }

            debug!(round, "{}", InstallError::ConfigurationRejected);
            defaults = WizardDefaults::from_rejected(&config, &defaults);
            round += 1;
        };

        self.persist(config)
    }

    fn choose_version(&mut self) -> Result<InstallVersion> {
        let options: Vec<&str> = InstallVersion::ALL.iter().map(|v| v.as_str()).collect();
        let index = prompt::ask_menu(self.prompter, "Select the version to install:", &options)?;
        Ok(InstallVersion::ALL[index])
    }

    fn collect_round(
        &mut self,
        defaults: &WizardDefaults,
        install_version: InstallVersion,
        setup_networking: bool,
        setup_letsencrypt: bool,
    ) -> Result<Configuration> {
        let mysql_root_password = prompt::ask_required_secret(
            self.prompter,
            "MySQL root password",
            &defaults.mysql_root_password,
        )?;

        let sites = prompt::ask_required(
            self.prompter,
            "Site names (comma separated)",
            &defaults.sites,
            validate_sites,
        )?;

        let exposure = if setup_letsencrypt {
            let email = prompt::ask_required(
                self.prompter,
                "Let's Encrypt email",
                &defaults.letsencrypt_email,
                validate_email,
            )?;
            Exposure::PublicWithCertificates { email }
        } else if setup_networking {
            Exposure::Public
        } else {
            Exposure::Local
        };

        Ok(Configuration {
            install_version,
            mysql_root_password,
            sites,
            exposure,
        })
    }

    fn persist(&mut self, config: Configuration) -> Result<ConfirmedConfiguration> {
        let confirmed = config.confirm();
        envfile::write_atomically(&self.env_path, confirmed.snapshot())?;
        info!("Configuration saved to {}", self.env_path.display());
        self.prompter.say(&format!(
            "✅ Configuration saved to {}",
            self.env_path.display()
        ));
        Ok(confirmed)
    }
}
