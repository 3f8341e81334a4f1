//! System account provisioning
//!
//! An existing account is reused untouched apart from group membership, which
//! is granted on every run.

use std::path::PathBuf;
use tracing::info;

use super::provider::{SystemProvider, provisioning_failure};
use super::validation::validate_username;
use crate::error::{InstallError, Result};
use crate::prompt::{self, Prompter};

/// OS account the deployment is operated under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemAccount {
    pub username: String,
    pub home: PathBuf,
    /// Whether this run created the account
    pub created: bool,
}

/// Ensures the deployment account and its group membership exist
pub struct AccountProvisioner<'a> {
    provider: &'a dyn SystemProvider,
    prompter: &'a mut dyn Prompter,
    group: String,
    shell: String,
}

impl<'a> AccountProvisioner<'a> {
    pub fn new(
        provider: &'a dyn SystemProvider,
        prompter: &'a mut dyn Prompter,
        group: impl Into<String>,
        shell: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            prompter,
            group: group.into(),
            shell: shell.into(),
        }
    }

    /// Ask which account to use
    pub fn prompt_username(&mut self, default: &str) -> Result<String> {
        prompt::ask_required(
            self.prompter,
            "Username to create or reuse for the deployment",
            default,
            validate_username,
        )
    }

    /// Make sure `username` exists and belongs to the privileged group
    pub fn ensure_account(&mut self, username: &str) -> Result<SystemAccount> {
        let created = if self.provider.user_exists(username) {
            info!("Reusing existing user {}", username);
            self.prompter
                .say(&format!("✅ User '{username}' already exists, reusing it"));
            false
        } else {
            self.create_account(username)?;
            true
        };

        self.ensure_group_membership(username)?;

        let home = self
            .provider
            .user_home(username)
            .unwrap_or_else(|| PathBuf::from("/home").join(username));

        Ok(SystemAccount {
            username: username.to_string(),
            home,
            created,
        })
    }

    fn create_account(&mut self, username: &str) -> Result<()> {
        let password = self.prompt_new_password(username)?;
        let hash = self
            .provider
            .hash_password(&password)
            .map_err(|e| provisioning_failure(username, e))?;

        self.provider
            .create_user(username, &hash, &self.shell)
            .map_err(|e| provisioning_failure(username, e))?;

        // Later stages assume the account exists
        if !self.provider.user_exists(username) {
            return Err(InstallError::provisioning(
                username,
                "account still missing after creation",
            ));
        }

        info!("Created user {}", username);
        self.prompter
            .say(&format!("✅ User '{username}' created successfully"));
        Ok(())
    }

    fn prompt_new_password(&mut self, username: &str) -> Result<String> {
        loop {
            let password = self
                .prompter
                .secret(&format!("Password for new user '{username}'"))?;
            if password.is_empty() {
                self.prompter.say("❌ The password must not be empty.");
                continue;
            }

            let again = self.prompter.secret("Retype the password")?;
            if password == again {
                return Ok(password);
            }
            self.prompter.say("❌ Passwords do not match, try again.");
        }
    }

    fn ensure_group_membership(&mut self, username: &str) -> Result<()> {
        let group = self.group.as_str();

        if !self.provider.group_exists(group) {
            self.provider
                .create_group(group)
                .map_err(|e| provisioning_failure(username, e))?;
            self.prompter
                .say(&format!("✅ Group '{group}' created successfully"));
        }

        if self.provider.user_in_group(username, group) {
            info!("User {} already in group {}", username, group);
        } else {
            self.provider
                .add_user_to_group(username, group)
                .map_err(|e| provisioning_failure(username, e))?;
            self.prompter
                .say(&format!("✅ User '{username}' added to group '{group}'"));
        }
        Ok(())
    }
}
