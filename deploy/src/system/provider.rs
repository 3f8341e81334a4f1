//! Host operation abstraction
//!
//! Privilege checks, tool lookup and account management go through
//! [`SystemProvider`] so prerequisite checks and provisioning can run against an
//! in-memory host in tests.

use std::path::PathBuf;

use crate::error::{InstallError, Result};

/// Host-level operations used by the installer
pub trait SystemProvider {
    /// Name of the provider
    fn name(&self) -> &'static str;

    // ========== Prerequisites ==========
    /// Whether the process runs with administrative rights
    fn is_privileged(&self) -> bool;

    /// Whether `command` resolves on the PATH
    fn command_exists(&self, command: &str) -> bool;

    /// Run a shell script fed on stdin, waiting for it to finish
    fn run_shell_script(&self, script: &str) -> Result<()>;

    // ========== Users and groups ==========
    fn user_exists(&self, username: &str) -> bool;

    fn group_exists(&self, groupname: &str) -> bool;

    fn user_in_group(&self, username: &str, groupname: &str) -> bool;

    /// Home directory of an existing user
    fn user_home(&self, username: &str) -> Option<PathBuf>;

    /// Derive the credential hash stored for a new account
    fn hash_password(&self, password: &str) -> Result<String>;

    /// Create a login account with a home directory
    fn create_user(&self, username: &str, password_hash: &str, shell: &str) -> Result<()>;

    fn create_group(&self, groupname: &str) -> Result<()>;

    /// Add `username` to `groupname`; adding an existing member is a no-op
    fn add_user_to_group(&self, username: &str, groupname: &str) -> Result<()>;
}

/// System provider factory
pub struct SystemProviderFactory;

impl SystemProviderFactory {
    /// Provider for the current operating system
    pub fn detect() -> Result<Box<dyn SystemProvider>> {
        #[cfg(target_os = "linux")]
        {
            Ok(Box::new(super::providers::linux::LinuxProvider::new()))
        }

        #[cfg(not(target_os = "linux"))]
        {
            Err(InstallError::tool_missing(
                "linux",
                "this installer only supports Linux hosts",
            ))
        }
    }
}

/// Map a provider failure during account work to a provisioning error
pub(crate) fn provisioning_failure(username: &str, err: InstallError) -> InstallError {
    match err {
        InstallError::Provisioning { .. } => err,
        other => InstallError::provisioning(username, other.to_string()),
    }
}
