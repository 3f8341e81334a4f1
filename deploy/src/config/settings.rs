//! Installer settings
//!
//! Every field has a default, so the installer runs without a settings file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InstallError, Result};
use crate::system::validation::{validate_project_name, validate_username};

/// Locations, names and URLs the installer works with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerSettings {
    /// Environment file read and written by the wizard
    pub env_file: PathBuf,
    /// Template downloaded when `env_file` does not exist
    pub env_template_url: String,
    /// Docker convenience install script
    pub docker_install_url: String,
    /// Primary deployment project
    pub deploy_repo_url: String,
    /// Certificate proxy companion project
    pub proxy_repo_url: String,
    /// Where projects are cloned; the account's home directory when unset
    pub work_dir: Option<PathBuf>,
    pub default_username: String,
    pub default_project_name: String,
    /// Group granting access to the container runtime
    pub docker_group: String,
    pub login_shell: String,
    /// Use `docker-compose` instead of `docker compose`
    pub legacy_compose: bool,
    /// Also write logs to files in this directory
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            env_template_url:
                "https://raw.githubusercontent.com/frappe/frappe_docker/main/env-production"
                    .to_string(),
            docker_install_url: "https://get.docker.com".to_string(),
            deploy_repo_url: "https://github.com/frappe/frappe_docker.git".to_string(),
            proxy_repo_url:
                "https://github.com/evertramos/docker-compose-letsencrypt-nginx-proxy-companion.git"
                    .to_string(),
            work_dir: None,
            default_username: "frappe".to_string(),
            default_project_name: "erpnext_docker".to_string(),
            docker_group: "docker".to_string(),
            login_shell: "/bin/bash".to_string(),
            legacy_compose: false,
            log_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl InstallerSettings {
    /// Load settings from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            InstallError::Settings(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults are offered as prompt answers, so they must pass the same checks
    pub fn validate(&self) -> Result<()> {
        validate_username(&self.default_username)
            .map_err(|reason| InstallError::invalid("default_username", reason))?;
        validate_project_name(&self.default_project_name)
            .map_err(|reason| InstallError::invalid("default_project_name", reason))?;
        if self.docker_group.trim().is_empty() {
            return Err(InstallError::invalid("docker_group", "must not be empty"));
        }
        Ok(())
    }

    /// Directory name a repository is cloned into
    pub fn checkout_name(repo_url: &str) -> &str {
        let trimmed = repo_url.trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
        name.strip_suffix(".git").unwrap_or(name)
    }
}
