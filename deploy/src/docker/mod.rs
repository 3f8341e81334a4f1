//! Docker Compose invocation
//!
//! Brings a compose project up and runs one-shot commands inside its services.

mod compose;

pub use compose::{ComposeFragment, ComposeSelection};

use std::path::PathBuf;
use tracing::info;

use crate::error::Result;
use crate::system::{CommandOutcome, CommandRunner, Invocation};

/// A compose project rooted at a checkout directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    pub name: String,
    pub directory: PathBuf,
    pub selection: ComposeSelection,
    /// Use `docker-compose` instead of `docker compose`
    pub legacy: bool,
}

impl ComposeProject {
    pub fn new(
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
        selection: ComposeSelection,
        legacy: bool,
    ) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            selection,
            legacy,
        }
    }

    /// Command shared by `up` and `exec`: program, project name and files
    fn base(&self) -> Invocation {
        let invocation = if self.legacy {
            Invocation::new("docker-compose")
        } else {
            Invocation::new("docker").arg("compose")
        };
        invocation
            .args(["--project-name", self.name.as_str()])
            .args(self.selection.file_args())
            .current_dir(&self.directory)
    }

    pub fn up_invocation(&self) -> Invocation {
        self.base().args(["up", "-d"])
    }

    pub fn exec_invocation(&self, service: &str, env: &[(&str, &str)], command: &[&str]) -> Invocation {
        let mut invocation = self.base().arg("exec");
        for (key, value) in env {
            invocation = invocation.arg("-e").arg(format!("{key}={value}"));
        }
        invocation.arg(service).args(command.iter().copied())
    }

    /// `compose up -d`, waiting for it to return
    pub async fn up(&self, runner: &dyn CommandRunner) -> Result<()> {
        let invocation = self.up_invocation();
        info!("Starting compose project {}", self.name);
        runner.run(&invocation).await?.check(&invocation)
    }

    /// Run `command` inside `service` with extra environment variables
    pub async fn exec(
        &self,
        runner: &dyn CommandRunner,
        service: &str,
        env: &[(&str, &str)],
        command: &[&str],
    ) -> Result<CommandOutcome> {
        let invocation = self.exec_invocation(service, env, command);
        info!("Executing {:?} in service {}", command, service);
        runner.run(&invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(legacy: bool) -> ComposeProject {
        ComposeProject::new("erpnext_docker", "/srv/frappe_docker", ComposeSelection::new(false), legacy)
    }

    #[test]
    fn test_up_invocation() {
        let inv = project(false).up_invocation();
        assert_eq!(
            inv.to_string(),
            "docker compose --project-name erpnext_docker \
             -f installation/docker-compose-frappe.yml \
             -f installation/docker-compose-erpnext.yml \
             -f installation/docker-compose-common.yml up -d"
        );
        assert_eq!(inv.cwd, Some(PathBuf::from("/srv/frappe_docker")));
    }

    #[test]
    fn test_legacy_binary() {
        let inv = project(true).up_invocation();
        assert_eq!(inv.program, "docker-compose");
        assert_eq!(inv.args[0], "--project-name");
    }

    #[test]
    fn test_exec_invocation_passes_env_before_service() {
        let inv = project(false).exec_invocation(
            "erpnext-python",
            &[("SITE_NAME", "shop.example.com"), ("INSTALL_ERPNEXT", "1")],
            &["docker-entrypoint.sh", "new"],
        );
        let tail: Vec<&str> = inv.args.iter().map(String::as_str).skip_while(|a| *a != "exec").collect();
        assert_eq!(
            tail,
            vec![
                "exec",
                "-e",
                "SITE_NAME=shop.example.com",
                "-e",
                "INSTALL_ERPNEXT=1",
                "erpnext-python",
                "docker-entrypoint.sh",
                "new",
            ]
        );
    }
}
