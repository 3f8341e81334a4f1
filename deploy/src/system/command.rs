//! External process invocation
//!
//! Cloning, compose and in-container commands all go through
//! [`CommandRunner`]. Each invocation is awaited before the next one starts.

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{InstallError, Result};

/// A command line to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Discard output instead of attaching it to the terminal
    pub quiet: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            quiet: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandOutcome {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into an error naming the invocation
    pub fn check(self, invocation: &Invocation) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        let detail = match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        };
        Err(InstallError::command(invocation.to_string(), detail))
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` and wait for it. Spawn failures are errors; a non-zero
    /// exit is reported through the outcome.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome>;
}

/// Runs commands as child processes of the installer
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn spinner(invocation: &Invocation) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(invocation.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        info!("Running {}", invocation);
        if let Some(cwd) = &invocation.cwd {
            debug!("  in {}", cwd.display());
        }

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }
        if invocation.quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let spinner = invocation.quiet.then(|| Self::spinner(invocation));
        let status = command.status().await;
        if let Some(bar) = spinner {
            bar.finish_and_clear();
        }

        let status =
            status.map_err(|e| InstallError::command(invocation.to_string(), e.to_string()))?;
        debug!("{} finished with {}", invocation, status);
        Ok(CommandOutcome {
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder_and_display() {
        let inv = Invocation::new("docker")
            .args(["compose", "up"])
            .arg("-d")
            .current_dir("/srv/frappe_docker")
            .quiet();

        assert_eq!(inv.to_string(), "docker compose up -d");
        assert_eq!(inv.cwd, Some(PathBuf::from("/srv/frappe_docker")));
        assert!(inv.quiet);
    }

    #[test]
    fn test_outcome_check() {
        let inv = Invocation::new("git").arg("clone");
        assert!(CommandOutcome::success().check(&inv).is_ok());

        let err = CommandOutcome::failure(128).check(&inv).unwrap_err();
        assert_eq!(err.to_string(), "Command `git clone` failed: exited with status 128");

        let err = CommandOutcome { code: None }.check(&inv).unwrap_err();
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[tokio::test]
    async fn test_process_runner_reports_exit_code() {
        let runner = ProcessRunner::new();
        let ok = runner.run(&Invocation::new("true").quiet()).await.unwrap();
        assert!(ok.is_success());

        let failed = runner.run(&Invocation::new("false").quiet()).await.unwrap();
        assert!(!failed.is_success());

        let missing = runner
            .run(&Invocation::new("definitely-not-a-real-binary-3f9a").quiet())
            .await;
        assert!(matches!(missing, Err(InstallError::Command { .. })));
    }
}
