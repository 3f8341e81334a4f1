//! Linux system provider
//!
//! Uses the shadow-utils commands (useradd, groupadd, usermod) and
//! `openssl passwd` for credential hashing. The installer runs as root, so
//! nothing is wrapped in sudo.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::system::provider::SystemProvider;

/// Linux system provider
pub struct LinuxProvider;

impl LinuxProvider {
    pub fn new() -> Self {
        Self
    }

    fn output(&self, command: &str, args: &[&str]) -> Result<Output> {
        debug!("Running {} {}", command, args.join(" "));
        Command::new(command)
            .args(args)
            .output()
            .map_err(|e| InstallError::command(describe(command, args), e.to_string()))
    }

    /// Run a command and check that it succeeded
    fn run_command(&self, command: &str, args: &[&str]) -> Result<()> {
        let output = self.output(command, args)?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(InstallError::command(
                describe(command, args),
                format!("{}: {}", output.status, stderr.trim()),
            ))
        }
    }

    /// Run a command with `input` on stdin and return its stdout
    fn run_with_stdin(&self, command: &str, args: &[&str], input: &str, capture: bool) -> Result<String> {
        let described = describe(command, args);
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(if capture { Stdio::piped() } else { Stdio::inherit() })
            .stderr(if capture { Stdio::piped() } else { Stdio::inherit() })
            .spawn()
            .map_err(|e| InstallError::command(&described, e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| InstallError::command(&described, e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| InstallError::command(&described, e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InstallError::command(
                described,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for LinuxProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProvider for LinuxProvider {
    fn name(&self) -> &'static str {
        "Linux"
    }

    // ========== Prerequisites ==========
    fn is_privileged(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }

    fn command_exists(&self, command: &str) -> bool {
        Command::new("which")
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn run_shell_script(&self, script: &str) -> Result<()> {
        info!("Running install script through sh");
        self.run_with_stdin("sh", &["-s"], script, false).map(|_| ())
    }

    // ========== Users and groups ==========
    fn user_exists(&self, username: &str) -> bool {
        users::get_user_by_name(username).is_some()
    }

    fn group_exists(&self, groupname: &str) -> bool {
        users::get_group_by_name(groupname).is_some()
    }

    fn user_in_group(&self, username: &str, groupname: &str) -> bool {
        let Some(user) = users::get_user_by_name(username) else {
            return false;
        };
        users::get_user_groups(user.name(), user.primary_group_id())
            .map(|groups| groups.iter().any(|g| g.name() == groupname))
            .unwrap_or(false)
    }

    fn user_home(&self, username: &str) -> Option<PathBuf> {
        use users::os::unix::UserExt;
        users::get_user_by_name(username).map(|user| user.home_dir().to_path_buf())
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        // Password goes through stdin so it never shows up in the process list
        let hash = self.run_with_stdin("openssl", &["passwd", "-6", "-stdin"], password, true)?;
        if hash.is_empty() {
            return Err(InstallError::command(
                "openssl passwd -6 -stdin",
                "produced an empty hash",
            ));
        }
        Ok(hash)
    }

    fn create_user(&self, username: &str, password_hash: &str, shell: &str) -> Result<()> {
        info!("Creating user {}", username);
        // The hash is an argument here; it is never logged
        self.run_command(
            "useradd",
            &["--create-home", "--shell", shell, "--password", password_hash, username],
        )
        .map_err(|e| InstallError::provisioning(username, strip_hash(e, password_hash)))
    }

    fn create_group(&self, groupname: &str) -> Result<()> {
        info!("Creating group {}", groupname);
        self.run_command("groupadd", &[groupname])
    }

    fn add_user_to_group(&self, username: &str, groupname: &str) -> Result<()> {
        info!("Adding user {} to group {}", username, groupname);
        self.run_command("usermod", &["--append", "--groups", groupname, username])
    }
}

fn describe(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

fn strip_hash(err: InstallError, password_hash: &str) -> String {
    err.to_string().replace(password_hash, "<hash>")
}
