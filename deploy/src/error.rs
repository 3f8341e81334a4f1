//! Error model for the installer
//!
//! Every stage returns [`InstallError`]. Only a certificate proxy failure and a
//! rejected configuration summary are recoverable; everything else ends the run
//! with exit code 1.

use std::fmt;
use thiserror::Error;

/// Deployment step that produced a [`InstallError::Deployment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    /// Cloning and starting the certificate proxy companion
    CertificateProxy,
    /// Cloning the primary project and bringing the compose stack up
    Stack,
    /// The one-shot command run inside the application container
    Initialization,
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStep::CertificateProxy => "certificate proxy bring-up",
            DeployStep::Stack => "stack bring-up",
            DeployStep::Initialization => "site initialization",
        };
        f.write_str(name)
    }
}

/// Installer error taxonomy
#[derive(Debug, Error)]
pub enum InstallError {
    // ========== Prerequisites ==========
    /// Not running with administrative rights
    #[error("This installer must be run as root (try again with sudo)")]
    Permission,

    /// A required external tool is absent after the best-effort install attempt
    #[error("Required tool '{tool}' is not available: {hint}")]
    ToolMissing { tool: String, hint: String },

    // ========== Provisioning ==========
    /// The system account could not be created or granted its group
    #[error(
        "Failed to provision user '{username}': {reason}\n   Create the user manually (useradd -m {username}) and re-run the installer"
    )]
    Provisioning { username: String, reason: String },

    // ========== Configuration ==========
    /// The user declined the configuration summary
    #[error("Configuration rejected by user")]
    ConfigurationRejected,

    /// Installer settings could not be loaded
    #[error("Settings error: {0}")]
    Settings(String),

    /// A value failed validation
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    // ========== Deployment ==========
    /// Proxy, stack or initialization failure
    #[error("Deployment failed during {step}: {message}")]
    Deployment { step: DeployStep, message: String },

    /// An external command exited unsuccessfully or could not be spawned
    #[error("Command `{command}` failed: {detail}")]
    Command { command: String, detail: String },

    // ========== Plumbing ==========
    /// Interactive prompt failure (closed terminal, interrupted input)
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Remote download failure
    #[error("Download failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// I/O operation failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for InstallError {
    fn from(err: dialoguer::Error) -> Self {
        InstallError::Prompt(err.to_string())
    }
}

impl From<toml::de::Error> for InstallError {
    fn from(err: toml::de::Error) -> Self {
        InstallError::Settings(err.to_string())
    }
}

/// Installer result type
pub type Result<T> = std::result::Result<T, InstallError>;

impl InstallError {
    pub fn tool_missing(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ToolMissing {
            tool: tool.into(),
            hint: hint.into(),
        }
    }

    pub fn provisioning(username: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Provisioning {
            username: username.into(),
            reason: reason.into(),
        }
    }

    pub fn deployment(step: DeployStep, message: impl Into<String>) -> Self {
        Self::Deployment {
            step,
            message: message.into(),
        }
    }

    pub fn command(command: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            detail: detail.into(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the run may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InstallError::ConfigurationRejected
                | InstallError::Deployment {
                    step: DeployStep::CertificateProxy,
                    ..
                }
        )
    }

    /// Process exit code for a fatal error
    pub fn exit_code(&self) -> u8 {
        1
    }
}
