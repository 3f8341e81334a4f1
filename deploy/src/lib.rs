//! Interactive installer for a single-host multi-container deployment
//!
//! Stages run in a fixed order (see [`pipeline`]): prerequisite checks, the
//! configuration wizard, system account provisioning, compose bring-up and a
//! one-shot site initialization inside the application container.

pub mod cli;
pub mod config;
pub mod deployment;
pub mod docker;
pub mod envfile;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod prompt;
pub mod system;
pub mod vcs;

pub use error::{DeployStep, InstallError, Result};
pub use pipeline::{InstallSummary, Installer, Stage};
