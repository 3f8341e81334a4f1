//! Host-facing stages and utilities

mod check_result;
mod command;
mod fetch;
mod prerequisites;
mod provider;
pub mod providers;
mod user_management;
pub mod validation;

// Public exports
pub use check_result::{CheckItem, CheckStatus, PrerequisiteReport};
pub use command::{CommandOutcome, CommandRunner, Invocation, ProcessRunner};
pub use fetch::{Fetcher, HttpFetcher};
pub use prerequisites::{EnvFileStatus, PrerequisiteChecker};
pub use provider::{SystemProvider, SystemProviderFactory};
pub use user_management::{AccountProvisioner, SystemAccount};
