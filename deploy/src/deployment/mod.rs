//! Deployment: certificate proxy, compose stack and site initialization

mod orchestrator;
mod proxy;

pub use orchestrator::{
    APP_SERVICE, Deployment, DeploymentOrchestrator, INIT_COMMAND, INSTALL_APP_FLAG,
};
pub use proxy::start_certificate_proxy;

use crate::error::{DeployStep, InstallError};

/// Attribute an error to a deployment step, keeping existing attributions
pub(crate) fn at_step(step: DeployStep) -> impl FnOnce(InstallError) -> InstallError {
    move |err| match err {
        InstallError::Deployment { .. } => err,
        other => InstallError::deployment(step, other.to_string()),
    }
}
