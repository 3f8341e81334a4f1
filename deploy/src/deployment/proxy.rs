//! Certificate proxy companion
//!
//! A separate project that runs nginx-proxy with the Let's Encrypt companion.
//! Its failure does not stop the primary stack.

use std::path::{Path, PathBuf};
use tracing::info;

use super::at_step;
use crate::error::{DeployStep, Result};
use crate::system::{CommandRunner, Invocation};
use crate::vcs;

const SAMPLE_ENV: &str = ".env.sample";
const LOCAL_ENV: &str = ".env";
const START_SCRIPT: &str = "./start.sh";

/// Clone the proxy into `dest`, seed its `.env` and run its start script
pub async fn start_certificate_proxy(
    runner: &dyn CommandRunner,
    repo_url: &str,
    dest: &Path,
) -> Result<PathBuf> {
    let step = DeployStep::CertificateProxy;
    let dir = vcs::clone_repository(runner, repo_url, dest)
        .await
        .map_err(at_step(step))?;

    seed_local_env(&dir).map_err(at_step(step))?;

    let invocation = Invocation::new(START_SCRIPT).current_dir(&dir).quiet();
    runner
        .run(&invocation)
        .await
        .and_then(|outcome| outcome.check(&invocation))
        .map_err(at_step(step))?;

    info!("Certificate proxy started from {}", dir.display());
    Ok(dir)
}

/// Copy `.env.sample` to `.env` unless `.env` already exists
fn seed_local_env(dir: &Path) -> Result<bool> {
    let sample = dir.join(SAMPLE_ENV);
    let local = dir.join(LOCAL_ENV);
    if !sample.is_file() || local.exists() {
        return Ok(false);
    }
    std::fs::copy(&sample, &local)?;
    info!("Seeded {} from {}", local.display(), SAMPLE_ENV);
    Ok(true)
}
