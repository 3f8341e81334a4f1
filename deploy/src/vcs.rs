//! Repository cloning

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::system::{CommandRunner, Invocation};

/// Clone `url` into `dest` and return the checkout directory.
///
/// A destination that already holds a git checkout is reused as is.
pub async fn clone_repository(runner: &dyn CommandRunner, url: &str, dest: &Path) -> Result<PathBuf> {
    if dest.join(".git").is_dir() {
        info!("Reusing existing checkout at {}", dest.display());
        return Ok(dest.to_path_buf());
    }

    let invocation = Invocation::new("git")
        .args(["clone", "--quiet", url])
        .arg(dest.to_string_lossy())
        .quiet();
    runner.run(&invocation).await?.check(&invocation)?;

    info!("Cloned {} into {}", url, dest.display());
    Ok(dest.to_path_buf())
}
