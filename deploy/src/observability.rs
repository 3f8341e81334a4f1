//! Logging setup
//!
//! Console logs go to stderr so they never interleave with prompts on stdout.
//! `RUST_LOG` takes precedence over the configured level.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::error::Result;

/// Keeps the file log writer alive for the whole run
#[derive(Default)]
pub struct ObservabilityGuard {
    _log_guard: Option<WorkerGuard>,
}

/// Initialize logging with `level` as the fallback filter
pub fn init_observability(level: &str, log_dir: Option<&Path>) -> Result<ObservabilityGuard> {
    let mut guard = ObservabilityGuard::default();

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, "easy-install.log");
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard._log_guard = Some(worker_guard);
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(writer),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(create_env_filter(level))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .ok();

    Ok(guard)
}

/// Create an EnvFilter, with RUST_LOG taking precedence
fn create_env_filter(level: &str) -> EnvFilter {
    let directive = std::env::var("RUST_LOG")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| level.to_string());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!(
            "Failed to parse filter directive: {}. Falling back to default: info",
            directive
        );
        EnvFilter::new("info")
    })
}
