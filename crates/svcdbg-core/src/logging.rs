//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/svcdbg/logs/` because the terminal belongs
/// to the TUI. Log level is controlled by the `SVCDBG_LOG` environment variable.
///
/// # Examples
/// ```bash
/// SVCDBG_LOG=debug svcdbg
/// SVCDBG_LOG=svcdbg_app=trace svcdbg
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "svcdbg.log");

    let env_filter =
        EnvFilter::try_from_env("SVCDBG_LOG").unwrap_or_else(|_| EnvFilter::new("svcdbg=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Service debugger starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Directory holding logs, history and saved queries
pub fn data_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("svcdbg")
}

fn log_directory() -> PathBuf {
    data_directory().join("logs")
}
