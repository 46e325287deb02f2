//! CLI logging setup: `HM51_LOG` env filter, daily-rotating file under the
//! data directory's `logs/`. Logging never goes to the terminal; that is
//! reserved for command output.

use hm51_core::StorageConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initializes tracing. The returned guard must live for the process
/// lifetime so buffered log lines flush on exit. Returns `None` when the log
/// directory cannot be created; commands still run, just unlogged.
pub fn init(config: &StorageConfig) -> Option<WorkerGuard> {
    if config.ensure_dirs().is_err() {
        return None;
    }

    let filter = EnvFilter::try_from_env("HM51_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let appender = tracing_appender::rolling::daily(config.logs_dir(), "hm51.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
