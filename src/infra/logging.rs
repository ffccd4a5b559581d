use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::infra::{error::AppError, storage_layout::StorageLayout};

/// Initializes tracing into a file under the storage directory; the
/// terminal itself belongs to the TUI. The returned guard must live
/// for the whole process so buffered lines are flushed on exit.
pub fn init(layout: &StorageLayout) -> Result<WorkerGuard, AppError> {
    let appender = tracing_appender::rolling::never(&layout.storage_dir, layout.log_file_name());
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .try_init()
        .map_err(AppError::LoggingInit)?;

    Ok(guard)
}
