use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup failures. Any of these aborts before the event loop
/// starts, printed to stderr with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unable to resolve home directory")]
    HomeDirUnresolved,
    #[error("failed to create storage directory at {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("SLACK_TOKEN environment variable is not set")]
    MissingToken,
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to start async runtime: {0}")]
    RuntimeBuild(#[source] std::io::Error),
}
