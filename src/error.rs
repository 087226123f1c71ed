use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Input file {} is unreadable: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Worker failed while processing chunk {chunk_index}: {message}")]
    WorkerFailed { chunk_index: usize, message: String },

    #[error("Processing cancelled by user")]
    Cancelled,

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
