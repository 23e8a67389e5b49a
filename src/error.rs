use thiserror::Error;
use std::io;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Traceback reached a cell none of the recurrence moves explains.
    // Aborts the query that hit it, never the engine.
    #[error("Alignment fault: {0}")]
    Alignment(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error conversions
impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn alignment<S: Into<String>>(msg: S) -> Self {
        Error::Alignment(msg.into())
    }

    /// True for internal-consistency faults, as opposed to bad input or config.
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, Error::Alignment(_))
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(format!("Thread pool build failed: {}", err))
    }
}
