//! Error types for analyzer processes.

use layered_knp::KnpError;
use thiserror::Error;

/// Errors that can occur while driving an analyzer.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The child could not be started, or it exited. It has been restarted
    /// if possible; the request is not retried.
    #[error("{analyzer} is not available: {reason}")]
    AnalyzerUnavailable { analyzer: String, reason: String },

    /// No complete reply within the deadline. The child was killed and restarted.
    #[error("{analyzer} did not answer within {timeout_secs}s")]
    AnalyzerTimeout { analyzer: String, timeout_secs: u64 },

    /// Error reading a configuration file.
    #[error("invalid configuration: {path}: {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The analyzer answered with text that does not parse.
    #[error(transparent)]
    Knp(#[from] KnpError),
}

/// Result type for analyzer operations.
pub type ProcessorResult<T> = Result<T, ProcessorError>;
