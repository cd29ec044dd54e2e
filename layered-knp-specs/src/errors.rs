//! Error types for the fixture harness.

use thiserror::Error;

/// Errors that can occur while loading or checking fixtures.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A fixture that the document model rejects.
    #[error("parse error in {fixture}: {message}")]
    Parse { fixture: String, message: String },

    /// A fixture or failures file that cannot be read.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// A check that does not hold.
    #[error("assertion failed: {message}")]
    Assertion { message: String },
}

/// Result type for harness operations.
pub type SpecResult<T> = Result<T, SpecError>;
