//! Error types for parsing and navigating KNP / Juman++ analyses.
//!
//! Structural problems (a line that fits no grammar, a layer that was
//! never parsed) are returned as errors. Reference problems inside an
//! otherwise well-formed analysis (an out-of-range rel target, an unknown
//! label) are built as values of the same enum and reported through
//! [`warn`] so callers see one vocabulary for both.

use thiserror::Error;

/// Errors that can occur while reading, building or walking a document.
#[derive(Debug, Error)]
pub enum KnpError {
    /// A line matching no expected grammar at its position.
    #[error("malformed line: {line:?} ({reason})")]
    MalformedLine { line: String, reason: String },

    /// An accessor was called before the layer exists.
    #[error("{layer} layer is not available for this {unit}")]
    LayerNotAvailable {
        layer: &'static str,
        unit: &'static str,
    },

    /// A unit was asked for a container it has not been attached to.
    #[error("this {unit} is not attached to a {container}")]
    NotAttached {
        unit: &'static str,
        container: &'static str,
    },

    /// A rel or PAS tag references a sentence or base phrase that does not exist.
    #[error("{sid}: index out of range: {message}")]
    IndexOutOfRange { sid: String, message: String },

    /// A label outside one of the closed vocabularies.
    #[error("unknown {kind} label: {label:?}")]
    UnknownLabel { kind: &'static str, label: String },

    /// A rel or PAS target surface does not match the referenced base phrase.
    #[error("{sid}: target mismatch: {expected:?} vs {found:?}")]
    SurfaceMismatch {
        sid: String,
        expected: String,
        found: String,
    },

    /// `get_or_create_entity` asked for an eid that is already taken.
    #[error("entity id {requested} is already taken; assigned {assigned}")]
    DuplicateEid { requested: u32, assigned: u32 },

    /// Failure of the underlying reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl KnpError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        KnpError::MalformedLine {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for KNP operations.
pub type KnpResult<T> = Result<T, KnpError>;

/// Report a recoverable problem. The offending tag is skipped by the caller.
pub(crate) fn warn(error: KnpError) {
    tracing::warn!("{}", error);
}
