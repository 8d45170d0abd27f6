use thiserror::Error;

/// Errors surfaced by the segmenter and muxer.
///
/// Structural problems (bad stream type, undersized AC-3 sample, generator or
/// writer failures, missing configuration) are [`VdkError::Muxer`]. Anything
/// that went wrong while opening, writing or closing an output file is
/// [`VdkError::File`].
#[derive(Error, Debug)]
pub enum VdkError {
    /// Structural or state failure.
    #[error("muxer failure: {0}")]
    Muxer(String),

    /// Output file could not be opened, written or closed.
    #[error("file failure: {0}")]
    File(String),
}

impl VdkError {
    pub(crate) fn muxer(msg: impl Into<String>) -> Self {
        VdkError::Muxer(msg.into())
    }

    pub(crate) fn file(msg: impl Into<String>) -> Self {
        VdkError::File(msg.into())
    }

    /// True for structural / protocol-level failures.
    pub fn is_muxer_failure(&self) -> bool {
        matches!(self, VdkError::Muxer(_))
    }

    /// True for I/O-level failures.
    pub fn is_file_failure(&self) -> bool {
        matches!(self, VdkError::File(_))
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, VdkError>;
