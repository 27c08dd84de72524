/// Convenience result type used across screenstage.
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Top-level error taxonomy used by node and collaborator APIs.
///
/// Empty frames, unready layouts and end-of-stream are not errors: those paths yield `None`.
#[derive(thiserror::Error, Debug)]
pub enum ScreenError {
    /// A media asset could not be opened, probed or started.
    #[error("failed to open reader for '{asset}': {reason}")]
    ReaderOpen {
        /// Display form of the asset that failed.
        asset: String,
        /// Collaborator-provided failure description.
        reason: String,
    },

    /// Invalid caller-provided data (fonts, sizes, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while decoding pixels or frames.
    #[error("decode error: {0}")]
    Decode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScreenError {
    /// Build a [`ScreenError::ReaderOpen`] value.
    pub fn reader_open(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReaderOpen {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`ScreenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScreenError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Whether this error came from opening or starting a media reader.
    pub fn is_reader_open(&self) -> bool {
        matches!(self, Self::ReaderOpen { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
