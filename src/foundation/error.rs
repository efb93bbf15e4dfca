/// Convenience result type used across Narrata.
pub type NarrataResult<T> = Result<T, NarrataError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum NarrataError {
    /// Missing or invalid caller-provided input (text, audio file, background).
    #[error("input error: {0}")]
    Input(String),

    /// Timing cannot be computed (no words, non-positive audio duration).
    #[error("scheduling error: {0}")]
    Scheduling(String),

    /// The external media engine finished unsuccessfully.
    ///
    /// Any file left at the output path must be treated as invalid.
    #[error("render failure: engine exited with {status}: {diagnostics}")]
    Render {
        /// Exit status as reported by the engine process.
        status: String,
        /// Captured diagnostic output (stderr), trimmed.
        diagnostics: String,
    },

    /// The engine invocation was aborted by cancellation or timeout.
    #[error("render cancelled: {0}")]
    Cancelled(String),

    /// Errors when serializing or deserializing requests and configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NarrataError {
    /// Build a [`NarrataError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`NarrataError::Scheduling`] value.
    pub fn scheduling(msg: impl Into<String>) -> Self {
        Self::Scheduling(msg.into())
    }

    /// Build a [`NarrataError::Render`] value.
    pub fn render(status: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::Render {
            status: status.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Build a [`NarrataError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Build a [`NarrataError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors raised before the media engine was invoked.
    pub fn is_pre_render(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Scheduling(_) | Self::Serde(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
