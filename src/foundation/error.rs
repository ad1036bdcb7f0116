/// Convenience result type used across storyreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Degraded inputs (missing images, missing ambient bed, empty captions) never surface here; they
/// are absorbed and logged where they occur.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid caller-provided request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Narration audio is missing, undecodable, or has no duration. Never retried.
    #[error("fatal input: {0}")]
    FatalInput(String),

    /// The encoder could not be spawned, fed, or exited unsuccessfully.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::FatalInput`] value.
    pub fn fatal_input(msg: impl Into<String>) -> Self {
        Self::FatalInput(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for failures the artifact validator may retry with a safer encoder.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Encode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
