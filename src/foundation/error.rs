/// Convenience result type used across Gogai.
pub type GogaiResult<T> = Result<T, GogaiError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GogaiError {
    /// Invalid user-provided configuration or style data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while compositing the newspaper raster.
    #[error("composition error: {0}")]
    Composition(String),

    /// Errors binding or writing the DOM overlay collaborator.
    #[error("overlay error: {0}")]
    Overlay(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GogaiError {
    /// Build a [`GogaiError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GogaiError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`GogaiError::Overlay`] value.
    pub fn overlay(msg: impl Into<String>) -> Self {
        Self::Overlay(msg.into())
    }
}
