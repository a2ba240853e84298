//! Render error types

use thiserror::Error;

/// Render operation result type
pub type RenderResult<T> = Result<T, RenderError>;

/// Render errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to parse font: {0}")]
    Font(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor(value.into())
    }
}
