//! Picture subsystem error types

use dtext_render::RenderError;
use thiserror::Error;

/// Picture subsystem result type
pub type PictureResult<T> = Result<T, PictureError>;

/// Picture subsystem errors
#[derive(Debug, Error)]
pub enum PictureError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
