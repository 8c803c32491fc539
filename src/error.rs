//! Error types for PSD flattening

/// Errors produced while loading a document or writing output images
#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
