//! Error types for rendering and image output.

use thiserror::Error;

/// Reasons a render cannot start.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    NoSamples,

    #[error("Thread count must be at least 1")]
    NoThreads,

    #[error("Jobs must cover at least one row or one tile pixel")]
    EmptyJob,

    #[error("Scene must be initialized before rendering")]
    SceneNotInitialized,
}

/// Errors that can occur while writing a rendered image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
