use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a render before or after the pixel loop. Sampling degeneracies never show
/// up here; they only end the path they occur on.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render settings: {0}")]
    InvalidSettings(String),
    #[error("can't write image to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("png encoding failed")]
    Png(#[from] png::EncodingError),
}
