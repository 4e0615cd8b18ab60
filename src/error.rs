//! Error handling for the detection pipeline and its I/O collaborators.

use std::fmt;

/// Result type for pyrowatch operations
pub type PyroResult<T> = Result<T, PyroError>;

/// Errors that can occur while acquiring, processing, or displaying frames
#[derive(Debug)]
pub enum PyroError {
    /// Frame source failed to deliver a usable frame
    FrameSource(String),
    /// Renderer failed to display a frame
    Render(String),
    /// Input source failed
    Input(String),
    /// Invalid configuration error
    InvalidConfiguration(String),
    /// Image decoding/encoding error
    Image(image::ImageError),
    /// Underlying I/O error
    Io(std::io::Error),
    /// Generic pipeline error
    Other(String),
}

impl fmt::Display for PyroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyroError::FrameSource(msg) => write!(f, "Frame source error: {}", msg),
            PyroError::Render(msg) => write!(f, "Render error: {}", msg),
            PyroError::Input(msg) => write!(f, "Input error: {}", msg),
            PyroError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            PyroError::Image(err) => write!(f, "Image error: {}", err),
            PyroError::Io(err) => write!(f, "I/O error: {}", err),
            PyroError::Other(msg) => write!(f, "Pipeline error: {}", msg),
        }
    }
}

impl std::error::Error for PyroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PyroError::Image(err) => Some(err),
            PyroError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for PyroError {
    fn from(err: image::ImageError) -> Self {
        PyroError::Image(err)
    }
}

impl From<std::io::Error> for PyroError {
    fn from(err: std::io::Error) -> Self {
        PyroError::Io(err)
    }
}
