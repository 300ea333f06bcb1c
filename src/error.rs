//! Error type for the particle field.
//!
//! Surface and context failures are recoverable: the caller logs them and
//! leaves the animation uninitialised.

use std::fmt;

#[derive(Debug)]
pub enum FieldError {
    /// No drawing surface is registered under the requested id.
    SurfaceNotFound(String),
    /// The surface exists but refused to hand out a 2D context.
    ContextUnavailable,
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// Failed to read or write a file.
    Io(std::io::Error),
    /// Failed to parse a JSON configuration file.
    Config(serde_json::Error),
    /// Failed to encode a snapshot image.
    Image(image::ImageError),
    /// The native window could not be created or updated.
    Window(minifb::Error),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::SurfaceNotFound(id) => write!(f, "Canvas element not found: {}", id),
            FieldError::ContextUnavailable => write!(f, "Could not get 2D context from canvas"),
            FieldError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            FieldError::Io(e) => write!(f, "I/O error: {}", e),
            FieldError::Config(e) => write!(f, "Failed to parse configuration: {}", e),
            FieldError::Image(e) => write!(f, "Failed to write snapshot: {}", e),
            FieldError::Window(e) => write!(f, "Window error: {}", e),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::Io(e) => Some(e),
            FieldError::Config(e) => Some(e),
            FieldError::Image(e) => Some(e),
            FieldError::Window(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FieldError {
    fn from(e: std::io::Error) -> Self {
        FieldError::Io(e)
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(e: serde_json::Error) -> Self {
        FieldError::Config(e)
    }
}

impl From<image::ImageError> for FieldError {
    fn from(e: image::ImageError) -> Self {
        FieldError::Image(e)
    }
}

impl From<minifb::Error> for FieldError {
    fn from(e: minifb::Error) -> Self {
        FieldError::Window(e)
    }
}

pub type Result<T> = std::result::Result<T, FieldError>;
