//! Error types for the Lumen engine
//!
//! This module defines the error type shared by the whole engine: GPU backend
//! failures, resource validation, engine initialization and image decoding.

use std::fmt;

/// Result type for Lumen engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lumen engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL, poisoned locks, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (bad pixel buffer, disposed texture, dead handle, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, graphics device, texture cache)
    InitializationFailed(String),

    /// Image file missing, unreadable, empty, or not a supported raster format
    DecodeError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::DecodeError(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
