//! # Error Types
//!
//! This module defines error types used throughout the serpentina library.

use thiserror::Error;

/// Main error type for serpentina operations
#[derive(Debug, Error)]
pub enum SerpentinaError {
    /// Empty or unusable serial configuration string
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The serial port could not be opened
    #[error("Open error: {0}")]
    Open(String),

    /// A write to an open port failed
    #[error("Write error: {0}")]
    Write(String),

    /// A print operation was given no data
    #[error("No data to print")]
    EmptyPayload,

    /// Raster image data problems
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, SerpentinaError>;
