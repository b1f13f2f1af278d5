/*!
 * Error types for the videocr application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors caused by invalid configuration or caller input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Requested end of the OCR range lies before its start
    #[error("Invalid time range: end frame {end} is before start frame {start}")]
    InvalidTimeRange {
        /// First requested frame
        start: usize,
        /// Requested end frame (exclusive)
        end: usize,
    },

    /// Time string does not match `[H:]M:S[.fff]`
    #[error("Time data \"{0}\" does not match format \"%H:%M:%S\"")]
    InvalidTimeFormat(String),

    /// Frame rate is zero, negative or not a number
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// A 0-100 threshold is out of range
    #[error("Threshold {name} must be within 0..=100, got {value}")]
    ThresholdOutOfRange {
        /// Configuration key
        name: &'static str,
        /// Offending value
        value: u32,
    },
}

/// Errors raised at the OCR collaborator boundary
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The OCR engine failed on a frame
    #[error("Recognition failed for frame {index}: {message}")]
    EngineFailed {
        /// Frame index
        index: usize,
        /// Engine message
        message: String,
    },

    /// A recognition dump could not be read
    #[error("Failed to read recognition dump {path}: {source}")]
    DumpUnreadable {
        /// Dump location
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Requested frame lies outside the source
    #[error("Frame {index} is outside the source (frame count {frame_count})")]
    FrameOutOfRange {
        /// Requested index
        index: usize,
        /// Frames available
        frame_count: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the OCR collaborator
    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
