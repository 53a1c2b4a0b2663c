//! Error types for the inference crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for inference operations
pub type NnResult<T> = Result<T, NnError>;

/// Inference errors
#[derive(Error, Debug)]
pub enum NnError {
    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model artifact could not be read from disk
    #[error("Failed to read model artifact {path}: {source}")]
    ArtifactRead {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Model artifact is not valid JSON for its schema
    #[error("Failed to parse model artifact {path}: {source}")]
    ArtifactParse {
        /// Artifact path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Inference error
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Shape mismatch error
    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Where the mismatch was detected
        context: String,
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        actual: Vec<usize>,
    },

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NnError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        NnError::Config(msg.into())
    }

    /// Create an inference error
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        NnError::Inference(msg.into())
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch<S: Into<String>>(context: S, expected: Vec<usize>, actual: Vec<usize>) -> Self {
        NnError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        NnError::InvalidInput(msg.into())
    }
}
