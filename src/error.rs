//! Error types for the critique library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`CritiqueError`] enum. Startup failures (missing or malformed artifacts)
//! surface as [`CritiqueError::ModelLoad`]; once a pipeline has been built,
//! analysis of well-formed text does not fail.
//!
//! # Examples
//!
//! ```
//! use critique::error::{CritiqueError, Result};
//!
//! fn load() -> Result<()> {
//!     Err(CritiqueError::model_load("model.json: file not found"))
//! }
//!
//! match load() {
//!     Ok(_) => println!("Loaded"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for critique operations.
#[derive(Error, Debug)]
pub enum CritiqueError {
    /// I/O errors (file operations, stdin, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A model, vocabulary or stopword artifact is missing, unreadable or malformed.
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Errors raised while evaluating the classifier.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CritiqueError.
pub type Result<T> = std::result::Result<T, CritiqueError>;

impl CritiqueError {
    /// Create a new model load error.
    pub fn model_load<S: Into<String>>(msg: S) -> Self {
        CritiqueError::ModelLoad(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        CritiqueError::Analysis(msg.into())
    }

    /// Create a new inference error.
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        CritiqueError::Inference(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CritiqueError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CritiqueError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CritiqueError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error means the service cannot start.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CritiqueError::ModelLoad(_) | CritiqueError::Config(_) | CritiqueError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = CritiqueError::model_load("missing weights");
        assert_eq!(error.to_string(), "Model load error: missing weights");

        let error = CritiqueError::analysis("Test analysis error");
        assert_eq!(error.to_string(), "Analysis error: Test analysis error");

        let error = CritiqueError::invalid_argument("empty review");
        assert_eq!(error.to_string(), "Error: Invalid argument: empty review");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = CritiqueError::from(io_error);

        match error {
            CritiqueError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_fatal_classification() {
        assert!(CritiqueError::model_load("x").is_fatal());
        assert!(CritiqueError::config("x").is_fatal());
        assert!(!CritiqueError::inference("x").is_fatal());
    }
}
