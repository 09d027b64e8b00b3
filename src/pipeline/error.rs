//! Error types and handling
//!
//! This module contains the error types raised by the processing pipeline.
//! [`ProcessingError`] covers whole-run failures; [`NormalizeError`] covers a
//! single feature and never aborts the batch.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ConfigError;

/// Errors raised while normalizing one feature
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Geometry is not a polygon or multipolygon
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Centroid could not be computed
    #[error("Centroid could not be computed")]
    CentroidUnavailable,
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input shapefile does not exist
    #[error("Shapefile not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input shapefile could not be read
    #[error("Failed to read shapefile {}: {message}", .path.display())]
    Read {
        /// Path of the dataset being read
        path: PathBuf,
        /// Underlying reader message
        message: String,
    },

    /// An operation needs rooms but none were processed
    #[error("No processed rooms to {0}")]
    NoRecords(&'static str),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single feature failed to normalize
    #[error("Failed to process room at index {index}: {source}")]
    Feature {
        /// Position of the feature in the dataset
        index: usize,
        /// Why normalization failed
        #[source]
        source: NormalizeError,
    },
}

impl ProcessingError {
    /// Create a read error for the given dataset
    pub fn read_error(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Read { path: path.into(), message: message.to_string() }
    }

    /// Wrap a per-feature normalization failure
    pub fn feature_error(index: usize, source: NormalizeError) -> Self {
        Self::Feature { index, source }
    }

    /// Check if this is a recoverable error
    ///
    /// Only per-feature failures are recoverable; everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProcessingError::Feature { .. })
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            ProcessingError::Config(_) => "Configuration",
            ProcessingError::InputNotFound(_) => "Input",
            ProcessingError::Read { .. } => "Input",
            ProcessingError::NoRecords(_) => "Empty Result",
            ProcessingError::Io(_) => "IO",
            ProcessingError::Serialization(_) => "Serialization",
            ProcessingError::Feature { .. } => "Feature",
        }
    }
}

/// Result type for processing operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;
