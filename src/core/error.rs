//! Error types for Augmenta.
//!
//! Uses thiserror for structured errors with context. The taxonomy mirrors the
//! three places a run can fail:
//! - a transform precondition (fatal for the image being processed)
//! - the configuration boundary (fatal for the whole run, raised before any image)
//! - the image I/O boundary (reading, decoding, encoding, writing)
//!
//! Malformed parameters are not errors; they fall back to defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Augmenta.
#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image codec failure on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A transform was called with inputs it cannot honour.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("{transform}: {reason}")]
    Precondition {
        transform: &'static str,
        reason: String,
    },
}

impl TransformError {
    /// Build a precondition violation for the named transform.
    pub fn precondition(transform: &'static str, reason: impl Into<String>) -> Self {
        TransformError::Precondition {
            transform,
            reason: reason.into(),
        }
    }
}

/// Errors loading the augmentation document or the run settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed augmentation document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Malformed settings file: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

impl AugmentError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AugmentError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a path to an image codec error.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        AugmentError::Image {
            path: path.into(),
            source,
        }
    }

    /// Whether a run can move on to the next image after this error.
    pub fn is_per_image(&self) -> bool {
        !matches!(self, AugmentError::Config(_))
    }
}

/// Result type alias for Augmenta operations.
pub type AugmentResult<T> = Result<T, AugmentError>;

/// Result type alias for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_message() {
        let err = TransformError::precondition("random_crop", "crop 120x10 exceeds image 100x10");
        assert_eq!(err.to_string(), "random_crop: crop 120x10 exceeds image 100x10");
    }

    #[test]
    fn test_transform_error_converts() {
        let err: AugmentError = TransformError::precondition("random_crop", "empty").into();
        assert!(matches!(err, AugmentError::Transform(_)));
        assert!(err.is_per_image());
    }

    #[test]
    fn test_config_errors_are_not_per_image() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AugmentError = ConfigError::Document(parse).into();
        assert!(!err.is_per_image());
    }

    #[test]
    fn test_io_error_names_path() {
        let err = AugmentError::io(
            "/missing/cat.jpg",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/missing/cat.jpg"));
        assert!(err.is_per_image());
    }
}
