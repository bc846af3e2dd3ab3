use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single embedding call.
///
/// Never fatal to matching: the affected candidate is scored on n-grams alone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The backend ran but could not produce a vector.
    #[error("inference failure: {0}")]
    Inference(String),
    /// The backend returned a vector of the wrong size.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// The embedding capability could not be initialized.
///
/// Reported once at engine construction; the engine then runs in degraded
/// (n-gram only) mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleUnavailable {
    /// No backend configured.
    #[error("embedding oracle disabled by configuration")]
    Disabled,
    /// The model artifact is not on disk.
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),
    /// The backend exists but this build was compiled without it.
    #[error("backend `{backend}` requires the `{feature}` cargo feature")]
    FeatureDisabled {
        backend: &'static str,
        feature: &'static str,
    },
    /// Configuration is inconsistent (e.g., zero dimension).
    #[error("invalid oracle config: {0}")]
    InvalidConfig(String),
    /// The runtime refused to load the model.
    #[error("failed to load model: {0}")]
    Load(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_inference() {
        let err = OracleError::Inference("session failed".into());
        assert!(err.to_string().contains("inference failure"));
        assert!(err.to_string().contains("session failed"));
    }

    #[test]
    fn error_dimension_mismatch() {
        let err = OracleError::DimensionMismatch {
            expected: 128,
            actual: 64,
        };
        assert!(err.to_string().contains("expected 128, got 64"));
    }

    #[test]
    fn unavailable_model_not_found_shows_path() {
        let err = OracleUnavailable::ModelNotFound(PathBuf::from("/models/encoder.onnx"));
        assert!(err.to_string().contains("/models/encoder.onnx"));
    }

    #[test]
    fn unavailable_feature_disabled() {
        let err = OracleUnavailable::FeatureDisabled {
            backend: "onnx",
            feature: "onnx",
        };
        assert!(err.to_string().contains("requires the `onnx` cargo feature"));
    }
}
