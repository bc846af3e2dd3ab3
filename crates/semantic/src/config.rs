use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::OracleUnavailable;

/// Which embedding backend to load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OracleBackend {
    /// No oracle: matching runs on n-grams alone.
    None,
    /// Deterministic hashed trigram vectors. No model file needed.
    #[default]
    Hashed,
    /// Local ONNX encoder (requires the `onnx` feature).
    Onnx,
}

impl OracleBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleBackend::None => "none",
            OracleBackend::Hashed => "hashed",
            OracleBackend::Onnx => "onnx",
        }
    }
}

/// Element type of the index tensor fed to an ONNX encoder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Int32,
    Int64,
}

/// Runtime configuration describing which oracle to build.
///
/// # Example
/// ```
/// use semantic::{OracleBackend, OracleConfig};
///
/// let cfg = OracleConfig {
///     backend: OracleBackend::Hashed,
///     dimension: 256,
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleConfig {
    pub backend: OracleBackend,
    /// Path to the encoder file when [`backend`](Self::backend) is `onnx`.
    pub model_path: Option<PathBuf>,
    /// Output vector size. For `onnx` this is checked against every output.
    pub dimension: usize,
    /// Index tensor element type for `onnx`.
    pub input_type: InputType,
    /// ONNX Runtime intra-op threads. `None` keeps the runtime default.
    pub intra_threads: Option<usize>,
}

impl OracleConfig {
    /// Validate the configuration without touching the filesystem.
    pub fn validate(&self) -> Result<(), OracleUnavailable> {
        if self.backend == OracleBackend::None {
            return Ok(());
        }
        if self.dimension == 0 {
            return Err(OracleUnavailable::InvalidConfig(
                "dimension must be >= 1".into(),
            ));
        }
        if self.backend == OracleBackend::Onnx && self.model_path.is_none() {
            return Err(OracleUnavailable::InvalidConfig(
                "onnx backend requires model_path".into(),
            ));
        }
        if self.intra_threads == Some(0) {
            return Err(OracleUnavailable::InvalidConfig(
                "intra_threads must be >= 1 when set".into(),
            ));
        }
        Ok(())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::Hashed,
            model_path: None,
            dimension: 1024,
            input_type: InputType::Int32,
            intra_threads: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = OracleConfig::default();
        assert_eq!(cfg.backend, OracleBackend::Hashed);
        assert!(cfg.model_path.is_none());
        assert_eq!(cfg.dimension, 1024);
        assert_eq!(cfg.input_type, InputType::Int32);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn none_backend_skips_checks() {
        let cfg = OracleConfig {
            backend: OracleBackend::None,
            dimension: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_dimension_rejected() {
        let cfg = OracleConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(OracleUnavailable::InvalidConfig(msg)) if msg.contains("dimension")
        ));
    }

    #[test]
    fn onnx_requires_model_path() {
        let cfg = OracleConfig {
            backend: OracleBackend::Onnx,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = OracleConfig {
            backend: OracleBackend::Onnx,
            model_path: Some(PathBuf::from("encoder.onnx")),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = OracleConfig {
            backend: OracleBackend::Onnx,
            model_path: Some(PathBuf::from("/models/encoder_embed.onnx")),
            dimension: 128,
            input_type: InputType::Int64,
            intra_threads: Some(2),
        };
        let serialized = serde_json::to_string(&cfg).unwrap();
        assert!(serialized.contains("\"onnx\""));
        assert!(serialized.contains("\"int64\""));
        let deserialized: OracleConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(cfg, deserialized);
    }
}
