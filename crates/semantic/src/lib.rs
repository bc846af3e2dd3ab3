//! Embedding oracles.
//!
//! The matcher treats embedding as an opaque capability: give it a
//! fixed-length character index sequence, get back a fixed-dimension vector.
//! This crate holds that contract ([`EmbeddingOracle`]) and the backends that
//! satisfy it.
//!
//! - **Hashed** - deterministic trigram hashing. No model files. Good for
//!   tests and for machines without ONNX Runtime.
//! - **ONNX** - a locally exported character encoder, behind the `onnx`
//!   cargo feature.
//!
//! Nothing here is fatal to matching. [`load_oracle`] reports
//! [`OracleUnavailable`] and the caller drops to n-gram-only scoring; a single
//! failed [`embed`](EmbeddingOracle::embed) call yields an [`OracleError`]
//! that only affects the candidate being scored.
//!
//! ## Quick example
//!
//! ```
//! use canonical::normalize;
//! use semantic::{cosine_similarity, load_oracle, OracleConfig};
//! use vocab::CharVocabulary;
//!
//! let vocab = CharVocabulary::from_ranked_chars(" aelstroi".chars()).unwrap();
//! let oracle = load_oracle(&OracleConfig::default()).unwrap();
//!
//! let a = oracle.embed(&vocab.encode(&normalize("salle trois"), 200)).unwrap();
//! let b = oracle.embed(&vocab.encode(&normalize("Salle TROIS"), 200)).unwrap();
//! assert!(cosine_similarity(&a, &b) > 0.999);
//! ```

mod config;
mod error;
mod hashed;
mod normalize;
#[cfg(feature = "onnx")]
mod onnx;
mod oracle;

use std::sync::Arc;

use tracing::info;

pub use crate::config::{InputType, OracleBackend, OracleConfig};
pub use crate::error::{OracleError, OracleUnavailable};
pub use crate::hashed::HashedNgramOracle;
pub use crate::normalize::{cosine_similarity, l2_normalize_in_place};
#[cfg(feature = "onnx")]
pub use crate::onnx::OnnxOracle;
pub use crate::oracle::EmbeddingOracle;

/// Build the oracle described by `cfg`.
///
/// Returns [`OracleUnavailable::Disabled`] for the `none` backend so callers
/// handle "no oracle" and "oracle failed to load" the same way.
pub fn load_oracle(cfg: &OracleConfig) -> Result<Arc<dyn EmbeddingOracle>, OracleUnavailable> {
    cfg.validate()?;
    let oracle: Arc<dyn EmbeddingOracle> = match cfg.backend {
        OracleBackend::None => return Err(OracleUnavailable::Disabled),
        OracleBackend::Hashed => Arc::new(HashedNgramOracle::new(cfg.dimension)?),
        OracleBackend::Onnx => load_onnx(cfg)?,
    };
    info!(
        backend = oracle.name(),
        dimension = oracle.dimension(),
        "oracle_ready"
    );
    Ok(oracle)
}

#[cfg(feature = "onnx")]
fn load_onnx(cfg: &OracleConfig) -> Result<Arc<dyn EmbeddingOracle>, OracleUnavailable> {
    Ok(Arc::new(OnnxOracle::load(cfg)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_cfg: &OracleConfig) -> Result<Arc<dyn EmbeddingOracle>, OracleUnavailable> {
    Err(OracleUnavailable::FeatureDisabled {
        backend: "onnx",
        feature: "onnx",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn none_backend_is_disabled() {
        let cfg = OracleConfig {
            backend: OracleBackend::None,
            ..Default::default()
        };
        assert!(matches!(load_oracle(&cfg), Err(OracleUnavailable::Disabled)));
    }

    #[test]
    fn hashed_backend_loads() {
        let cfg = OracleConfig {
            dimension: 64,
            ..Default::default()
        };
        let oracle = load_oracle(&cfg).unwrap();
        assert_eq!(oracle.dimension(), 64);
        assert_eq!(oracle.name(), "hashed-trigram");
    }

    #[test]
    fn invalid_config_is_unavailable() {
        let cfg = OracleConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(matches!(
            load_oracle(&cfg),
            Err(OracleUnavailable::InvalidConfig(_))
        ));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn onnx_without_feature_is_unavailable() {
        let cfg = OracleConfig {
            backend: OracleBackend::Onnx,
            model_path: Some(PathBuf::from("encoder_embed.onnx")),
            ..Default::default()
        };
        assert!(matches!(
            load_oracle(&cfg),
            Err(OracleUnavailable::FeatureDisabled { .. })
        ));
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn onnx_missing_model_is_unavailable() {
        let cfg = OracleConfig {
            backend: OracleBackend::Onnx,
            model_path: Some(PathBuf::from("/nonexistent/encoder_embed.onnx")),
            ..Default::default()
        };
        assert!(matches!(
            load_oracle(&cfg),
            Err(OracleUnavailable::ModelNotFound(_))
        ));
    }
}
