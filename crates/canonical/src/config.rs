//! Configuration for transcript normalization.
//!
//! [`NormalizerConfig`] decides which characters survive normalization besides
//! the fixed `[a-z0-9 ]` core alphabet. Everything else becomes a word
//! delimiter.
//!
//! # Versioning
//!
//! Any change to normalization output (even a bug fix) must bump `version`.
//! Vocabularies and embedding models are trained against one normalized
//! alphabet, so a silent change would skew every downstream score.
//!
//! # Examples
//!
//! ```rust
//! use canonical::NormalizerConfig;
//!
//! let config = NormalizerConfig::default();
//! assert_eq!(config.version, 1);
//! assert_eq!(config.allowed_symbols, ":/-");
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Symbols kept by default: times (`10:30`), dates (`12/05`), compound names
/// (`jean-pierre`).
pub const DEFAULT_ALLOWED_SYMBOLS: &str = ":/-";

/// Configuration for [`Normalizer`](crate::Normalizer).
///
/// Cheap to clone and serde-friendly so it can be embedded in the YAML
/// configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Version of the normalization behavior. Must be >= 1.
    pub version: u32,

    /// ASCII punctuation characters kept verbatim in normalized text.
    ///
    /// Letters, digits and the single space are always kept. Only ASCII
    /// punctuation is accepted here: a symbol that lowercasing or diacritic
    /// stripping could alter would break idempotence.
    pub allowed_symbols: String,
}

impl NormalizerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if let Some(bad) = self
            .allowed_symbols
            .chars()
            .find(|c| !c.is_ascii_punctuation())
        {
            return Err(CanonicalError::InvalidConfig(format!(
                "allowed_symbols may only contain ASCII punctuation, found {bad:?}"
            )));
        }
        Ok(())
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            allowed_symbols: DEFAULT_ALLOWED_SYMBOLS.to_string(),
        }
    }
}
