//! YAML configuration file support.
//!
//! One file describes every stage of the matcher: normalization, n-grams,
//! fusion and decision thresholds, the embedding oracle and the character
//! vocabulary. Every section and every field is optional; missing values take
//! the stage defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "bloc operatoire"
//!
//! normalizer:
//!   version: 1
//!   allowed_symbols: ":/-"
//!
//! ngram:
//!   n: 3
//!   pad: true
//!
//! matcher:
//!   embed_weight: 0.7
//!   ngram_weight: 0.3
//!   ok_threshold: 0.88
//!   uncertain_threshold: 0.70
//!   window_slack: 1
//!   name_overlap_floor: 0.0
//!   seq_len: 200
//!   parallel: false
//!
//! oracle:
//!   backend: "hashed"
//!   dimension: 1024
//!
//! vocabulary:
//!   path: "char_vocab.txt"
//! ```
//!
//! Relative paths in a file loaded with [`VocalConfig::from_file`] resolve
//! against the directory of that file.

use std::fs;
use std::path::{Path, PathBuf};

use canonical::NormalizerConfig;
use matcher::{MatchConfig, MatchEngine, MatchEngineBuilder, MatchError};
use ngram::NGramConfig;
use semantic::{load_oracle, InputType, OracleBackend, OracleConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use vocab::CharVocabulary;

/// Characters of the built-in vocabulary, most frequent first. The
/// normalizer's allowed symbols are appended after them.
pub const DEFAULT_ALPHABET: &str = " esaitnrulodcpmvqfbghjxyzwk0123456789";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VocalConfig {
    /// Configuration format version
    #[serde(default = "default_format_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalizer: NormalizerYamlConfig,

    #[serde(default)]
    pub ngram: NGramYamlConfig,

    /// Fusion weights, thresholds and window settings.
    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub oracle: OracleYamlConfig,

    #[serde(default)]
    pub vocabulary: VocabularyYamlConfig,
}

impl VocalConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        info!(
            path = %path.display(),
            name = config.name.as_deref().unwrap_or(""),
            "config_loaded"
        );
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: VocalConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The oracle section is not checked here: an oracle that cannot be
    /// built leaves the engine in degraded mode instead of failing the load.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.normalizer
            .to_normalizer_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("normalizer: {e}")))?;
        self.ngram
            .to_ngram_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("ngram: {e}")))?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matcher: {e}")))?;
        self.vocabulary.validate()?;

        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(p) = self.vocabulary.path.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.oracle.model_path.as_mut() {
            resolve(p);
        }
    }

    /// Load the vocabulary this configuration points at.
    ///
    /// Without a `vocabulary.path` the vocabulary is built from
    /// `vocabulary.alphabet` (or [`DEFAULT_ALPHABET`]) followed by the
    /// normalizer's allowed symbols.
    pub fn load_vocabulary(&self) -> Result<CharVocabulary, MatchError> {
        if let Some(path) = &self.vocabulary.path {
            return Ok(CharVocabulary::load(path)?);
        }
        let alphabet = self
            .vocabulary
            .alphabet
            .as_deref()
            .unwrap_or(DEFAULT_ALPHABET);
        let mut chars: Vec<char> = alphabet.chars().collect();
        for symbol in self.normalizer.allowed_symbols.chars() {
            if !chars.contains(&symbol) {
                chars.push(symbol);
            }
        }
        Ok(CharVocabulary::from_ranked_chars(chars)?)
    }

    /// Engine builder with every stage configured from this file.
    ///
    /// A vocabulary that fails to load is fatal. An oracle that fails to
    /// load is logged and the engine runs on n-grams alone.
    pub fn engine_builder(&self) -> Result<MatchEngineBuilder, MatchError> {
        let vocab = self.load_vocabulary()?;
        let oracle = load_oracle(&self.oracle.to_oracle_config());
        Ok(MatchEngine::builder(vocab)
            .config(self.matcher.clone())
            .normalizer(self.normalizer.to_normalizer_config())
            .ngram(self.ngram.to_ngram_config())
            .oracle_result(oracle))
    }

    /// Build the engine described by this configuration.
    pub fn build_engine(&self) -> Result<MatchEngine, MatchError> {
        self.engine_builder()?.build()
    }
}

impl Default for VocalConfig {
    fn default() -> Self {
        Self {
            version: default_format_version(),
            name: None,
            normalizer: NormalizerYamlConfig::default(),
            ngram: NGramYamlConfig::default(),
            matcher: MatchConfig::default(),
            oracle: OracleYamlConfig::default(),
            vocabulary: VocabularyYamlConfig::default(),
        }
    }
}

/// Build the engine described by `config`.
pub fn build_engine(config: &VocalConfig) -> Result<MatchEngine, MatchError> {
    config.build_engine()
}

/// Normalizer YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_allowed_symbols")]
    pub allowed_symbols: String,
}

impl NormalizerYamlConfig {
    pub fn to_normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            version: self.version,
            allowed_symbols: self.allowed_symbols.clone(),
        }
    }
}

impl Default for NormalizerYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            allowed_symbols: default_allowed_symbols(),
        }
    }
}

/// N-gram YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NGramYamlConfig {
    #[serde(default = "default_n")]
    pub n: usize,

    #[serde(default = "true_value")]
    pub pad: bool,
}

impl NGramYamlConfig {
    pub fn to_ngram_config(&self) -> NGramConfig {
        NGramConfig::new().with_n(self.n).with_pad(self.pad)
    }
}

impl Default for NGramYamlConfig {
    fn default() -> Self {
        Self { n: 3, pad: true }
    }
}

/// Embedding oracle YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleYamlConfig {
    #[serde(default)]
    pub backend: OracleBackend,

    #[serde(default)]
    pub model_path: Option<PathBuf>,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default)]
    pub input_type: InputType,

    #[serde(default)]
    pub intra_threads: Option<usize>,
}

impl OracleYamlConfig {
    pub fn to_oracle_config(&self) -> OracleConfig {
        OracleConfig {
            backend: self.backend,
            model_path: self.model_path.clone(),
            dimension: self.dimension,
            input_type: self.input_type,
            intra_threads: self.intra_threads,
        }
    }
}

impl Default for OracleYamlConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::default(),
            model_path: None,
            dimension: default_dimension(),
            input_type: InputType::default(),
            intra_threads: None,
        }
    }
}

/// Character vocabulary YAML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyYamlConfig {
    /// Vocabulary file, one character per line.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Inline alphabet, most frequent character first.
    #[serde(default)]
    pub alphabet: Option<String>,
}

impl VocabularyYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.path.is_some() && self.alphabet.is_some() {
            return Err(ConfigLoadError::Validation(
                "vocabulary.path and vocabulary.alphabet are mutually exclusive".to_string(),
            ));
        }
        if self.alphabet.as_deref() == Some("") {
            return Err(ConfigLoadError::Validation(
                "vocabulary.alphabet must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_format_version() -> String {
    "1.0".to_string()
}
fn default_version() -> u32 {
    1
}
fn default_allowed_symbols() -> String {
    canonical::DEFAULT_ALLOWED_SYMBOLS.to_string()
}
fn true_value() -> bool {
    true
}
fn default_n() -> usize {
    3
}
fn default_dimension() -> usize {
    1024
}
