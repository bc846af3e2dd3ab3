//! Workspace umbrella crate for spoken-confirmation matching.
//!
//! This crate re-exports the stages (normalization, vocabulary, embedding
//! oracles, n-grams and the matcher), loads the YAML configuration that ties
//! them together and turns JSON records into candidates.
//!
//! ```
//! use vocalcheck::{candidates_from_record, Decision, VocalConfig};
//!
//! let config = VocalConfig::from_yaml("oracle:\n  backend: \"hashed\"\n").unwrap();
//! let engine = config.build_engine().unwrap();
//!
//! let record = serde_json::json!({ "intervention": { "salle": "Salle trois" } });
//! let candidates = candidates_from_record(&record);
//!
//! let best = engine
//!     .best_match("oui c'est la salle trois", &candidates, false)
//!     .unwrap();
//! assert_eq!(best.candidate.label, "intervention.salle");
//! assert_eq!(best.decision, Decision::Ok);
//! ```

pub mod config;
mod record;

pub use canonical::{
    normalize, CanonicalError, NormalizedText, Normalizer, NormalizerConfig,
    DEFAULT_ALLOWED_SYMBOLS,
};
pub use matcher::{
    decide, fuse, overlap_ok, Candidate, Decision, DecisionCounts, MatchConfig, MatchEngine,
    MatchEngineBuilder, MatchError, MatchMetrics, MatchResult, Span, WindowAligner, WindowScore,
};
pub use ngram::{ngram_score, NGramConfig, NGramError, NGramScorer};
pub use semantic::{
    cosine_similarity, load_oracle, EmbeddingOracle, HashedNgramOracle, InputType,
    OracleBackend, OracleConfig, OracleError, OracleUnavailable,
};
pub use vocab::{CharVocabulary, EncodedSequence, VocabularyLoadError, DEFAULT_SEQ_LEN, UNK_TOKEN};

pub use crate::config::{build_engine, ConfigLoadError, VocalConfig, DEFAULT_ALPHABET};
pub use crate::record::{candidates_from_record, record_fields, RecordField, ROOT_LABEL};
