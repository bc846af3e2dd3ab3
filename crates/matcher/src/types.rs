use canonical::CanonicalError;
use ngram::NGramError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vocab::VocabularyLoadError;

use crate::policy::Decision;
use crate::window::Span;

/// Largest accepted `window_slack`. Spoken confirmations are a few words long.
pub const MAX_WINDOW_SLACK: usize = 64;

/// Engine-wide tuning knobs: fusion weights, decision thresholds, window
/// tolerance and overlap floor.
///
/// Immutable once handed to [`MatchEngineBuilder`](crate::MatchEngineBuilder),
/// so test suites can run several threshold sets side by side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Weight of the embedding similarity when an embedding is available.
    #[serde(default = "MatchConfig::default_embed_weight")]
    pub embed_weight: f32,
    /// Weight of the n-gram similarity. `embed_weight + ngram_weight == 1`.
    #[serde(default = "MatchConfig::default_ngram_weight")]
    pub ngram_weight: f32,
    /// Fused score at or above which the decision is OK.
    #[serde(default = "MatchConfig::default_ok_threshold")]
    pub ok_threshold: f32,
    /// Fused score at or above which the decision is at least INCERTAIN.
    #[serde(default = "MatchConfig::default_uncertain_threshold")]
    pub uncertain_threshold: f32,
    /// Window lengths tried are `k - slack ..= k + slack` for a candidate of
    /// `k` words.
    #[serde(default = "MatchConfig::default_window_slack")]
    pub window_slack: usize,
    /// With the overlap guard on, a non-KO decision needs
    /// `ngram_score > name_overlap_floor`. The default of 0 asks for at least
    /// one shared n-gram, which rejects character-disjoint names. Raising it
    /// also rejects INCERTAIN results with little overlap; at the default
    /// weights an OK already needs an n-gram score of about 0.6.
    #[serde(default = "MatchConfig::default_name_overlap_floor")]
    pub name_overlap_floor: f32,
    /// Encoded sequence length fed to the embedding oracle, at most
    /// [`vocab::MAX_SEQ_LEN`].
    #[serde(default = "MatchConfig::default_seq_len")]
    pub seq_len: usize,
    /// Score candidates on the rayon pool. Output is identical either way.
    #[serde(default)]
    pub parallel: bool,
}

impl MatchConfig {
    pub(crate) fn default_embed_weight() -> f32 {
        0.7
    }

    pub(crate) fn default_ngram_weight() -> f32 {
        0.3
    }

    pub(crate) fn default_ok_threshold() -> f32 {
        0.88
    }

    pub(crate) fn default_uncertain_threshold() -> f32 {
        0.70
    }

    pub(crate) fn default_window_slack() -> usize {
        1
    }

    pub(crate) fn default_name_overlap_floor() -> f32 {
        0.0
    }

    pub(crate) fn default_seq_len() -> usize {
        vocab::DEFAULT_SEQ_LEN
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        fn unit(name: &str, value: f32) -> Result<(), MatchError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be between 0.0 and 1.0 (got {value})"
                )));
            }
            Ok(())
        }

        unit("embed_weight", self.embed_weight)?;
        unit("ngram_weight", self.ngram_weight)?;
        unit("ok_threshold", self.ok_threshold)?;
        unit("uncertain_threshold", self.uncertain_threshold)?;
        unit("name_overlap_floor", self.name_overlap_floor)?;

        if (self.embed_weight + self.ngram_weight - 1.0).abs() > 1e-4 {
            return Err(MatchError::InvalidConfig(format!(
                "embed_weight + ngram_weight must equal 1.0 (got {})",
                self.embed_weight + self.ngram_weight
            )));
        }
        if self.uncertain_threshold > self.ok_threshold {
            return Err(MatchError::InvalidConfig(
                "uncertain_threshold must not exceed ok_threshold".into(),
            ));
        }
        if self.seq_len == 0 || self.seq_len > vocab::MAX_SEQ_LEN {
            return Err(MatchError::InvalidConfig(format!(
                "seq_len must be between 1 and {} (got {})",
                vocab::MAX_SEQ_LEN,
                self.seq_len
            )));
        }
        if self.window_slack > MAX_WINDOW_SLACK {
            return Err(MatchError::InvalidConfig(format!(
                "window_slack must not exceed {MAX_WINDOW_SLACK} (got {})",
                self.window_slack
            )));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            embed_weight: Self::default_embed_weight(),
            ngram_weight: Self::default_ngram_weight(),
            ok_threshold: Self::default_ok_threshold(),
            uncertain_threshold: Self::default_uncertain_threshold(),
            window_slack: Self::default_window_slack(),
            name_overlap_floor: Self::default_name_overlap_floor(),
            seq_len: Self::default_seq_len(),
            parallel: false,
        }
    }
}

/// One reference value a transcript is checked against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Field name or role, e.g. `patient.nom` or `intervention.salle`.
    pub label: String,
    /// Expected value as stored in the record.
    pub text: String,
}

impl Candidate {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Outcome for one (utterance, candidate) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    pub candidate: Candidate,
    /// Fused confidence in `[0, 1]`.
    pub fused_score: f32,
    /// Utterance span that produced `fused_score`.
    pub best_span: Span,
    pub decision: Decision,
    /// Embedding similarity of the best span, `None` when no embedding was
    /// available for this candidate.
    pub embed_score: Option<f32>,
    /// Character n-gram similarity of the best span.
    pub ngram_score: f32,
}

/// Errors produced while building a matching engine.
///
/// Matching itself never fails: a poor match is a KO result.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid engine configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// Vocabulary resource missing or malformed.
    #[error("vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyLoadError),
    /// Normalizer configuration rejected.
    #[error("canonical error: {0}")]
    Canonical(#[from] CanonicalError),
    /// N-gram configuration rejected.
    #[error("ngram error: {0}")]
    NGram(#[from] NGramError),
}
