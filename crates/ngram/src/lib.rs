//! # Character n-gram similarity
//!
//! Pure lexical similarity between two normalized strings, independent of any
//! learned model. It is the half of the fused score that still works when no
//! embedding backend is loaded, and the signal behind the name overlap guard.
//!
//! ## Contract
//!
//! - Inputs are [`NormalizedText`] values; this crate never normalizes.
//! - Both texts are cut into character n-grams (default trigrams, padded
//!   with one space on each side) and compared as multisets with the Dice
//!   coefficient `2·|A∩B| / (|A|+|B|)`.
//! - The score lies in `[0, 1]`, is exactly `1` for identical non-empty texts
//!   and exactly `0` when either side yields no grams. Never an error.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::normalize;
//! use ngram::{ngram_score, NGramConfig, NGramScorer};
//!
//! let a = normalize("Salle trois");
//! let b = normalize("salle  TROIS");
//! assert_eq!(ngram_score(&a, &b), 1.0);
//!
//! let scorer = NGramScorer::new(NGramConfig::new().with_n(2)).unwrap();
//! let c = normalize("salle quatre");
//! assert!(scorer.score(&a, &c) < 1.0);
//! ```

mod config;
mod grams;

use canonical::NormalizedText;

pub use crate::config::{NGramConfig, NGramError};
pub use crate::grams::{char_ngrams, dice, gram_total, GramCounts};

/// Dice scorer over character n-grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NGramScorer {
    cfg: NGramConfig,
}

impl NGramScorer {
    pub fn new(cfg: NGramConfig) -> Result<Self, NGramError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &NGramConfig {
        &self.cfg
    }

    /// Gram multiset of `text` under this scorer's configuration.
    ///
    /// Callers comparing one text against many windows can compute this once
    /// and use [`score_grams`](Self::score_grams).
    pub fn grams(&self, text: &NormalizedText) -> GramCounts {
        char_ngrams(text.as_str(), self.cfg.n, self.cfg.pad)
    }

    /// Similarity of two normalized texts in `[0, 1]`.
    pub fn score(&self, a: &NormalizedText, b: &NormalizedText) -> f32 {
        dice(&self.grams(a), &self.grams(b))
    }

    pub fn score_grams(&self, a: &GramCounts, b: &GramCounts) -> f32 {
        dice(a, b)
    }
}

/// Score with the default configuration (padded trigrams).
pub fn ngram_score(a: &NormalizedText, b: &NormalizedText) -> f32 {
    NGramScorer::default().score(a, b)
}
