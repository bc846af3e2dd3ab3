//! Configuration and error types for character n-gram scoring.
//!
//! Free of I/O so that scoring stays a pure function of
//! `(left, right, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for [`NGramScorer`](crate::NGramScorer).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NGramConfig {
    /// Characters per gram. Must be >= 1.
    pub n: usize,
    /// Surround each text with one space on both sides before cutting grams,
    /// so word boundaries count and any non-empty text yields a gram.
    pub pad: bool,
}

impl NGramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gram size. 2-4 works for short spoken fields; larger values
    /// punish single-letter transcription errors harder.
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_pad(mut self, pad: bool) -> Self {
        self.pad = pad;
        self
    }

    pub fn validate(&self) -> Result<(), NGramError> {
        if self.n < 1 {
            return Err(NGramError::InvalidConfigN { n: self.n });
        }
        Ok(())
    }
}

impl Default for NGramConfig {
    fn default() -> Self {
        Self { n: 3, pad: true }
    }
}

/// Errors returned when building an n-gram scorer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NGramError {
    #[error("invalid config: n must be >= 1 (got {n})")]
    InvalidConfigN { n: usize },
}
