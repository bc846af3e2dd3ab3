//! Score fusion and decisioning.
//!
//! Both steps are pure functions of their inputs and a [`MatchConfig`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::MatchConfig;

/// Three-way outcome of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Confident match.
    #[serde(rename = "OK")]
    Ok,
    /// Plausible match, ask again.
    #[serde(rename = "INCERTAIN")]
    Incertain,
    /// No match.
    #[serde(rename = "KO")]
    Ko,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Ok => "OK",
            Decision::Incertain => "INCERTAIN",
            Decision::Ko => "KO",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores of one utterance window against one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowScore {
    pub fused: f32,
    pub embed: Option<f32>,
    pub ngram: f32,
}

impl WindowScore {
    pub fn new(cfg: &MatchConfig, embed: Option<f32>, ngram: f32) -> Self {
        Self {
            fused: fuse(cfg, embed, ngram),
            embed,
            ngram,
        }
    }
}

/// Convex combination of the two similarities, clamped to `[0, 1]`.
///
/// Without an embedding score the n-gram score carries the full weight and is
/// returned unchanged (apart from clamping).
pub fn fuse(cfg: &MatchConfig, embed: Option<f32>, ngram: f32) -> f32 {
    let fused = match embed {
        Some(e) => cfg.embed_weight * e + cfg.ngram_weight * ngram,
        None => ngram,
    };
    if fused.is_nan() {
        return 0.0;
    }
    fused.clamp(0.0, 1.0)
}

/// Whether the lexical overlap guard lets a decision through.
///
/// Always true when the guard is not requested.
pub fn overlap_ok(cfg: &MatchConfig, ngram: f32, require_overlap: bool) -> bool {
    !require_overlap || ngram > cfg.name_overlap_floor
}

/// Map a fused score to a decision. A failed overlap guard forces KO.
pub fn decide(cfg: &MatchConfig, fused: f32, overlap_ok: bool) -> Decision {
    if !overlap_ok {
        return Decision::Ko;
    }
    if fused >= cfg.ok_threshold {
        Decision::Ok
    } else if fused >= cfg.uncertain_threshold {
        Decision::Incertain
    } else {
        Decision::Ko
    }
}
