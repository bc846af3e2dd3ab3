//! # Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` decides whether a transcribed confirmation ("c'est bien la salle
//! trois") refers to one of a set of expected reference values. It ties the
//! lower layers together:
//!
//! - `canonical` normalizes the utterance and every candidate.
//! - `ngram` gives a lexical similarity that never fails.
//! - `vocab` and `semantic` give an embedding similarity when an oracle is
//!   loaded.
//!
//! For each candidate the engine slides word windows of roughly the
//! candidate's length over the utterance, fuses the two similarities per
//! window, keeps the best window and maps its score to OK / INCERTAIN / KO.
//!
//! ## Core Types
//!
//! - [`MatchEngine`]: immutable, thread-safe scorer built through
//!   [`MatchEngineBuilder`].
//! - [`MatchConfig`]: fusion weights, decision thresholds, window slack and
//!   overlap floor.
//! - [`Candidate`]: a labelled reference value.
//! - [`MatchResult`]: fused score, best span, decision and the two component
//!   scores for one candidate.
//! - [`Decision`]: the three-way verdict.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Candidate, Decision, MatchEngine};
//! use semantic::{load_oracle, OracleConfig};
//! use vocab::CharVocabulary;
//!
//! let vocab = CharVocabulary::from_ranked_chars(
//!     " abcdefghijklmnopqrstuvwxyz0123456789:/-".chars(),
//! )
//! .unwrap();
//! let engine = MatchEngine::builder(vocab)
//!     .oracle_result(load_oracle(&OracleConfig::default()))
//!     .build()
//!     .unwrap();
//!
//! let candidates = vec![
//!     Candidate::new("intervention.salle", "Salle trois"),
//!     Candidate::new("intervention.salle", "Salle quatre"),
//! ];
//! let results = engine.match_utterance_to_candidates("salle trois", &candidates, false);
//!
//! assert_eq!(results[0].candidate.text, "Salle trois");
//! assert_eq!(results[0].decision, Decision::Ok);
//! assert_eq!(results[1].decision, Decision::Ko);
//! ```
//!
//! ## Degraded mode
//!
//! Without an oracle, or when the oracle fails for a candidate, the fused
//! score is the n-gram score. Results carry `embed_score: None` in that case,
//! and [`MatchEngine::is_degraded`] reports a missing oracle.
//!
//! ## Observability
//!
//! Every call runs inside a `match_utterance` tracing span and ends with a
//! `match_complete` event. Attach a [`MatchMetrics`] implementation with
//! [`MatchEngineBuilder::metrics`] to record latency and decision counts per
//! engine.

pub mod engine;
pub mod metrics;
pub mod policy;
pub mod types;
pub mod window;

pub use crate::engine::{MatchEngine, MatchEngineBuilder};
pub use crate::metrics::{DecisionCounts, MatchMetrics};
pub use crate::policy::{decide, fuse, overlap_ok, Decision, WindowScore};
pub use crate::types::{Candidate, MatchConfig, MatchError, MatchResult, MAX_WINDOW_SLACK};
pub use crate::window::{Span, WindowAligner};
