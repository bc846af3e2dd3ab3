// Metrics hooks for the matcher.
//
// A `MatchMetrics` implementation is attached to one engine through its
// builder; the engine reports latency and decision counts for every call to
// `match_utterance_to_candidates`. No process-wide state.
use std::time::Duration;

use crate::policy::Decision;
use crate::types::MatchResult;

/// Per-call decision tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionCounts {
    pub ok: usize,
    pub incertain: usize,
    pub ko: usize,
}

impl DecisionCounts {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut counts = Self::default();
        for r in results {
            match r.decision {
                Decision::Ok => counts.ok += 1,
                Decision::Incertain => counts.incertain += 1,
                Decision::Ko => counts.ko += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.ok + self.incertain + self.ko
    }
}

/// Metrics observer for match calls.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of one call.
    ///
    /// `latency` is the wall-clock duration of the call, `candidates` the
    /// number of candidates scored, `decisions` the tally of returned
    /// decisions and `degraded` whether the engine had no embedding oracle.
    fn record_match(
        &self,
        latency: Duration,
        candidates: usize,
        decisions: DecisionCounts,
        degraded: bool,
    );
}
