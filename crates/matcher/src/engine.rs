use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use canonical::{NormalizedText, Normalizer, NormalizerConfig};
use ngram::{GramCounts, NGramConfig, NGramScorer};
use rayon::prelude::*;
use semantic::{cosine_similarity, EmbeddingOracle, OracleError, OracleUnavailable};
use tracing::{debug, info, warn, Level};
use vocab::{CharVocabulary, EncodedSequence};

use crate::metrics::{DecisionCounts, MatchMetrics};
use crate::policy::{decide, overlap_ok, Decision, WindowScore};
use crate::types::{Candidate, MatchConfig, MatchError, MatchResult};
use crate::window::{Span, WindowAligner};


/// Scores spoken confirmations against candidate reference values.
///
/// Holds only read-only state; one engine can serve any number of threads.
pub struct MatchEngine {
    cfg: MatchConfig,
    normalizer: Normalizer,
    vocab: Arc<CharVocabulary>,
    scorer: NGramScorer,
    aligner: WindowAligner,
    oracle: Option<Arc<dyn EmbeddingOracle>>,
    metrics: Option<Arc<dyn MatchMetrics>>,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("cfg", &self.cfg)
            .field("vocab_size", &self.vocab.len())
            .field("oracle", &self.oracle.as_ref().map(|o| o.name().to_string()))
            .finish_non_exhaustive()
    }
}

/// Builder for [`MatchEngine`]. Only the vocabulary is required.
pub struct MatchEngineBuilder {
    vocab: Arc<CharVocabulary>,
    cfg: MatchConfig,
    normalizer: NormalizerConfig,
    ngram: NGramConfig,
    oracle: Option<Arc<dyn EmbeddingOracle>>,
    metrics: Option<Arc<dyn MatchMetrics>>,
}

impl MatchEngineBuilder {
    pub fn config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn normalizer(mut self, cfg: NormalizerConfig) -> Self {
        self.normalizer = cfg;
        self
    }

    pub fn ngram(mut self, cfg: NGramConfig) -> Self {
        self.ngram = cfg;
        self
    }

    pub fn oracle(mut self, oracle: Arc<dyn EmbeddingOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Take the outcome of oracle loading as is. An unavailable oracle is
    /// logged and the engine runs on n-grams alone.
    pub fn oracle_result(
        mut self,
        result: Result<Arc<dyn EmbeddingOracle>, OracleUnavailable>,
    ) -> Self {
        match result {
            Ok(oracle) => self.oracle = Some(oracle),
            Err(OracleUnavailable::Disabled) => {
                info!("oracle_disabled");
                self.oracle = None;
            }
            Err(err) => {
                warn!(error = %err, "oracle_unavailable");
                self.oracle = None;
            }
        }
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MatchMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<MatchEngine, MatchError> {
        self.cfg.validate()?;
        let normalizer = Normalizer::new(self.normalizer)?;
        let scorer = NGramScorer::new(self.ngram)?;

        debug!(
            vocab_size = self.vocab.len(),
            oracle = self.oracle.as_ref().map(|o| o.name()).unwrap_or("none"),
            "match_engine_ready"
        );

        Ok(MatchEngine {
            aligner: WindowAligner::new(self.cfg.window_slack),
            cfg: self.cfg,
            normalizer,
            vocab: self.vocab,
            scorer,
            oracle: self.oracle,
            metrics: self.metrics,
        })
    }
}

/// Per-candidate work computed before any embedding.
struct Plan {
    text: NormalizedText,
    grams: GramCounts,
    windows: Vec<Span>,
}

/// Call-local memo: normalized text -> embedding (`None` when the call failed).
type EmbeddingTable = HashMap<String, Option<Vec<f32>>>;

impl MatchEngine {
    pub fn builder(vocab: impl Into<Arc<CharVocabulary>>) -> MatchEngineBuilder {
        MatchEngineBuilder {
            vocab: vocab.into(),
            cfg: MatchConfig::default(),
            normalizer: NormalizerConfig::default(),
            ngram: NGramConfig::default(),
            oracle: None,
            metrics: None,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    pub fn vocabulary(&self) -> &CharVocabulary {
        &self.vocab
    }

    /// True when no embedding oracle is loaded; scores are n-gram only.
    pub fn is_degraded(&self) -> bool {
        self.oracle.is_none()
    }

    /// Normalize `text` the way the engine does before scoring.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        self.normalizer.normalize(text)
    }

    /// Score `utterance` against every candidate.
    ///
    /// Returns one result per candidate, sorted by fused score descending;
    /// candidates with equal scores keep their input order. With
    /// `require_overlap_for_names`, a result whose best span does not share
    /// enough characters with the candidate is KO whatever its fused score.
    ///
    /// Never fails: empty or unusable text gives a KO result with score 0.
    pub fn match_utterance_to_candidates(
        &self,
        utterance: &str,
        candidates: &[Candidate],
        require_overlap_for_names: bool,
    ) -> Vec<MatchResult> {
        let span = tracing::span!(
            Level::INFO,
            "match_utterance",
            candidates = candidates.len(),
            require_overlap = require_overlap_for_names
        );
        let _guard = span.enter();
        let start = Instant::now();

        let utterance = self.normalizer.normalize(utterance);
        let words = utterance.words();
        let plans: Vec<Plan> = candidates.iter().map(|c| self.plan(&words, c)).collect();

        let table = self
            .oracle
            .as_ref()
            .map(|oracle| self.embed_all(oracle.as_ref(), &plans));

        let score = |(candidate, plan): (&Candidate, &Plan)| {
            self.score_candidate(candidate, plan, table.as_ref(), require_overlap_for_names)
        };
        let mut results: Vec<MatchResult> = if self.cfg.parallel {
            candidates.par_iter().zip(plans.par_iter()).map(score).collect()
        } else {
            candidates.iter().zip(plans.iter()).map(score).collect()
        };

        // Stable: equal scores keep input order.
        results.sort_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let latency = start.elapsed();
        let decisions = DecisionCounts::from_results(&results);
        info!(
            candidates = candidates.len(),
            utterance_words = words.len(),
            ok = decisions.ok,
            incertain = decisions.incertain,
            ko = decisions.ko,
            degraded = self.is_degraded(),
            elapsed_micros = latency.as_micros() as u64,
            "match_complete"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_match(latency, candidates.len(), decisions, self.is_degraded());
        }

        results
    }

    /// Highest-ranked result, if any candidate was given.
    pub fn best_match(
        &self,
        utterance: &str,
        candidates: &[Candidate],
        require_overlap_for_names: bool,
    ) -> Option<MatchResult> {
        self.match_utterance_to_candidates(utterance, candidates, require_overlap_for_names)
            .into_iter()
            .next()
    }

    fn plan(&self, words: &[&str], candidate: &Candidate) -> Plan {
        let text = self.normalizer.normalize(&candidate.text);
        let grams = self.scorer.grams(&text);
        let windows = if text.is_empty() {
            Vec::new()
        } else {
            self.aligner.windows(words, text.word_count())
        };
        Plan {
            text,
            grams,
            windows,
        }
    }

    /// Embed every distinct candidate and window text once.
    fn embed_all(&self, oracle: &dyn EmbeddingOracle, plans: &[Plan]) -> EmbeddingTable {
        let mut keys: Vec<&NormalizedText> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for plan in plans.iter().filter(|p| !p.windows.is_empty()) {
            for text in std::iter::once(&plan.text).chain(plan.windows.iter().map(|w| &w.text)) {
                if seen.insert(text.as_str()) {
                    keys.push(text);
                }
            }
        }
        if keys.is_empty() {
            return EmbeddingTable::new();
        }

        let seqs: Vec<EncodedSequence> = keys
            .iter()
            .map(|text| self.vocab.encode(text, self.cfg.seq_len))
            .collect();
        let start = Instant::now();

        let vectors: Vec<Option<Vec<f32>>> = match oracle.embed_batch(&seqs) {
            Ok(batch) if batch.len() == seqs.len() => batch
                .into_iter()
                .map(|v| checked_dimension(oracle, v))
                .collect(),
            outcome => {
                let error = match outcome {
                    Err(err) => err.to_string(),
                    Ok(batch) => format!("batch returned {} of {} vectors", batch.len(), seqs.len()),
                };
                warn!(
                    error = %error,
                    batch = seqs.len(),
                    "oracle_embed_failure"
                );
                seqs.iter()
                    .map(|seq| match oracle.embed(seq) {
                        Ok(v) => checked_dimension(oracle, v),
                        Err(err) => {
                            warn!(error = %err, "oracle_embed_failure");
                            None
                        }
                    })
                    .collect()
            }
        };
        debug!(
            texts = keys.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "embeddings_computed"
        );

        keys.into_iter()
            .map(|text| text.as_str().to_string())
            .zip(vectors)
            .collect()
    }

    fn score_candidate(
        &self,
        candidate: &Candidate,
        plan: &Plan,
        table: Option<&EmbeddingTable>,
        require_overlap: bool,
    ) -> MatchResult {
        if plan.windows.is_empty() {
            return MatchResult {
                candidate: candidate.clone(),
                fused_score: 0.0,
                best_span: Span::empty(),
                decision: Decision::Ko,
                embed_score: self.oracle.as_ref().map(|_| 0.0),
                ngram_score: 0.0,
            };
        }

        // Embeddings are used only when the candidate and all of its windows
        // have one; otherwise the whole candidate is scored on n-grams.
        let vectors = table.and_then(|t| {
            let target = lookup(t, &plan.text)?;
            let windows = plan
                .windows
                .iter()
                .map(|w| lookup(t, &w.text))
                .collect::<Option<Vec<&[f32]>>>()?;
            Some((target, windows))
        });

        let (idx, best) = WindowAligner::select_best(&plan.windows, |i, span| {
            let ngram = self.scorer.score_grams(&self.scorer.grams(&span.text), &plan.grams);
            let embed = vectors
                .as_ref()
                .map(|(target, windows)| cosine_similarity(windows[i], target).clamp(0.0, 1.0));
            WindowScore::new(&self.cfg, embed, ngram)
        })
        .unwrap_or((
            0,
            WindowScore {
                fused: 0.0,
                embed: None,
                ngram: 0.0,
            },
        ));

        let decision = decide(
            &self.cfg,
            best.fused,
            overlap_ok(&self.cfg, best.ngram, require_overlap),
        );

        MatchResult {
            candidate: candidate.clone(),
            fused_score: best.fused,
            best_span: plan.windows[idx].clone(),
            decision,
            embed_score: best.embed,
            ngram_score: best.ngram,
        }
    }
}

fn lookup<'t>(table: &'t EmbeddingTable, text: &NormalizedText) -> Option<&'t [f32]> {
    table.get(text.as_str())?.as_deref()
}

fn checked_dimension(oracle: &dyn EmbeddingOracle, v: Vec<f32>) -> Option<Vec<f32>> {
    if v.len() == oracle.dimension() {
        return Some(v);
    }
    let err = OracleError::DimensionMismatch {
        expected: oracle.dimension(),
        actual: v.len(),
    };
    warn!(error = %err, "oracle_embed_failure");
    None
}
