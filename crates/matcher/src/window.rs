//! Word windows over the utterance.
//!
//! A spoken confirmation usually wraps the expected value in extra words
//! ("le patient est paul dupont"). The aligner proposes every contiguous word
//! window whose length is close to the candidate's word count and keeps the
//! one that scores best.

use canonical::NormalizedText;
use serde::Serialize;

use crate::policy::WindowScore;

/// Contiguous word range `[start, end)` of the normalized utterance.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// Words `start..end` joined by single spaces.
    pub text: NormalizedText,
}

impl Span {
    pub fn new(words: &[&str], start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: NormalizedText::from_words(&words[start..end]),
        }
    }

    /// The span of an empty utterance.
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            text: NormalizedText::empty(),
        }
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Proposes and selects utterance windows for a candidate of `k` words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAligner {
    slack: usize,
}

impl WindowAligner {
    pub fn new(slack: usize) -> Self {
        Self { slack }
    }

    pub fn slack(&self) -> usize {
        self.slack
    }

    /// Every window of `max(1, k - slack) ..= k + slack` words, clipped to the
    /// utterance, ordered by start position then length.
    ///
    /// An utterance shorter than the minimum length yields the whole
    /// utterance as the single window. An empty utterance yields nothing.
    pub fn windows(&self, words: &[&str], k: usize) -> Vec<Span> {
        let n = words.len();
        if n == 0 {
            return Vec::new();
        }
        let min_len = k.saturating_sub(self.slack).max(1);
        if n < min_len {
            return vec![Span::new(words, 0, n)];
        }
        let max_len = k.saturating_add(self.slack).min(n).max(min_len);

        let mut spans = Vec::with_capacity(n * (max_len - min_len + 1));
        for start in 0..n {
            for len in min_len..=max_len {
                if start + len > n {
                    break;
                }
                spans.push(Span::new(words, start, start + len));
            }
        }
        spans
    }

    /// Index and score of the best window.
    ///
    /// `spans` must be in [`windows`](Self::windows) order. Only a strictly
    /// higher fused score replaces the current best, so ties go to the
    /// earliest start, then the shorter window.
    pub fn select_best<F>(spans: &[Span], mut score: F) -> Option<(usize, WindowScore)>
    where
        F: FnMut(usize, &Span) -> WindowScore,
    {
        let mut best: Option<(usize, WindowScore)> = None;
        for (i, span) in spans.iter().enumerate() {
            let s = score(i, span);
            match best {
                Some((_, b)) if s.fused <= b.fused => {}
                _ => best = Some((i, s)),
            }
        }
        best
    }

    /// Generate the windows for a `k`-word candidate and return the best one.
    pub fn align<F>(&self, words: &[&str], k: usize, mut score: F) -> Option<(Span, WindowScore)>
    where
        F: FnMut(&Span) -> WindowScore,
    {
        let mut spans = self.windows(words, k);
        let (idx, best) = Self::select_best(&spans, |_, span| score(span))?;
        Some((spans.swap_remove(idx), best))
    }
}

impl Default for WindowAligner {
    fn default() -> Self {
        Self::new(1)
    }
}
