//! Character n-gram extraction and multiset overlap.
//!
//! Both operations run in O(len) over the number of characters.

use std::collections::HashMap;

/// Multiset of character n-grams: gram -> occurrence count.
pub type GramCounts = HashMap<String, usize>;

/// Cut `text` into overlapping character n-grams, counted as a multiset.
///
/// With `pad`, the text is surrounded by one space on each side first. Empty
/// text yields no grams regardless of padding.
pub fn char_ngrams(text: &str, n: usize, pad: bool) -> GramCounts {
    let mut counts = GramCounts::new();
    if n == 0 || text.is_empty() {
        return counts;
    }

    let mut chars: Vec<char> = Vec::with_capacity(text.len() + 2);
    if pad {
        chars.push(' ');
    }
    chars.extend(text.chars());
    if pad {
        chars.push(' ');
    }

    for gram in chars.windows(n) {
        *counts.entry(gram.iter().collect()).or_insert(0) += 1;
    }
    counts
}

/// Total number of grams in a multiset.
pub fn gram_total(counts: &GramCounts) -> usize {
    counts.values().sum()
}

/// Dice coefficient over two multisets: `2·|A∩B| / (|A|+|B|)`.
///
/// Returns 0 when either side is empty. Identical multisets give exactly 1.
pub fn dice(a: &GramCounts, b: &GramCounts) -> f32 {
    let total = gram_total(a) + gram_total(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Iterate the smaller map.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let shared: usize = small
        .iter()
        .filter_map(|(gram, &count)| large.get(gram).map(|&other| count.min(other)))
        .sum();

    ((2 * shared) as f32 / total as f32).clamp(0.0, 1.0)
}
