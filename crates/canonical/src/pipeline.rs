use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizerConfig;
use crate::error::CanonicalError;
use crate::text::NormalizedText;

/// Transcript normalizer.
///
/// Built once from a validated [`NormalizerConfig`]; [`normalize`](Self::normalize)
/// is then total and side-effect free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    cfg: NormalizerConfig,
}

impl Normalizer {
    pub fn new(cfg: NormalizerConfig) -> Result<Self, CanonicalError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.cfg
    }

    /// Lowercase, strip diacritics, turn out-of-alphabet characters into word
    /// delimiters and collapse whitespace.
    ///
    /// Never fails: unrecognized characters are dropped. The output is a fixed
    /// point, `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(&self, input: &str) -> NormalizedText {
        let mut out = String::with_capacity(input.len());
        let mut pending_space = false;

        // Lowercasing can expand a single character (e.g. `İ` -> `i̇`), so it
        // runs before decomposition.
        for ch in input.chars().flat_map(char::to_lowercase).nfd() {
            if ch.is_mark_nonspacing() {
                continue;
            }
            if let Some(folded) = fold_ligature(ch) {
                for f in folded.chars() {
                    append_char(f, &mut out, &mut pending_space);
                }
                continue;
            }
            if self.is_allowed(ch) {
                append_char(ch, &mut out, &mut pending_space);
            } else if !out.is_empty() {
                pending_space = true;
            }
        }

        NormalizedText::new_unchecked(out)
    }

    fn is_allowed(&self, ch: char) -> bool {
        ch.is_ascii_lowercase() || ch.is_ascii_digit() || self.cfg.allowed_symbols.contains(ch)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            cfg: NormalizerConfig::default(),
        }
    }
}

/// Normalize with the default configuration.
pub fn normalize(input: &str) -> NormalizedText {
    Normalizer::default().normalize(input)
}

/// Letters that do not decompose under NFD but have a plain ASCII spelling.
fn fold_ligature(ch: char) -> Option<&'static str> {
    match ch {
        'œ' => Some("oe"),
        'æ' => Some("ae"),
        'ß' => Some("ss"),
        'ø' => Some("o"),
        'ł' => Some("l"),
        'đ' => Some("d"),
        _ => None,
    }
}

/// Appends a kept character, flushing a pending word separator first.
fn append_char(ch: char, out: &mut String, pending_space: &mut bool) {
    if *pending_space {
        out.push(' ');
        *pending_space = false;
    }
    out.push(ch);
}
