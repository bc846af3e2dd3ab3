use std::fmt;

use serde::Serialize;

/// Text that went through [`Normalizer::normalize`](crate::Normalizer::normalize).
///
/// Only the normalizer can build one, so holding a `NormalizedText` proves the
/// content is lowercase, accent-free, restricted to the configured alphabet,
/// with single spaces between words and no leading or trailing space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub(crate) fn new_unchecked(text: String) -> Self {
        Self(text)
    }

    /// The empty normalized text.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Words of the text, split on the single-space separator.
    pub fn words(&self) -> Vec<&str> {
        self.0.split(' ').filter(|w| !w.is_empty()).collect()
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.0.split(' ').filter(|w| !w.is_empty()).count()
    }

    /// Joins a contiguous word slice back into normalized text.
    ///
    /// The words must come from [`words`](Self::words) of some normalized
    /// text; joining them with single spaces keeps every invariant.
    pub fn from_words(words: &[&str]) -> Self {
        Self(words.join(" "))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    #[test]
    fn words_and_counts() {
        let text = normalize("  Salle   TROIS ");
        assert_eq!(text.words(), vec!["salle", "trois"]);
        assert_eq!(text.word_count(), 2);
        assert_eq!(text.char_len(), 11);
    }

    #[test]
    fn empty_has_no_words() {
        let text = NormalizedText::empty();
        assert!(text.is_empty());
        assert!(text.words().is_empty());
        assert_eq!(text.word_count(), 0);
    }

    #[test]
    fn from_words_roundtrips_a_slice() {
        let text = normalize("le patient paul dupont");
        let words = text.words();
        let span = NormalizedText::from_words(&words[2..4]);
        assert_eq!(span.as_str(), "paul dupont");
        assert_eq!(normalize(span.as_str()), span);
    }

    #[test]
    fn display_matches_inner_text() {
        let text = normalize("Salle 3");
        assert_eq!(text.to_string(), "salle 3");
        assert_eq!(text.into_string(), "salle 3");
    }
}
