//! Transcript normalization layer.
//!
//! Speech-to-text output is noisy in ways that do not matter for
//! confirmation: casing, accents, stray punctuation, doubled spaces. This
//! crate maps raw transcripts and reference values onto one restricted
//! alphabet so the scorers compare like with like.
//!
//! ## What we do
//!
//! - Locale-free Unicode lowercasing
//! - NFD decomposition, then drop non-spacing marks (`é` -> `e`)
//! - Fold a few undecomposable letters (`œ` -> `oe`, `ß` -> `ss`)
//! - Every character outside `[a-z0-9]` + the configured symbols becomes a
//!   word delimiter (`"Dr. Bernard"` -> `"dr bernard"`)
//! - Collapse whitespace to single spaces, trim both ends
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no locale. Same text + same config = same output, and
//! the output is a fixed point of the normalizer.

mod config;
mod error;
mod pipeline;
mod text;

pub use crate::config::{NormalizerConfig, DEFAULT_ALLOWED_SYMBOLS};
pub use crate::error::CanonicalError;
pub use crate::pipeline::{normalize, Normalizer};
pub use crate::text::NormalizedText;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_accents() {
        assert_eq!(normalize("CHOLÉCYSTECTOMIE").as_str(), "cholecystectomie");
        assert_eq!(normalize("Génou GAUCHE").as_str(), "genou gauche");
        assert_eq!(normalize("Hélène Lefèvre").as_str(), "helene lefevre");
    }

    #[test]
    fn composed_and_decomposed_forms_agree() {
        let composed = "Caf\u{00E9}";
        let decomposed = "Cafe\u{0301}";
        assert_eq!(normalize(composed), normalize(decomposed));
        assert_eq!(normalize(composed).as_str(), "cafe");
    }

    #[test]
    fn punctuation_becomes_a_delimiter() {
        assert_eq!(normalize("Dr. Bernard").as_str(), "dr bernard");
        assert_eq!(normalize("l'appendicite").as_str(), "l appendicite");
        assert_eq!(
            normalize("Hypothermie, allergie, infection.").as_str(),
            "hypothermie allergie infection"
        );
    }

    #[test]
    fn allowed_symbols_survive() {
        assert_eq!(normalize("opération à 10:30").as_str(), "operation a 10:30");
        assert_eq!(normalize("le 12/05").as_str(), "le 12/05");
        assert_eq!(normalize("Jean-Pierre").as_str(), "jean-pierre");
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        assert_eq!(normalize("  Salle \t\n  3  ").as_str(), "salle 3");
        assert_eq!(normalize("\u{00A0}salle\u{00A0}\u{00A0}4").as_str(), "salle 4");
    }

    #[test]
    fn ligatures_are_folded() {
        assert_eq!(normalize("Cœur").as_str(), "coeur");
        assert_eq!(normalize("Straße").as_str(), "strasse");
        assert_eq!(normalize("Ærø").as_str(), "aero");
    }

    #[test]
    fn out_of_alphabet_only_input_is_empty() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize("!!! ??? ...").is_empty());
        assert!(normalize("日本語").is_empty());
        assert!(normalize("\u{1f600}").is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "",
            "Le patient est Paul Dupont, opération à 10:30 en salle 4 avec le Dr. Bernard",
            "  Génou   GAUCHE  ,",
            "insuline + anticoagulant",
            "İstanbul",
            "Ǆemal",
            "Œdème — ÉPAULE/droite",
            "a\u{10348}b  c",
            "x\u{0301}\u{0302}y",
            "--::// --",
        ];
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn output_stays_in_alphabet() {
        let text = normalize("Ça coûte 12€ — 3½ fois plus ! ʼnʼ");
        assert!(text
            .as_str()
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || ":/- ".contains(c)));
        assert!(!text.as_str().contains("  "));
        assert_eq!(text.as_str(), text.as_str().trim());
    }

    #[test]
    fn custom_symbol_set() {
        let normalizer = Normalizer::new(NormalizerConfig {
            allowed_symbols: String::new(),
            ..Default::default()
        })
        .expect("valid config");
        assert_eq!(normalizer.normalize("10:30").as_str(), "10 30");

        let with_dot = Normalizer::new(NormalizerConfig {
            allowed_symbols: ".".into(),
            ..Default::default()
        })
        .expect("valid config");
        assert_eq!(with_dot.normalize("Dr. Bernard").as_str(), "dr. bernard");
    }

    #[test]
    fn invalid_config_rejected() {
        let res = Normalizer::new(NormalizerConfig {
            version: 0,
            ..Default::default()
        });
        assert!(matches!(res, Err(CanonicalError::InvalidConfig(_))));
    }
}
