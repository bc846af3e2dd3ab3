use fxhash::hash64;
use vocab::EncodedSequence;

use crate::error::{OracleError, OracleUnavailable};
use crate::normalize::l2_normalize_in_place;
use crate::oracle::EmbeddingOracle;

/// Marker standing for the sequence boundary, outside any vocabulary range.
const BOUNDARY: u32 = u32::MAX;

/// Deterministic oracle hashing index trigrams into a count vector.
///
/// Each real position of the sequence (padding excluded) is read with one
/// boundary marker on both sides; every index trigram lands in bucket
/// `hash % dimension`. The vector is then L2-normalized, so cosine similarity
/// between two outputs approximates trigram overlap. No model file, no
/// allocation beyond the output. Empty sequences embed to the zero vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedNgramOracle {
    dimension: usize,
}

impl HashedNgramOracle {
    pub fn new(dimension: usize) -> Result<Self, OracleUnavailable> {
        if dimension == 0 {
            return Err(OracleUnavailable::InvalidConfig(
                "dimension must be >= 1".into(),
            ));
        }
        Ok(Self { dimension })
    }
}

impl EmbeddingOracle for HashedNgramOracle {
    fn embed(&self, seq: &EncodedSequence) -> Result<Vec<f32>, OracleError> {
        let mut v = vec![0f32; self.dimension];
        let ids = seq.real_ids();
        if ids.is_empty() {
            return Ok(v);
        }

        let mut padded = Vec::with_capacity(ids.len() + 2);
        padded.push(BOUNDARY);
        padded.extend_from_slice(ids);
        padded.push(BOUNDARY);

        for gram in padded.windows(3) {
            let bucket = (hash64(gram) % self.dimension as u64) as usize;
            v[bucket] += 1.0;
        }
        l2_normalize_in_place(&mut v);
        Ok(v)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashed-trigram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosine_similarity;
    use canonical::normalize;
    use vocab::CharVocabulary;

    fn vocab() -> CharVocabulary {
        CharVocabulary::from_ranked_chars(" abcdefghijklmnopqrstuvwxyz0123456789:/-".chars()).unwrap()
    }

    fn embed(oracle: &HashedNgramOracle, text: &str) -> Vec<f32> {
        oracle.embed(&vocab().encode(&normalize(text), 64)).unwrap()
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(HashedNgramOracle::new(0).is_err());
    }

    #[test]
    fn output_has_configured_dimension() {
        let oracle = HashedNgramOracle::new(96).unwrap();
        assert_eq!(embed(&oracle, "salle trois").len(), 96);
        assert_eq!(oracle.dimension(), 96);
    }

    #[test]
    fn deterministic() {
        let oracle = HashedNgramOracle::new(256).unwrap();
        assert_eq!(embed(&oracle, "marie dupont"), embed(&oracle, "marie dupont"));
    }

    #[test]
    fn unit_length_for_non_empty_input() {
        let oracle = HashedNgramOracle::new(256).unwrap();
        let v = embed(&oracle, "a");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm = {norm}");
    }

    #[test]
    fn empty_input_is_zero_vector() {
        let oracle = HashedNgramOracle::new(32).unwrap();
        assert!(embed(&oracle, "").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn identical_texts_have_cosine_one() {
        let oracle = HashedNgramOracle::new(512).unwrap();
        let a = embed(&oracle, "genou gauche");
        let b = embed(&oracle, "Génou GAUCHE");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn related_texts_score_above_unrelated() {
        let oracle = HashedNgramOracle::new(1024).unwrap();
        let target = embed(&oracle, "cholecystectomie");
        let close = embed(&oracle, "cholecystectomi");
        let far = embed(&oracle, "salle quatre");
        assert!(cosine_similarity(&target, &close) > cosine_similarity(&target, &far));
    }

    #[test]
    fn padding_does_not_change_embedding() {
        let oracle = HashedNgramOracle::new(128).unwrap();
        let v = vocab();
        let short = oracle.embed(&v.encode(&normalize("salle"), 8)).unwrap();
        let long = oracle.embed(&v.encode(&normalize("salle"), 200)).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn default_batch_matches_single_calls() {
        let oracle = HashedNgramOracle::new(64).unwrap();
        let v = vocab();
        let seqs = vec![
            v.encode(&normalize("salle trois"), 32),
            v.encode(&normalize("salle quatre"), 32),
        ];
        let batch = oracle.embed_batch(&seqs).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], oracle.embed(&seqs[0]).unwrap());
        assert_eq!(batch[1], oracle.embed(&seqs[1]).unwrap());
    }
}
