//! Character vocabulary for the embedding backend.
//!
//! A [`CharVocabulary`] maps every character of the normalized alphabet to a
//! stable integer index, with one reserved pad index and one reserved unknown
//! index. [`CharVocabulary::encode`] turns a [`NormalizedText`] into a
//! fixed-width [`EncodedSequence`], the only input shape an
//! embedding model accepts.
//!
//! The vocabulary is loaded once and never mutated. Loading is the one place
//! in the matching pipeline that can fail hard: a malformed resource yields a
//! [`VocabularyLoadError`] and no engine can be built from it.
//!
//! ```
//! use canonical::normalize;
//! use vocab::CharVocabulary;
//!
//! let vocab = CharVocabulary::from_ranked_chars(" elas".chars()).unwrap();
//! let seq = vocab.encode(&normalize("Salle"), 8);
//! assert_eq!(seq.ids(), &[6, 5, 4, 4, 3, 0, 0, 0]);
//! ```
//!
//! [`NormalizedText`]: canonical::NormalizedText

mod encode;
mod error;
mod vocabulary;

pub use crate::encode::EncodedSequence;
pub use crate::error::VocabularyLoadError;
pub use crate::vocabulary::{CharVocabulary, DEFAULT_SEQ_LEN, MAX_SEQ_LEN, UNK_TOKEN};
