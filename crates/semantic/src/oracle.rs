use vocab::EncodedSequence;

use crate::error::OracleError;

/// A capability that turns a fixed-length character index sequence into a
/// fixed-dimension vector.
///
/// Implementations must be deterministic for matching to be repeatable, and
/// shareable across threads: the engine holds one behind an `Arc` and may call
/// it from several workers.
pub trait EmbeddingOracle: Send + Sync {
    /// Embed one sequence. The vector has exactly [`dimension`](Self::dimension) entries.
    fn embed(&self, seq: &EncodedSequence) -> Result<Vec<f32>, OracleError>;

    /// Embed several sequences, in order.
    ///
    /// The default calls [`embed`](Self::embed) per sequence; backends with
    /// real batching override it.
    fn embed_batch(&self, seqs: &[EncodedSequence]) -> Result<Vec<Vec<f32>>, OracleError> {
        seqs.iter().map(|seq| self.embed(seq)).collect()
    }

    fn dimension(&self) -> usize;

    /// Short backend label for logs.
    fn name(&self) -> &str;
}
