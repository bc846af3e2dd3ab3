/// Fixed-length vocabulary indices fed to an embedding backend.
///
/// Always exactly `seq_len` ids long: real characters first, pad index after.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedSequence {
    ids: Vec<u32>,
    real_len: usize,
}

impl EncodedSequence {
    pub(crate) fn new(ids: Vec<u32>, real_len: usize) -> Self {
        debug_assert!(real_len <= ids.len());
        Self { ids, real_len }
    }

    /// All ids, padding included.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Ids of the encoded characters, without trailing padding.
    pub fn real_ids(&self) -> &[u32] {
        &self.ids[..self.real_len]
    }

    /// Fixed sequence length.
    pub fn seq_len(&self) -> usize {
        self.ids.len()
    }

    /// Number of non-pad positions.
    pub fn real_len(&self) -> usize {
        self.real_len
    }

    pub fn is_blank(&self) -> bool {
        self.real_len == 0
    }
}
