use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use canonical::NormalizedText;
use tracing::info;

use crate::encode::EncodedSequence;
use crate::error::VocabularyLoadError;

/// Line content marking the unknown-character entry in a vocabulary file.
pub const UNK_TOKEN: &str = "[UNK]";

/// Default encoded sequence length.
pub const DEFAULT_SEQ_LEN: usize = 200;

/// Longest sequence [`CharVocabulary::encode`] produces.
pub const MAX_SEQ_LEN: usize = 4096;

const PAD_NAME: &str = "pad (empty line)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Pad,
    Unk,
    Char(char),
}

/// Frequency-ordered character table with reserved pad and unknown indices.
///
/// Read-only once built. Its [`len`](Self::len) is the alphabet size an
/// embedding model was trained against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharVocabulary {
    entries: Vec<Entry>,
    index: HashMap<char, u32>,
    pad: u32,
    unk: u32,
}

impl CharVocabulary {
    /// Build from characters ranked most frequent first.
    ///
    /// Index 0 is the pad entry, 1 the unknown entry, characters follow from
    /// index 2 in the given order.
    pub fn from_ranked_chars<I>(chars: I) -> Result<Self, VocabularyLoadError>
    where
        I: IntoIterator<Item = char>,
    {
        let entries = [Entry::Pad, Entry::Unk]
            .into_iter()
            .chain(chars.into_iter().map(Entry::Char));
        Self::from_entries(entries)
    }

    /// Rank the characters of a corpus by count, most frequent first, ties
    /// broken by first appearance.
    pub fn from_corpus<'a, I>(texts: I) -> Result<Self, VocabularyLoadError>
    where
        I: IntoIterator<Item = &'a NormalizedText>,
    {
        // char -> (count, first position)
        let mut stats: HashMap<char, (usize, usize)> = HashMap::new();
        let mut position = 0usize;
        for text in texts {
            for ch in text.as_str().chars() {
                stats.entry(ch).or_insert((0, position)).0 += 1;
                position += 1;
            }
        }

        let mut ranked: Vec<(char, usize, usize)> = stats
            .into_iter()
            .map(|(ch, (count, first))| (ch, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        Self::from_ranked_chars(ranked.into_iter().map(|(ch, _, _)| ch))
    }

    /// Parse a vocabulary resource: one entry per line, index = line number.
    ///
    /// An empty line is the pad entry and [`UNK_TOKEN`] the unknown entry;
    /// each must appear exactly once. Every other line holds one character.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, VocabularyLoadError> {
        let mut entries = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            let entry = if line.is_empty() {
                Entry::Pad
            } else if line == UNK_TOKEN {
                Entry::Unk
            } else {
                let mut chars = line.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Entry::Char(ch),
                    _ => {
                        return Err(VocabularyLoadError::MultiCharEntry {
                            line: i + 1,
                            entry: line.to_string(),
                        })
                    }
                }
            };
            entries.push(entry);
        }
        Self::from_entries(entries)
    }

    /// Load a vocabulary file from disk. See [`from_reader`](Self::from_reader).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VocabularyLoadError> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = File::open(path)?;
        let vocab = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            size = vocab.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "vocabulary_loaded"
        );
        Ok(vocab)
    }

    fn from_entries<I>(entries: I) -> Result<Self, VocabularyLoadError>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut kept = Vec::new();
        let mut index: HashMap<char, u32> = HashMap::new();
        let mut pad = None;
        let mut unk = None;

        for (i, entry) in entries.into_iter().enumerate() {
            let id = i as u32;
            match entry {
                Entry::Pad => {
                    if pad.replace(id).is_some() {
                        return Err(VocabularyLoadError::DuplicateReserved {
                            token: PAD_NAME,
                            line: i + 1,
                        });
                    }
                }
                Entry::Unk => {
                    if unk.replace(id).is_some() {
                        return Err(VocabularyLoadError::DuplicateReserved {
                            token: UNK_TOKEN,
                            line: i + 1,
                        });
                    }
                }
                Entry::Char(ch) => {
                    if let Some(&first) = index.get(&ch) {
                        return Err(VocabularyLoadError::DuplicateChar {
                            ch,
                            line: i + 1,
                            first_line: first as usize + 1,
                        });
                    }
                    index.insert(ch, id);
                }
            }
            kept.push(entry);
        }

        if index.is_empty() {
            return Err(VocabularyLoadError::Empty);
        }
        let pad = pad.ok_or(VocabularyLoadError::MissingReserved { token: PAD_NAME })?;
        let unk = unk.ok_or(VocabularyLoadError::MissingReserved { token: UNK_TOKEN })?;

        Ok(Self {
            entries: kept,
            index,
            pad,
            unk,
        })
    }

    /// Total number of entries, reserved ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pad_index(&self) -> u32 {
        self.pad
    }

    pub fn unk_index(&self) -> u32 {
        self.unk
    }

    /// Index of `ch`, or `None` when it is not in the vocabulary.
    pub fn index_of(&self, ch: char) -> Option<u32> {
        self.index.get(&ch).copied()
    }

    /// Character stored at `index`, `None` for reserved or out-of-range ids.
    pub fn char_at(&self, index: u32) -> Option<char> {
        match self.entries.get(index as usize) {
            Some(Entry::Char(ch)) => Some(*ch),
            _ => None,
        }
    }

    /// Characters in index order, reserved entries skipped.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().filter_map(|e| match e {
            Entry::Char(ch) => Some(*ch),
            _ => None,
        })
    }

    /// Map each character to its index (unknown index if absent), then
    /// truncate or pad to exactly `seq_len` ids. `seq_len` is capped at
    /// [`MAX_SEQ_LEN`].
    pub fn encode(&self, text: &NormalizedText, seq_len: usize) -> EncodedSequence {
        let seq_len = seq_len.min(MAX_SEQ_LEN);
        let mut ids: Vec<u32> = text
            .as_str()
            .chars()
            .take(seq_len)
            .map(|ch| self.index_of(ch).unwrap_or(self.unk))
            .collect();
        let real_len = ids.len();
        ids.resize(seq_len, self.pad);
        EncodedSequence::new(ids, real_len)
    }
}
