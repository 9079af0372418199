use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker that opens a FASTA header line
pub const RECORD_MARKER: char = '>';

/// A single FASTA record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Full header line including the leading marker (e.g. `>seq1 description`)
    pub identifier: String,

    /// Concatenated sequence lines, no line breaks
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(identifier: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            sequence: sequence.into(),
        }
    }

    /// Header text: the identifier without its leading marker, whitespace untouched
    #[must_use]
    pub fn header(&self) -> &str {
        self.identifier
            .strip_prefix(RECORD_MARKER)
            .unwrap_or(&self.identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Insertion-ordered mapping from identifier to sequence.
///
/// Keys are unique; iteration order is the order identifiers were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceCollection {
    sequences: IndexMap<String, String>,
}

impl SequenceCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sequence, replacing any previous one with the same identifier.
    ///
    /// A replaced identifier keeps its original position.
    pub fn insert(&mut self, identifier: impl Into<String>, sequence: impl Into<String>) {
        self.sequences.insert(identifier.into(), sequence.into());
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.sequences.get(identifier).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Iterate `(identifier, sequence)` pairs in insertion order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.sequences
            .iter()
            .map(|(id, seq)| (id.as_str(), seq.as_str()))
    }

    /// Sum of all sequence lengths
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.sequences.values().map(String::len).sum()
    }

    /// Merge another collection into this one, in its order
    pub fn absorb(&mut self, other: SequenceCollection) {
        self.sequences.extend(other.sequences);
    }

    #[must_use]
    pub fn into_records(self) -> Vec<SequenceRecord> {
        self.sequences
            .into_iter()
            .map(|(identifier, sequence)| SequenceRecord {
                identifier,
                sequence,
            })
            .collect()
    }
}

impl<I: Into<String>, S: Into<String>> FromIterator<(I, S)> for SequenceCollection {
    fn from_iter<T: IntoIterator<Item = (I, S)>>(iter: T) -> Self {
        let mut collection = Self::new();
        for (identifier, sequence) in iter {
            collection.insert(identifier, sequence);
        }
        collection
    }
}
