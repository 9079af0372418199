use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;

use crate::core::sequence::SequenceCollection;
use crate::signatures::EngineError;

/// A k-mer length that is known to be at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmerSize(usize);

impl KmerSize {
    /// # Errors
    ///
    /// Returns `EngineError::InvalidKmerSize` if `k` is 0.
    pub fn new(k: usize) -> Result<Self, EngineError> {
        if k == 0 {
            return Err(EngineError::InvalidKmerSize(0));
        }
        Ok(Self(k))
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for KmerSize {
    type Error = EngineError;

    fn try_from(k: i64) -> Result<Self, Self::Error> {
        usize::try_from(k)
            .ok()
            .filter(|&k| k >= 1)
            .map(Self)
            .ok_or(EngineError::InvalidKmerSize(k))
    }
}

impl fmt::Display for KmerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All length-k windows of a sequence, stride 1, positions `0..=len - k`
pub fn kmers(sequence: &[u8], k: KmerSize) -> std::slice::Windows<'_, u8> {
    sequence.windows(k.get())
}

/// Every k-mer present in a background collection.
///
/// Windows borrow from the collection; the index cannot be modified once built.
#[derive(Debug)]
pub struct KmerIndex<'a> {
    k: KmerSize,
    kmers: HashSet<&'a [u8]>,
}

impl<'a> KmerIndex<'a> {
    /// Build the index on the current thread
    pub fn build(background: &'a SequenceCollection, k: KmerSize) -> Self {
        let mut set = HashSet::new();
        for (_, sequence) in background.iter() {
            set.extend(kmers(sequence.as_bytes(), k));
        }
        Self { k, kmers: set }
    }

    /// Build the index with one partial set per background sequence, then union them.
    ///
    /// Runs on the current rayon pool.
    pub fn build_parallel(background: &'a SequenceCollection, k: KmerSize) -> Self {
        let sequences: Vec<&'a str> = background.iter().map(|(_, seq)| seq).collect();

        let set = sequences
            .par_iter()
            .map(|&sequence| kmers(sequence.as_bytes(), k).collect::<HashSet<&'a [u8]>>())
            .reduce(HashSet::new, |mut a, mut b| {
                if a.len() < b.len() {
                    std::mem::swap(&mut a, &mut b);
                }
                a.extend(b);
                a
            });

        Self { k, kmers: set }
    }

    #[must_use]
    pub fn kmer_size(&self) -> KmerSize {
        self.k
    }

    #[must_use]
    pub fn contains(&self, kmer: &[u8]) -> bool {
        self.kmers.contains(kmer)
    }

    /// Number of distinct k-mers
    #[must_use]
    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }
}
