//! Signature discovery: k-mer indexing of background genomes and scanning of targets.
//!
//! This module provides:
//!
//! - [`KmerSize`]: A validated k (always at least 1)
//! - [`KmerIndex`]: The set of every background k-mer, built once and shared read-only
//! - [`SignatureEngine`]: Scans targets against the index and merges unique k-mers
//!
//! ## Algorithm
//!
//! 1. **Index**: collect every length-k window (stride 1) of every background sequence
//! 2. **Scan**: for each target, record the start of every window missing from the index
//! 3. **Merge**: consecutive starts `p`, `p + 1` belong to the same run; a larger jump
//!    closes it. A run `[s, l]` becomes the region `[s, l + k)`
//! 4. **Emit**: slice each region out of its target
//!
//! Output is ordered by target, then by ascending start.
//!
//! ## Example
//!
//! ```rust
//! use isignify::core::sequence::SequenceCollection;
//! use isignify::signatures::find_signatures;
//!
//! let targets: SequenceCollection = [(">t1", "AAAGATTACACCC")].into_iter().collect();
//! let background: SequenceCollection = [(">b1", "AAACCC")].into_iter().collect();
//!
//! let regions = find_signatures(&targets, &background, 4).unwrap();
//! assert_eq!(regions.len(), 1);
//! assert_eq!(regions[0].sequence, "AAAGATTACACC");
//! ```

use thiserror::Error;

pub mod engine;
pub mod index;

pub use engine::{find_signatures, EngineConfig, SignatureEngine, DEFAULT_KMER_SIZE};
pub use index::{KmerIndex, KmerSize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid k-mer size {0}: must be at least 1")]
    InvalidKmerSize(i64),

    #[error("Failed to start worker threads: {0}")]
    ThreadPool(String),
}
