use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::region::SignatureRegion;
use crate::core::sequence::SequenceCollection;
use crate::preprocess::SPACER_SYMBOL;
use crate::signatures::index::{kmers, KmerIndex, KmerSize};
use crate::signatures::EngineError;

/// Default k-mer size when none is given
pub const DEFAULT_KMER_SIZE: usize = 21;

/// Configuration for the signature engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of the k-mers compared between target and background
    pub kmer_size: usize,
    /// Worker threads: 0 uses the global rayon pool, 1 runs on the calling thread
    pub threads: usize,
    /// Drop regions made entirely of the contig spacer symbol
    pub drop_spacer_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kmer_size: DEFAULT_KMER_SIZE,
            threads: 0,
            drop_spacer_only: false,
        }
    }
}

enum Execution {
    Sequential,
    GlobalPool,
    Pool(rayon::ThreadPool),
}

/// Finds regions of target sequences whose k-mers never occur in the background
pub struct SignatureEngine {
    k: KmerSize,
    drop_spacer_only: bool,
    execution: Execution,
}

impl SignatureEngine {
    /// Create a sequential engine with default settings for the given k.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidKmerSize` if `kmer_size` is 0.
    pub fn new(kmer_size: usize) -> Result<Self, EngineError> {
        Self::with_config(&EngineConfig {
            kmer_size,
            threads: 1,
            ..EngineConfig::default()
        })
    }

    /// Create an engine from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidKmerSize` if the k-mer size is 0, or
    /// `EngineError::ThreadPool` if a dedicated thread pool cannot be started.
    pub fn with_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let k = KmerSize::new(config.kmer_size)?;

        let execution = match config.threads {
            0 => Execution::GlobalPool,
            1 => Execution::Sequential,
            n => Execution::Pool(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| EngineError::ThreadPool(e.to_string()))?,
            ),
        };

        Ok(Self {
            k,
            drop_spacer_only: config.drop_spacer_only,
            execution,
        })
    }

    #[must_use]
    pub fn kmer_size(&self) -> KmerSize {
        self.k
    }

    /// Find every signature region of every target.
    ///
    /// Regions are ordered by target (collection order), then by ascending start.
    pub fn find_signatures(
        &self,
        targets: &SequenceCollection,
        background: &SequenceCollection,
    ) -> Vec<SignatureRegion> {
        let regions = match &self.execution {
            Execution::Sequential => self.run_sequential(targets, background),
            Execution::GlobalPool => self.run_parallel(targets, background),
            Execution::Pool(pool) => pool.install(|| self.run_parallel(targets, background)),
        };

        info!(
            "Found {} signature region(s) in {} target sequence(s) with k={}",
            regions.len(),
            targets.len(),
            self.k
        );

        regions
    }

    fn run_sequential(
        &self,
        targets: &SequenceCollection,
        background: &SequenceCollection,
    ) -> Vec<SignatureRegion> {
        let index = KmerIndex::build(background, self.k);
        debug!(kmers = index.len(), "Built background index");

        targets
            .iter()
            .flat_map(|(id, sequence)| self.scan_target(id, sequence, &index))
            .collect()
    }

    fn run_parallel(
        &self,
        targets: &SequenceCollection,
        background: &SequenceCollection,
    ) -> Vec<SignatureRegion> {
        // The index is complete before any target is scanned
        let index = KmerIndex::build_parallel(background, self.k);
        debug!(kmers = index.len(), "Built background index");

        let targets: Vec<(&str, &str)> = targets.iter().collect();
        let per_target: Vec<Vec<SignatureRegion>> = targets
            .par_iter()
            .map(|(id, sequence)| self.scan_target(id, sequence, &index))
            .collect();

        per_target.into_iter().flatten().collect()
    }

    /// Scan one target and emit its merged regions
    pub fn scan_target(
        &self,
        sequence_id: &str,
        sequence: &str,
        index: &KmerIndex<'_>,
    ) -> Vec<SignatureRegion> {
        let positions = unique_positions(sequence.as_bytes(), index);

        merge_positions(&positions, self.k)
            .into_iter()
            .map(|(start, end)| {
                SignatureRegion::new(sequence_id, start, end, slice(sequence, start, end))
            })
            .filter(|region| !(self.drop_spacer_only && region.consists_only_of(spacer_byte())))
            .collect()
    }
}

/// Find signature regions with a sequential engine.
///
/// # Errors
///
/// Returns `EngineError::InvalidKmerSize` if `k` is 0; no work is done in that case.
pub fn find_signatures(
    targets: &SequenceCollection,
    background: &SequenceCollection,
    k: usize,
) -> Result<Vec<SignatureRegion>, EngineError> {
    let engine = SignatureEngine::new(k)?;
    Ok(engine.find_signatures(targets, background))
}

/// Start positions of every k-mer of `sequence` missing from the index, ascending
pub fn unique_positions(sequence: &[u8], index: &KmerIndex<'_>) -> Vec<usize> {
    kmers(sequence, index.kmer_size())
        .enumerate()
        .filter(|(_, kmer)| !index.contains(kmer))
        .map(|(pos, _)| pos)
        .collect()
}

/// Merge ascending k-mer start positions into `(start, end)` regions.
///
/// Consecutive positions extend the current run; any larger gap closes it.
/// A run `[first, last]` covers `[first, last + k)`.
///
/// The position runs are disjoint, but the regions of neighbouring runs can
/// overlap by up to `k - 2` symbols.
pub fn merge_positions(positions: &[usize], k: KmerSize) -> Vec<(usize, usize)> {
    let mut regions = Vec::new();
    let Some((&first, rest)) = positions.split_first() else {
        return regions;
    };

    let mut run_start = first;
    let mut run_last = first;
    for &pos in rest {
        if pos == run_last + 1 {
            run_last = pos;
        } else {
            regions.push((run_start, run_last + k.get()));
            run_start = pos;
            run_last = pos;
        }
    }
    regions.push((run_start, run_last + k.get()));

    regions
}

fn slice(sequence: &str, start: usize, end: usize) -> String {
    sequence.get(start..end).map_or_else(
        || String::from_utf8_lossy(&sequence.as_bytes()[start..end]).into_owned(),
        str::to_owned,
    )
}

fn spacer_byte() -> u8 {
    // The spacer symbol is ASCII
    SPACER_SYMBOL as u8
}
