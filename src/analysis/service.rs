use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::region::SignatureRegion;
use crate::core::sequence::SequenceCollection;
use crate::core::source::FastaSource;
use crate::parsing::fasta::parse;
use crate::preprocess::{normalize, Normalized};
use crate::signatures::{EngineConfig, EngineError, KmerSize, SignatureEngine};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("At least one background genome is required")]
    MissingBackground,
}

/// One analysis: a target, its backgrounds, and how to compare them
#[derive(Debug)]
pub struct AnalysisRequest {
    pub target: FastaSource,
    pub backgrounds: Vec<FastaSource>,
    /// Signed so that out-of-range values from callers can be rejected, not wrapped
    pub kmer_size: i64,
    /// Merge multi-contig sources before parsing
    pub normalize: bool,
    pub threads: usize,
    pub drop_spacer_only: bool,
}

impl AnalysisRequest {
    pub fn new(target: FastaSource, backgrounds: Vec<FastaSource>, kmer_size: i64) -> Self {
        let defaults = EngineConfig::default();
        Self {
            target,
            backgrounds,
            kmer_size,
            normalize: true,
            threads: defaults.threads,
            drop_spacer_only: defaults.drop_spacer_only,
        }
    }
}

/// Result of an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub signature_count: usize,
    pub kmer_size: usize,
    pub signatures: Vec<SignatureRegion>,
    /// Inputs that could not be read or normalized and were treated as-is or as absent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Human-readable one-line summary of an analysis
#[must_use]
pub fn summarize(signature_count: usize, kmer_size: KmerSize) -> String {
    format!(
        "Analysis complete. Found {signature_count} unique signature(s) using a k-mer size of {kmer_size}."
    )
}

/// Run the full pipeline for one request.
///
/// Temporary files created while merging contigs are removed before this returns.
///
/// # Errors
///
/// Returns `AnalysisError::Engine` if the k-mer size is below 1, or
/// `AnalysisError::MissingBackground` if no background was given. Both are
/// checked before any input is read.
pub fn run_analysis(request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
    let k = KmerSize::try_from(request.kmer_size)?;
    if request.backgrounds.is_empty() {
        return Err(AnalysisError::MissingBackground);
    }

    let engine = SignatureEngine::with_config(&EngineConfig {
        kmer_size: k.get(),
        threads: request.threads,
        drop_spacer_only: request.drop_spacer_only,
    })?;

    let mut warnings = Vec::new();

    let target = prepare(&request.target, request.normalize, &mut warnings);
    let targets = read(target.source(), &mut warnings);

    let mut background = SequenceCollection::new();
    for source in &request.backgrounds {
        let prepared = prepare(source, request.normalize, &mut warnings);
        background.absorb(read(prepared.source(), &mut warnings));
    }

    info!(
        "Comparing {} target sequence(s) ({} bp) against {} background sequence(s) ({} bp)",
        targets.len(),
        targets.total_length(),
        background.len(),
        background.total_length()
    );

    let signatures = engine.find_signatures(&targets, &background);

    Ok(AnalysisResult {
        summary: summarize(signatures.len(), k),
        signature_count: signatures.len(),
        kmer_size: k.get(),
        signatures,
        warnings,
    })
}

fn prepare<'a>(source: &'a FastaSource, merge: bool, warnings: &mut Vec<String>) -> Normalized<'a> {
    if !merge {
        return Normalized::Unchanged(source);
    }

    let normalized = normalize(source);
    match &normalized {
        Normalized::Merged { contigs, .. } => debug!("Merged {contigs} contigs from {source}"),
        Normalized::Fallback { reason, .. } => {
            warnings.push(format!("{source}: normalization skipped ({reason})"));
        }
        Normalized::Unchanged(_) => {}
    }
    normalized
}

fn read(source: &FastaSource, warnings: &mut Vec<String>) -> SequenceCollection {
    let outcome = parse(source);
    if let Some(e) = &outcome.diagnostic {
        warnings.push(format!("{source}: treated as empty ({e})"));
    }
    outcome.into_value()
}
