//! # isignify
//!
//! A library for finding DNA signatures: stretches of a target genome that do
//! not occur in any of a set of background genomes.
//!
//! Every length-k substring (k-mer) of the backgrounds is indexed. Each target
//! position whose k-mer is missing from the index is "unique", and runs of
//! consecutive unique positions are merged into signature regions.
//!
//! ## Features
//!
//! - **Exact matching**: k-mers are compared byte for byte, no mismatches
//! - **Contig merging**: multi-contig assemblies are joined with `N` spacers
//! - **Best-effort input**: unreadable files degrade to empty input with a warning
//! - **Parallel scanning**: optional rayon thread pool for large genomes
//!
//! ## Example
//!
//! ```rust
//! use isignify::parsing::fasta::parse_fasta_text;
//! use isignify::SignatureEngine;
//!
//! let targets = parse_fasta_text(">target\nAAATTTGGGCCC\n");
//! let background = parse_fasta_text(">background\nAAACCC\n");
//!
//! let engine = SignatureEngine::new(3).unwrap();
//! let regions = engine.find_signatures(&targets, &background);
//!
//! assert_eq!(regions.len(), 1);
//! assert_eq!(regions[0].sequence, "AATTTGGGCC");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Sequence records, collections, sources and regions
//! - [`parsing`]: FASTA reading and writing
//! - [`preprocess`]: Merging multi-contig files into one sequence
//! - [`signatures`]: K-mer index and signature engine
//! - [`analysis`]: End-to-end analysis of one request
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for browser-based analysis

pub mod analysis;
pub mod cli;
pub mod core;
pub mod parsing;
pub mod preprocess;
pub mod signatures;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use analysis::{run_analysis, AnalysisRequest, AnalysisResult};
pub use core::region::SignatureRegion;
pub use core::sequence::{SequenceCollection, SequenceRecord};
pub use core::source::FastaSource;
pub use core::types::*;
pub use signatures::{find_signatures, EngineConfig, SignatureEngine};
