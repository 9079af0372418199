//! End-to-end signature analysis.
//!
//! Wires the stages together for one request:
//!
//! 1. Validate the k-mer size (before touching any input)
//! 2. Optionally merge multi-contig sources ([`crate::preprocess`])
//! 3. Parse the target and every background ([`crate::parsing::fasta`])
//! 4. Run the [`crate::signatures::SignatureEngine`]
//! 5. Summarize
//!
//! Read and normalization failures degrade to warnings; an invalid k-mer size
//! rejects the whole request.

pub mod service;

pub use service::{run_analysis, summarize, AnalysisError, AnalysisRequest, AnalysisResult};
