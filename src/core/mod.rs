//! Core data types for signature discovery.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`SequenceRecord`](sequence::SequenceRecord): A single FASTA record (full header line plus sequence)
//! - [`SequenceCollection`](sequence::SequenceCollection): Insertion-ordered mapping of identifier to sequence
//! - [`SignatureRegion`](region::SignatureRegion): A maximal stretch of target-only sequence
//! - [`FastaSource`](source::FastaSource): Where FASTA text comes from (a path, in-memory text, or a temp file)
//! - [`BestEffort`](types::BestEffort): A value paired with an optional diagnostic
//!
//! ## Identifiers
//!
//! Identifiers are the **full** header line, marker included:
//!
//! | FASTA header            | Identifier              |
//! |-------------------------|-------------------------|
//! | `>chr1`                 | `>chr1`                 |
//! | `>seq1 plasmid, complete` | `>seq1 plasmid, complete` |
//!
//! They are never split into name and description except when a record is
//! written back out as FASTA.

pub mod region;
pub mod sequence;
pub mod source;
pub mod types;
