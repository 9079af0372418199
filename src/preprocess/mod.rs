//! Preprocessing of FASTA sources before signature discovery.
//!
//! Multi-contig files are merged into a single synthetic sequence so each input
//! file is analysed as one contiguous sequence. Adjacent contigs are joined by a
//! spacer of [`SPACER_LENGTH`] copies of [`SPACER_SYMBOL`]:
//!
//! ```text
//! >contig1      >contig1
//! AAAA     =>   AAAA<100 x N>CCCC<100 x N>GGGG
//! >contig2
//! CCCC
//! >contig3
//! GGGG
//! ```
//!
//! The spacer is long enough that no realistic k-mer (k up to ~32) spans two
//! contigs without containing a spacer symbol. Spacer-containing k-mers never
//! occur in a background either, so they are reported as unique; this is
//! kept as-is.

pub mod contigs;

pub use contigs::{merge_records, normalize, NormalizeError, Normalized};

/// Placeholder symbol inserted between merged contigs
pub const SPACER_SYMBOL: char = 'N';

/// Number of placeholder symbols between two merged contigs
pub const SPACER_LENGTH: usize = 100;
