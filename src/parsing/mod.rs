//! FASTA input and output.
//!
//! The reader keeps the **whole** header line as the record identifier:
//!
//! | Input line        | Effect                                         |
//! |-------------------|------------------------------------------------|
//! | `>name desc`      | Starts a record with identifier `>name desc`   |
//! | `ACGT  `          | Appended (trimmed) to the current record       |
//! | blank             | Skipped                                        |
//! | content before `>`| Discarded                                      |
//!
//! Gzip and bgzip compressed files (`.gz`, `.bgz`) are decompressed on the fly.
//!
//! ## Example
//!
//! ```rust
//! use isignify::parsing::fasta::parse_fasta_text;
//!
//! let sequences = parse_fasta_text(">seq1 first\nGATTACA\nGATTACA\n>seq2\nACGT\n");
//! assert_eq!(sequences.get(">seq1 first"), Some("GATTACAGATTACA"));
//! assert_eq!(sequences.len(), 2);
//! ```

use thiserror::Error;

pub mod fasta;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write FASTA record: {0}")]
    Write(String),
}
