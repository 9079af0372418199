//! Line-oriented FASTA reader and noodles-backed FASTA writer.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use tracing::{debug, warn};

use crate::core::sequence::{SequenceCollection, SequenceRecord, RECORD_MARKER};
use crate::core::source::FastaSource;
use crate::core::types::BestEffort;
use crate::parsing::ParseError;

/// Symbols per line when writing FASTA
pub const LINE_WIDTH: usize = 80;

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    // Check for gzipped FASTA
    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    // Check for uncompressed FASTA
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a source for line-by-line reading
fn open_source(source: &FastaSource) -> std::io::Result<Box<dyn BufRead + '_>> {
    match source {
        FastaSource::Text(text) => Ok(Box::new(text.as_bytes())),
        FastaSource::Path(path) => open_path(path),
        FastaSource::Temp(file) => open_path(file.path()),
    }
}

fn open_path(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        // MultiGzDecoder also handles bgzip, which is a series of gzip members
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read every record from a source.
///
/// # Errors
///
/// Returns `ParseError::Io` if the source cannot be opened or read.
pub fn read_fasta(source: &FastaSource) -> Result<SequenceCollection, ParseError> {
    let reader = open_source(source)?;
    read_fasta_reader(reader)
}

/// Read every record from a buffered reader.
///
/// Records sharing an identifier collapse into one entry: the later sequence
/// wins and keeps the first entry's position. Invalid UTF-8 is decoded lossily
/// rather than rejected.
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails part way through.
pub fn read_fasta_reader<R: BufRead>(reader: R) -> Result<SequenceCollection, ParseError> {
    let sequences: SequenceCollection = read_records_reader(reader)?
        .into_iter()
        .map(|record| (record.identifier, record.sequence))
        .collect();

    debug!(
        records = sequences.len(),
        symbols = sequences.total_length(),
        "Parsed FASTA"
    );

    Ok(sequences)
}

/// Read every record of a source in file order, duplicates included.
///
/// # Errors
///
/// Returns `ParseError::Io` if the source cannot be opened or read.
pub fn read_records(source: &FastaSource) -> Result<Vec<SequenceRecord>, ParseError> {
    let reader = open_source(source)?;
    read_records_reader(reader)
}

/// Read every record from a buffered reader in file order, one per header line.
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails part way through.
pub fn read_records_reader<R: BufRead>(mut reader: R) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records: Vec<SequenceRecord> = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(RECORD_MARKER) {
            records.push(SequenceRecord::new(line, String::new()));
        } else if let Some(record) = records.last_mut() {
            record.sequence.push_str(line);
        }
        // Content before the first header has no record to attach to
    }

    Ok(records)
}

/// Parse FASTA held in memory. Never fails.
pub fn parse_fasta_text(text: &str) -> SequenceCollection {
    // Reading from a byte slice cannot produce an IO error
    read_fasta_reader(text.as_bytes()).unwrap_or_default()
}

/// Parse a source, degrading to an empty collection on failure.
///
/// The failure is kept as a diagnostic and logged; it never propagates.
pub fn parse(source: &FastaSource) -> BestEffort<SequenceCollection, ParseError> {
    match read_fasta(source) {
        Ok(sequences) => BestEffort::ok(sequences),
        Err(e) => {
            warn!("Could not read FASTA from {source}: {e}");
            BestEffort::empty(e)
        }
    }
}

/// Parse a source, returning an empty collection if it is missing or unreadable
pub fn parse_or_empty(source: &FastaSource) -> SequenceCollection {
    parse(source).into_value()
}

/// Write a single record as FASTA, wrapping sequence lines at [`LINE_WIDTH`].
///
/// # Errors
///
/// Returns `ParseError::Write` if the underlying writer fails.
pub fn write_record<W: Write>(writer: W, record: &SequenceRecord) -> Result<(), ParseError> {
    // The whole header goes in the name so its whitespace is written back unchanged
    let header = record.header().as_bytes().to_vec();
    let definition = fasta::record::Definition::new(header, None);
    let sequence = fasta::record::Sequence::from(record.sequence.as_bytes().to_vec());
    let fasta_record = fasta::Record::new(definition, sequence);

    // The noodles writer wraps at 80 symbols by default
    let mut fasta_writer = fasta::io::Writer::new(writer);

    fasta_writer
        .write_record(&fasta_record)
        .map_err(|e| ParseError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MULTI_LINE: &str = "
>seq1 header for sequence one
GATTACA
GATTACA
>seq2 another sequence
AGCTAGCT
>seq3_third_sequence with no newline at end
ACGT";

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Genome.FNA")));

        assert!(!is_fasta_file(Path::new("test.bam")));
        assert!(!is_fasta_file(Path::new("test.fai")));
    }

    #[test]
    fn test_parse_multi_line_records() {
        let sequences = parse_fasta_text(MULTI_LINE);

        let pairs: Vec<(&str, &str)> = sequences.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (">seq1 header for sequence one", "GATTACAGATTACA"),
                (">seq2 another sequence", "AGCTAGCT"),
                (">seq3_third_sequence with no newline at end", "ACGT"),
            ]
        );
    }

    #[test]
    fn test_parse_file() {
        let mut temp = NamedTempFile::with_suffix(".fna").unwrap();
        temp.write_all(MULTI_LINE.as_bytes()).unwrap();
        temp.flush().unwrap();

        let outcome = parse(&FastaSource::from_path(temp.path()));
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value.len(), 3);
    }

    #[test]
    fn test_missing_file_is_empty_not_error() {
        let source = FastaSource::from_path("nonexistent/path/to/file.fna");

        let outcome = parse(&source);
        assert!(outcome.value.is_empty());
        assert!(matches!(outcome.diagnostic, Some(ParseError::Io(_))));

        assert!(parse_or_empty(&source).is_empty());
        assert!(read_fasta(&source).is_err());
    }

    #[test]
    fn test_content_before_header_is_discarded() {
        let sequences = parse_fasta_text("ACGTACGT\n>seq1\nGGGG\n");
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences.get(">seq1"), Some("GGGG"));
    }

    #[test]
    fn test_blank_lines_and_whitespace() {
        let sequences = parse_fasta_text(">seq1 padded   \r\n  AC  \r\n\r\n   \nGT\t\n");
        assert_eq!(sequences.get(">seq1 padded"), Some("ACGT"));
    }

    #[test]
    fn test_header_without_sequence() {
        let sequences = parse_fasta_text(">empty\n>full\nAAA\n");
        assert_eq!(sequences.get(">empty"), Some(""));
        assert_eq!(sequences.get(">full"), Some("AAA"));
    }

    #[test]
    fn test_duplicate_header_resets_sequence() {
        let sequences = parse_fasta_text(">a\nAAAA\n>b\nCCCC\n>a\nGG\n");
        let pairs: Vec<(&str, &str)> = sequences.iter().collect();
        assert_eq!(pairs, vec![(">a", "GG"), (">b", "CCCC")]);
    }

    #[test]
    fn test_parse_gzipped_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        let mut encoder = GzEncoder::new(temp.reopen().unwrap(), Compression::default());
        encoder.write_all(b">chr1\nACGT\nAC\n").unwrap();
        encoder.finish().unwrap();

        let sequences = read_fasta(&FastaSource::from_path(temp.path())).unwrap();
        assert_eq!(sequences.get(">chr1"), Some("ACGTAC"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_fasta_text("").is_empty());
        assert!(parse_fasta_text("\n\n  \n").is_empty());
    }

    #[test]
    fn test_write_record_round_trip() {
        let record = SequenceRecord::new(">merged first contig", "A".repeat(200));

        let mut out = Vec::new();
        write_record(&mut out, &record).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(">merged first contig\n"));
        assert!(text.lines().skip(1).all(|line| line.len() <= LINE_WIDTH));

        let parsed = parse_fasta_text(&text);
        assert_eq!(parsed.get(">merged first contig"), Some(record.sequence.as_str()));
    }

    #[test]
    fn test_read_records_keeps_repeated_identifiers() {
        let records = read_records_reader(">a\nAAAA\n>b\nCC\n>a\nGG\n".as_bytes()).unwrap();
        let pairs: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.identifier.as_str(), r.sequence.as_str()))
            .collect();
        assert_eq!(pairs, vec![(">a", "AAAA"), (">b", "CC"), (">a", "GG")]);
    }

    #[test]
    fn test_write_record_keeps_header_whitespace() {
        let record = SequenceRecord::new(">seq1\tplasmid  pX", "ACGT");

        let mut out = Vec::new();
        write_record(&mut out, &record).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, ">seq1\tplasmid  pX\nACGT\n");
        assert_eq!(parse_fasta_text(&text).get(">seq1\tplasmid  pX"), Some("ACGT"));
    }
}
