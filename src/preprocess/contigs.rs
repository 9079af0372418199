use std::io::{BufWriter, Write};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::sequence::SequenceRecord;
use crate::core::source::FastaSource;
use crate::parsing::fasta::{read_records, write_record};
use crate::parsing::ParseError;
use crate::preprocess::{SPACER_LENGTH, SPACER_SYMBOL};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Failed to read contigs: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to write merged contigs: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of normalizing a FASTA source
#[derive(Debug)]
pub enum Normalized<'a> {
    /// Zero or one record: the caller's source, no copy made
    Unchanged(&'a FastaSource),

    /// Two or more records merged into a new single-record source
    Merged { source: FastaSource, contigs: usize },

    /// Normalization failed; the caller's source, untouched
    Fallback {
        source: &'a FastaSource,
        reason: NormalizeError,
    },
}

impl Normalized<'_> {
    /// The source downstream stages should read
    #[must_use]
    pub fn source(&self) -> &FastaSource {
        match self {
            Self::Unchanged(source) | Self::Fallback { source, .. } => *source,
            Self::Merged { source, .. } => source,
        }
    }

    #[must_use]
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }

    #[must_use]
    pub fn diagnostic(&self) -> Option<&NormalizeError> {
        match self {
            Self::Fallback { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Merge a multi-contig source into a single record.
///
/// Never fails: on any error the original source is handed back unchanged,
/// with the error attached as a diagnostic.
pub fn normalize(source: &FastaSource) -> Normalized<'_> {
    match try_normalize(source) {
        Ok(Some((merged, contigs))) => Normalized::Merged {
            source: merged,
            contigs,
        },
        Ok(None) => {
            debug!("{source} already has at most one sequence; no changes needed");
            Normalized::Unchanged(source)
        }
        Err(reason) => {
            warn!("Error normalizing {source}: {reason}");
            Normalized::Fallback { source, reason }
        }
    }
}

fn try_normalize(source: &FastaSource) -> Result<Option<(FastaSource, usize)>, NormalizeError> {
    let records = read_records(source)?;
    let contigs = records.len();

    let Some(merged) = merge_records(records) else {
        return Ok(None);
    };

    info!("Merging {contigs} contigs from {source}");

    let merged_source = if source.is_in_memory() {
        let mut text = Vec::with_capacity(merged.len() + merged.identifier.len() + 64);
        write_record(&mut text, &merged)?;
        FastaSource::Text(String::from_utf8_lossy(&text).into_owned())
    } else {
        let mut temp = tempfile::Builder::new()
            .prefix("isignify-")
            .suffix(".fna")
            .tempfile()?;
        {
            let mut writer = BufWriter::new(&mut temp);
            write_record(&mut writer, &merged)?;
            writer.flush()?;
        }
        FastaSource::Temp(temp)
    };

    Ok(Some((merged_source, contigs)))
}

/// Join all records into one, separated by spacer runs.
///
/// Every record counts, including ones that repeat an earlier identifier.
/// Returns `None` when there is nothing to merge (zero or one record). The merged
/// record takes the first record's identifier verbatim.
pub fn merge_records(records: Vec<SequenceRecord>) -> Option<SequenceRecord> {
    if records.len() < 2 {
        return None;
    }

    let spacer = SPACER_SYMBOL.to_string().repeat(SPACER_LENGTH);
    let capacity = records.iter().map(SequenceRecord::len).sum::<usize>()
        + (records.len() - 1) * SPACER_LENGTH;

    let mut records = records.into_iter();
    let mut merged = records.next()?;
    merged.sequence.reserve(capacity - merged.len());

    for record in records {
        merged.sequence.push_str(&spacer);
        merged.sequence.push_str(&record.sequence);
    }

    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::fasta::{parse_or_empty, read_records_reader};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MULTI: &str = ">contig1\nAAAA\n>contig2\nCCCC\n>contig3\nGGGG";

    fn fasta_file(content: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(".fna").unwrap();
        temp.write_all(content.as_bytes()).unwrap();
        temp.flush().unwrap();
        temp
    }

    fn spacer() -> String {
        "N".repeat(SPACER_LENGTH)
    }

    fn records(text: &str) -> Vec<SequenceRecord> {
        read_records_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_single_contig_file_is_returned_as_is() {
        let temp = fasta_file(">seq1 single contig\nACGTACGT");
        let source = FastaSource::from_path(temp.path());

        let normalized = normalize(&source);

        assert!(matches!(normalized, Normalized::Unchanged(_)));
        assert!(std::ptr::eq(normalized.source(), &source));
    }

    #[test]
    fn test_multi_contig_file_is_merged() {
        let temp = fasta_file(MULTI);
        let source = FastaSource::from_path(temp.path());

        let normalized = normalize(&source);
        assert!(normalized.is_merged());
        assert!(!std::ptr::eq(normalized.source(), &source));

        let merged_path = normalized.source().location().unwrap().to_path_buf();
        assert_ne!(merged_path, temp.path());

        let content = std::fs::read_to_string(&merged_path).unwrap();
        assert_eq!(content.matches('>').count(), 1);
        assert_eq!(content.replace('\n', "").matches(&spacer()).count(), 2);

        let parsed = parse_or_empty(normalized.source());
        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed.get(">contig1"),
            Some(format!("AAAA{}CCCC{}GGGG", spacer(), spacer()).as_str())
        );

        // The merged file is removed with its source
        drop(normalized);
        assert!(!merged_path.exists());
    }

    #[test]
    fn test_in_memory_source_stays_in_memory() {
        let source = FastaSource::from_text(MULTI);

        let normalized = normalize(&source);
        let Normalized::Merged { source: merged, contigs } = &normalized else {
            panic!("expected a merged source");
        };
        assert_eq!(*contigs, 3);
        assert!(merged.is_in_memory());
    }

    #[test]
    fn test_merged_sequence_keeps_every_contig() {
        let originals = ["GATTACA", "", "TTTTCCCCGGGG", "A"];
        let text: String = originals
            .iter()
            .enumerate()
            .map(|(i, seq)| format!(">c{i} contig {i}\n{seq}\n"))
            .collect();

        let merged = merge_records(records(&text)).unwrap();

        assert_eq!(merged.identifier, ">c0 contig 0");
        for original in originals {
            assert!(merged.sequence.contains(original));
        }
        let placeholders = merged.sequence.chars().filter(|&c| c == SPACER_SYMBOL).count();
        assert_eq!(placeholders, (originals.len() - 1) * SPACER_LENGTH);
    }

    #[test]
    fn test_nothing_to_merge() {
        assert!(merge_records(Vec::new()).is_none());
        assert!(merge_records(records(">only\nACGT")).is_none());

        let empty = FastaSource::from_text("");
        assert!(std::ptr::eq(normalize(&empty).source(), &empty));
    }

    #[test]
    fn test_unreadable_source_falls_back() {
        let source = FastaSource::from_path("no/such/genome.fna");

        let normalized = normalize(&source);

        assert!(matches!(normalized, Normalized::Fallback { .. }));
        assert!(normalized.diagnostic().is_some());
        assert!(std::ptr::eq(normalized.source(), &source));
    }

    #[test]
    fn test_repeated_identifier_counts_as_separate_record() {
        let source = FastaSource::from_text(">a\nAAAA\n>a\nCCCC\n");

        let normalized = normalize(&source);
        let Normalized::Merged { contigs, .. } = &normalized else {
            panic!("expected both records to be merged");
        };
        assert_eq!(*contigs, 2);

        let parsed: Vec<(String, String)> = parse_or_empty(normalized.source())
            .iter()
            .map(|(id, seq)| (id.to_string(), seq.to_string()))
            .collect();
        assert_eq!(
            parsed,
            vec![(">a".to_string(), format!("AAAA{}CCCC", spacer()))]
        );
    }

    #[test]
    fn test_merged_header_whitespace_is_kept() {
        let temp = fasta_file(">seq1\tplasmid  pX\nACGT\n>seq2\nTTTT\n");
        let source = FastaSource::from_path(temp.path());

        let normalized = normalize(&source);
        assert!(normalized.is_merged());

        let parsed = parse_or_empty(normalized.source());
        let ids: Vec<&str> = parsed.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![">seq1\tplasmid  pX"]);
    }
}
