use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::analysis::{run_analysis, AnalysisRequest, AnalysisResult};
use crate::cli::OutputFormat;
use crate::core::source::FastaSource;
use crate::parsing::fasta::is_fasta_file;

/// Longest sequence shown per region in text output
const TEXT_SEQUENCE_WIDTH: usize = 40;

#[derive(Args)]
pub struct FindArgs {
    /// Target genome (FASTA, optionally gzip compressed)
    #[arg(short, long, required = true)]
    pub target: PathBuf,

    /// One or more background genomes (FASTA, optionally gzip compressed)
    #[arg(short, long, required = true, num_args = 1..)]
    pub background: Vec<PathBuf>,

    /// K-mer size (must be at least 1)
    #[arg(short, long, default_value = "21", allow_negative_numbers = true)]
    pub kmer_size: i64,

    /// Analyse multi-contig files as-is instead of merging their contigs
    #[arg(long)]
    pub no_normalize: bool,

    /// Worker threads (0 = all available cores)
    #[arg(long, default_value = "0")]
    pub threads: usize,

    /// Drop regions made entirely of contig spacer N's
    #[arg(long)]
    pub drop_spacer_only: bool,
}

/// Execute find subcommand
///
/// # Errors
///
/// Returns an error if the k-mer size is invalid or the analysis cannot run.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FindArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    for path in std::iter::once(&args.target).chain(&args.background) {
        if !is_fasta_file(path) {
            warn!(
                "{} does not have a FASTA extension; reading it as FASTA anyway",
                path.display()
            );
        }
    }

    let request = AnalysisRequest {
        normalize: !args.no_normalize,
        threads: args.threads,
        drop_spacer_only: args.drop_spacer_only,
        ..AnalysisRequest::new(
            FastaSource::from_path(&args.target),
            args.background.iter().map(FastaSource::from_path).collect(),
            args.kmer_size,
        )
    };

    if verbose {
        eprintln!(
            "Comparing {} against {} background file(s) with k={}",
            args.target.display(),
            args.background.len(),
            args.kmer_size
        );
    }

    let result = run_analysis(&request)?;

    if verbose {
        for warning in &result.warnings {
            eprintln!("Warning: {warning}");
        }
    }

    match format {
        OutputFormat::Text => print_text_results(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Tsv => print_tsv_results(&result),
    }

    Ok(())
}

fn print_text_results(result: &AnalysisResult) {
    println!("Signature Analysis");
    println!("{}", "=".repeat(60));
    println!("{}", result.summary);

    if result.signatures.is_empty() {
        println!("\nNo unique signatures found.");
        return;
    }

    println!(
        "\n{:<24} {:>10} {:>10} {:>8}  Sequence",
        "ID", "Start", "End", "Length"
    );
    println!("{}", "-".repeat(60));

    for region in &result.signatures {
        println!(
            "{:<24} {:>10} {:>10} {:>8}  {}",
            truncate(&region.sequence_id, 24),
            region.start,
            region.end,
            region.length,
            truncate(&region.sequence, TEXT_SEQUENCE_WIDTH),
        );
    }
}

fn print_tsv_results(result: &AnalysisResult) {
    println!("sequence_id\tstart\tend\tlength\tsequence");
    for region in &result.signatures {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            region.sequence_id, region.start, region.end, region.length, region.sequence
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
