use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use crate::core::source::FastaSource;
use crate::parsing::fasta::{read_fasta, write_record};
use crate::preprocess::{normalize, Normalized};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Input FASTA file (optionally gzip compressed)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output FASTA file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute normalize subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: NormalizeArgs, verbose: bool) -> anyhow::Result<()> {
    let source = FastaSource::from_path(&args.input);
    let normalized = normalize(&source);

    match &normalized {
        Normalized::Merged { contigs, .. } => {
            if verbose {
                eprintln!("Merged {contigs} contigs from {}", args.input.display());
            }
        }
        Normalized::Unchanged(_) => {
            if verbose {
                eprintln!("File already has one sequence; no changes needed.");
            }
        }
        Normalized::Fallback { reason, .. } => {
            anyhow::bail!("Could not normalize {}: {reason}", args.input.display());
        }
    }

    let records = read_fasta(normalized.source())?.into_records();

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    for record in &records {
        write_record(&mut writer, record)?;
    }
    writer.flush()?;

    Ok(())
}
