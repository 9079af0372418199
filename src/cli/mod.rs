//! Command-line interface for isignify.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **find**: Find signature regions of a target genome against background genomes
//! - **normalize**: Merge a multi-contig FASTA file into a single sequence
//! - **serve**: Start the web interface
//!
//! ## Usage
//!
//! ```text
//! # Find signatures with k = 21
//! isignify find --target target.fna --background bg1.fna bg2.fna -k 21
//!
//! # JSON output for scripting
//! isignify find -t target.fna -b bg.fna -k 31 --format json
//!
//! # Merge contigs into one sequence
//! isignify normalize assembly.fna -o merged.fna
//!
//! # Start web UI
//! isignify serve --port 8000 --open
//! ```

use clap::{Parser, Subcommand};

pub mod find;
pub mod normalize;

#[derive(Parser)]
#[command(name = "isignify")]
#[command(version)]
#[command(about = "Find DNA signatures unique to a target genome")]
#[command(
    long_about = "isignify finds stretches of a target genome that are absent from a set of background genomes.\n\nEvery k-mer of the backgrounds is indexed; target positions whose k-mer is not in the index are merged into signature regions:\n- Multi-contig files are merged with 100-N spacers before comparison\n- Comparison is exact (no mismatches, no reverse complements)\n- Results are ordered by target sequence, then by position"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find signature regions unique to a target genome
    Find(find::FindArgs),

    /// Merge a multi-contig FASTA file into a single sequence
    Normalize(normalize::NormalizeArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
