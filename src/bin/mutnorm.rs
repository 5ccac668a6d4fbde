//! mutnorm CLI
//!
//! Command-line access to the reference genome store and VCF-style
//! variant normalization.

use clap::{Parser, Subcommand};
use mutnorm::reference::genome::{IndexedGenome, InMemoryGenome, SequenceStore};
use mutnorm::vcf::{normalize, ChromVariant};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mutnorm")]
#[command(author, version, about = "Variant mention normalizer utilities")]
#[command(
    long_about = "Index and query reference genomes, and normalize chromosome variants.

Examples:
  mutnorm index hg19.fasta
  mutnorm fetch hg19.fasta chr17 7577120 7577140
  mutnorm normalize hg19.fasta chr17 7577121 '' G
  mutnorm normalize hg19.fasta chr17 7577121 AGG AG --format json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the byte-offset index for a FASTA file
    Index {
        /// Reference FASTA file
        fasta: PathBuf,

        /// Rebuild even if an index already exists
        #[arg(long)]
        force: bool,
    },

    /// Fetch a region of the reference (0-based half-open)
    Fetch {
        /// Reference FASTA file
        fasta: PathBuf,

        /// Chromosome name
        chrom: String,

        /// 0-based start
        start: i64,

        /// 0-based exclusive end
        end: i64,

        /// Load the whole FASTA into memory instead of using the index
        #[arg(long)]
        in_memory: bool,
    },

    /// Normalize one chromosome variant against the reference
    Normalize {
        /// Reference FASTA file
        fasta: PathBuf,

        /// Chromosome name
        chrom: String,

        /// 1-based position
        pos: i64,

        /// Reference allele (may be empty)
        #[arg(allow_hyphen_values = true)]
        ref_allele: String,

        /// Alternate allele (may be empty)
        #[arg(allow_hyphen_values = true)]
        alt_allele: String,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { fasta, force } => run_index(&fasta, force),
        Commands::Fetch {
            fasta,
            chrom,
            start,
            end,
            in_memory,
        } => run_fetch(&fasta, &chrom, start, end, in_memory),
        Commands::Normalize {
            fasta,
            chrom,
            pos,
            ref_allele,
            alt_allele,
            format,
        } => run_normalize(&fasta, &chrom, pos, &ref_allele, &alt_allele, &format),
    }
}

fn run_index(fasta: &PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let genome = if force {
        IndexedGenome::rebuild(fasta)?
    } else {
        IndexedGenome::open(fasta)?
    };
    let count = genome.chrom_names().count();
    println!(
        "indexed {} sequences into {}",
        count,
        genome.index_path().display()
    );
    Ok(())
}

fn run_fetch(
    fasta: &PathBuf,
    chrom: &str,
    start: i64,
    end: i64,
    in_memory: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sequence = if in_memory {
        InMemoryGenome::from_fasta(fasta)?.fetch(chrom, start, end)
    } else {
        IndexedGenome::open(fasta)?.fetch(chrom, start, end)
    };
    if sequence.is_empty() {
        eprintln!("Error: no sequence for {}:{}-{}", chrom, start, end);
        std::process::exit(1);
    }
    println!("{}", sequence);
    Ok(())
}

fn run_normalize(
    fasta: &PathBuf,
    chrom: &str,
    pos: i64,
    ref_allele: &str,
    alt_allele: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let genome = IndexedGenome::open(fasta)?;
    let out = normalize(
        &genome,
        ChromVariant::new(chrom, pos, ref_allele, alt_allele),
    );
    match format {
        "json" => println!("{}", serde_json::to_string(&out)?),
        _ => println!("{}\t{}\t{}\t{}", out.chrom, out.pos, out.ref_allele, out.alt_allele),
    }
    Ok(())
}
