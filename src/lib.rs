//! mutnorm: variant mention normalizer
//!
//! Converts gene/variant mentions mined from scientific papers into
//! canonical chromosome-level VCF tuples. The hard part is HGVS variant
//! normalization: mapping protein, RNA/cDNA, mitochondrial and rsID-based
//! descriptions onto exact genomic coordinates given a transcript's
//! exon/intron structure and a reference genome.
//!
//! # Example
//!
//! ```
//! use mutnorm::{ChromVariant, InMemoryGenome, MemoryLookup, Normalizer};
//!
//! let mut genome = InMemoryGenome::new();
//! genome.insert("chr1", "ACGTACGTACGTAC");
//!
//! let lookup = MemoryLookup::new();
//! let normalizer = Normalizer::new(genome, lookup.clone(), lookup);
//!
//! // A pre-resolved passthrough record flows straight through.
//! let json = r#"{"mut_type": "VCF", "chrom": "chr1",
//!                "position": "3", "ref": "G", "alt": "A"}"#;
//! let out = normalizer.to_vcf(&[], json).unwrap();
//! assert_eq!(out[0].1, ChromVariant::new("chr1", 3, "G", "A"));
//! ```

pub mod coords;
pub mod error;
pub mod mention;
pub mod normalizer;
pub mod project;
pub mod reference;
pub mod rsid;
pub mod vcf;

// Re-export commonly used types
pub use coords::Position;
pub use error::MutNormError;
pub use mention::{MentionRecord, MtVariant, MutKind, MutTag, ProteinVariant, RnaVariant};
pub use normalizer::Normalizer;
pub use reference::{
    IndexedGenome, InMemoryGenome, MemoryLookup, RsidLookup, RsidRecord, SequenceStore, Strand,
    Transcript, TranscriptLookup,
};
pub use rsid::parse_rsid;
pub use vcf::ChromVariant;

/// Result type alias for mutnorm operations
pub type Result<T> = std::result::Result<T, MutNormError>;
