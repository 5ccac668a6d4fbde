//! Transcript models (UCSC refGene conventions).
//!
//! Coordinate conventions:
//!
//! | Field                    | Convention                                 |
//! |--------------------------|--------------------------------------------|
//! | `tx_start` / `tx_end`    | 0-based half-open, genomic order           |
//! | `cds_start` / `cds_end`  | 0-based half-open, genomic order           |
//! | `exon_starts`/`exon_ends`| 0-based half-open, ascending genomic order |
//!
//! All coordinate math downstream works in a *strand view*: on the plus
//! strand the view is the genomic layout as-is, on the minus strand exon
//! boundaries are reversed and shifted so that walking the view in index
//! order walks the transcript 5'→3'. See [`Transcript::strand_view`].

use serde::{Deserialize, Serialize};

/// Strand of a transcript relative to the reference genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// Signed multiplier for strand-aware arithmetic: `+1` or `-1`.
    pub fn factor(&self) -> i64 {
        match self {
            Strand::Plus => 1,
            Strand::Minus => -1,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// A transcript annotation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Accession, e.g. `NM_000546`.
    pub name: String,
    /// Chromosome the transcript is annotated on, e.g. `chr17`.
    pub chrom: String,
    pub strand: Strand,
    pub tx_start: i64,
    pub tx_end: i64,
    pub cds_start: i64,
    pub cds_end: i64,
    pub exon_starts: Vec<i64>,
    pub exon_ends: Vec<i64>,
    /// Entrez gene id this transcript belongs to.
    pub gene_id: i64,
}

/// Strand-ordered coordinate view of a transcript.
///
/// On the minus strand each boundary moves to the opposite array (an exon's
/// 5' edge in transcript order is its genomic *end*) and gains `+1` so the
/// same closed/open interval conventions hold when multiplied by the strand
/// factor.
#[derive(Debug, Clone, PartialEq)]
pub struct StrandView {
    pub exon_starts: Vec<i64>,
    pub exon_ends: Vec<i64>,
    pub cds_start: i64,
    pub cds_end: i64,
    pub tx_start: i64,
    pub tx_end: i64,
}

impl Transcript {
    /// A transcript with an empty CDS interval is non-coding.
    pub fn is_coding(&self) -> bool {
        self.cds_start != self.cds_end
    }

    /// Build the strand-ordered view used by all coordinate conversion.
    pub fn strand_view(&self) -> StrandView {
        match self.strand {
            Strand::Plus => StrandView {
                exon_starts: self.exon_starts.clone(),
                exon_ends: self.exon_ends.clone(),
                cds_start: self.cds_start,
                cds_end: self.cds_end,
                tx_start: self.tx_start,
                tx_end: self.tx_end,
            },
            Strand::Minus => StrandView {
                exon_starts: rev_p1(&self.exon_ends),
                exon_ends: rev_p1(&self.exon_starts),
                cds_start: self.cds_end + 1,
                cds_end: self.cds_start + 1,
                tx_start: self.tx_end + 1,
                tx_end: self.tx_start + 1,
            },
        }
    }
}

/// Reverse the array and shift every boundary by one.
fn rev_p1(xs: &[i64]) -> Vec<i64> {
    xs.iter().rev().map(|x| x + 1).collect()
}
