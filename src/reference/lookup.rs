//! Annotation lookup seams.
//!
//! The pipeline never talks to a database directly: callers hand the
//! normalizer a [`TranscriptLookup`] and an [`RsidLookup`], and production
//! code wires those to whatever backend holds refGene/dbSNP data.
//! [`MemoryLookup`] is the in-memory implementation used by tests and small
//! batch runs.

use std::collections::HashMap;

use crate::reference::transcript::Transcript;

/// Source of transcript annotations.
pub trait TranscriptLookup {
    /// All transcripts annotated to an Entrez gene id.
    fn transcripts_for_gene(&self, gene_id: i64) -> Vec<Transcript>;

    /// All transcripts with a given RefSeq accession.
    fn transcripts_for_refseq(&self, name: &str) -> Vec<Transcript>;

    /// Chromosome a gene is annotated on (e.g. `"MT"` for mitochondrial
    /// genes), if known.
    fn chrom_for_gene(&self, gene_id: i64) -> Option<String>;
}

/// One dbSNP mapping for an rsID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsidRecord {
    pub chrom: String,
    /// 0-based start of the reference allele.
    pub start: i64,
    pub ref_allele: String,
    /// `/`-delimited observed alleles, possibly containing `-` gaps.
    pub observed: String,
}

/// Source of dbSNP rsID mappings.
pub trait RsidLookup {
    fn variants_for_rsid(&self, id: u64) -> Vec<RsidRecord>;
}

/// In-memory lookup over hand-assembled annotation data.
#[derive(Debug, Clone, Default)]
pub struct MemoryLookup {
    by_gene: HashMap<i64, Vec<Transcript>>,
    by_refseq: HashMap<String, Vec<Transcript>>,
    gene_chrom: HashMap<i64, String>,
    rsids: HashMap<u64, Vec<RsidRecord>>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transcript under both its gene id and its accession.
    pub fn add_transcript(&mut self, tx: Transcript) {
        self.by_gene.entry(tx.gene_id).or_default().push(tx.clone());
        self.by_refseq
            .entry(tx.name.clone())
            .or_default()
            .push(tx);
    }

    pub fn add_gene_chrom(&mut self, gene_id: i64, chrom: impl Into<String>) {
        self.gene_chrom.insert(gene_id, chrom.into());
    }

    pub fn add_rsid(&mut self, id: u64, record: RsidRecord) {
        self.rsids.entry(id).or_default().push(record);
    }
}

impl TranscriptLookup for MemoryLookup {
    fn transcripts_for_gene(&self, gene_id: i64) -> Vec<Transcript> {
        self.by_gene.get(&gene_id).cloned().unwrap_or_default()
    }

    fn transcripts_for_refseq(&self, name: &str) -> Vec<Transcript> {
        self.by_refseq.get(name).cloned().unwrap_or_default()
    }

    fn chrom_for_gene(&self, gene_id: i64) -> Option<String> {
        self.gene_chrom.get(&gene_id).cloned()
    }
}

impl RsidLookup for MemoryLookup {
    fn variants_for_rsid(&self, id: u64) -> Vec<RsidRecord> {
        self.rsids.get(&id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::transcript::Strand;

    fn sample_tx() -> Transcript {
        Transcript {
            name: "NM_0001".to_string(),
            chrom: "chr1".to_string(),
            strand: Strand::Plus,
            tx_start: 0,
            tx_end: 100,
            cds_start: 10,
            cds_end: 90,
            exon_starts: vec![0],
            exon_ends: vec![100],
            gene_id: 7,
        }
    }

    #[test]
    fn test_transcript_lookup() {
        let mut lookup = MemoryLookup::new();
        lookup.add_transcript(sample_tx());

        assert_eq!(lookup.transcripts_for_gene(7).len(), 1);
        assert_eq!(lookup.transcripts_for_refseq("NM_0001").len(), 1);
        assert!(lookup.transcripts_for_gene(8).is_empty());
        assert!(lookup.transcripts_for_refseq("NM_9999").is_empty());
    }

    #[test]
    fn test_gene_chrom() {
        let mut lookup = MemoryLookup::new();
        lookup.add_gene_chrom(4512, "MT");
        assert_eq!(lookup.chrom_for_gene(4512).as_deref(), Some("MT"));
        assert_eq!(lookup.chrom_for_gene(1), None);
    }

    #[test]
    fn test_rsid_lookup() {
        let mut lookup = MemoryLookup::new();
        lookup.add_rsid(
            123,
            RsidRecord {
                chrom: "chr1".to_string(),
                start: 99,
                ref_allele: "A".to_string(),
                observed: "T/C".to_string(),
            },
        );
        assert_eq!(lookup.variants_for_rsid(123).len(), 1);
        assert!(lookup.variants_for_rsid(124).is_empty());
    }
}
