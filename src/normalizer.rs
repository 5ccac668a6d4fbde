//! Top-level driver tying the sequence store, annotation lookups and
//! projectors together.

use std::collections::HashSet;

use log::debug;

use crate::error::MutNormError;
use crate::mention::{self, MentionRecord, MutKind, MutTag, ProteinVariant, RnaVariant};
use crate::project;
use crate::reference::genome::SequenceStore;
use crate::reference::lookup::{RsidLookup, TranscriptLookup};
use crate::rsid;
use crate::vcf::ChromVariant;

/// Converts mention records to normalized chromosome variants.
///
/// Results are `(transcript_name, variant)` pairs: one mention can map
/// through several transcripts of a gene, and protein substitutions fan
/// out over codons, so a record yields zero or more candidates. rsID
/// candidates carry an empty transcript name, mitochondrial ones the
/// marker `"Mitochondrial"`.
pub struct Normalizer<S, T, R> {
    genome: S,
    transcripts: T,
    rsids: R,
}

impl<S, T, R> Normalizer<S, T, R>
where
    S: SequenceStore,
    T: TranscriptLookup,
    R: RsidLookup,
{
    pub fn new(genome: S, transcripts: T, rsids: R) -> Self {
        Normalizer {
            genome,
            transcripts,
            rsids,
        }
    }

    pub fn genome(&self) -> &S {
        &self.genome
    }

    /// Convert one mention JSON record. Fails only on malformed JSON;
    /// per-candidate conversion failures just shrink the result.
    pub fn to_vcf(
        &self,
        gene_ids: &[i64],
        var_json: &str,
    ) -> Result<Vec<(String, ChromVariant)>, MutNormError> {
        let record: MentionRecord = serde_json::from_str(var_json)?;
        Ok(self.to_vcf_record(gene_ids, &record))
    }

    /// Convert an already-deserialized mention record.
    pub fn to_vcf_record(
        &self,
        gene_ids: &[i64],
        record: &MentionRecord,
    ) -> Vec<(String, ChromVariant)> {
        let tag = match MutTag::parse(&record.mut_type) {
            Some(tag) => tag,
            None => {
                debug!("unknown mutation tag '{}'", record.mut_type);
                return Vec::new();
            }
        };

        // Pre-resolved records pass through untouched.
        if tag.kind == MutKind::Vcf {
            let pos: i64 = match record.position.parse() {
                Ok(pos) => pos,
                Err(_) => return Vec::new(),
            };
            return vec![(
                String::new(),
                ChromVariant::new(
                    record.chrom.clone(),
                    pos,
                    record.ref_allele.clone(),
                    record.alt.clone(),
                ),
            )];
        }

        if tag.intersect_rsid {
            // Keep only HGVS candidates corroborated by the rsID's own
            // dbSNP mappings.
            let rsid_set: HashSet<ChromVariant> =
                rsid::rsid_to_chrom(&self.genome, &self.rsids, &record.rsid)
                    .into_iter()
                    .collect();
            return self
                .hgvs_candidates(gene_ids, record, tag.kind)
                .into_iter()
                .filter(|(_, var)| rsid_set.contains(var))
                .collect();
        }

        if tag.kind == MutKind::Rsid {
            return self.to_vcf_rsid(&record.rsid);
        }

        self.hgvs_candidates(gene_ids, record, tag.kind)
    }

    fn hgvs_candidates(
        &self,
        gene_ids: &[i64],
        record: &MentionRecord,
        kind: MutKind,
    ) -> Vec<(String, ChromVariant)> {
        // Protein-level mentions are only supported for substitutions.
        if record.has_seq_type("p") && kind == MutKind::Sub {
            self.to_vcf_protein(gene_ids, record)
        } else if ["c", "n", "r"].iter().any(|t| record.has_seq_type(t)) {
            self.to_vcf_rna(gene_ids, record, true)
        } else if record.has_seq_type("m") {
            self.to_vcf_mt(record, true)
        } else {
            Vec::new()
        }
    }

    fn to_vcf_rsid(&self, name: &str) -> Vec<(String, ChromVariant)> {
        rsid::rsid_to_chrom(&self.genome, &self.rsids, name)
            .into_iter()
            .map(|var| (String::new(), var))
            .collect()
    }

    fn to_vcf_protein(
        &self,
        gene_ids: &[i64],
        record: &MentionRecord,
    ) -> Vec<(String, ChromVariant)> {
        let var = match mention::parse_protein_var(record) {
            Some(var) => var,
            None => return Vec::new(),
        };
        let mut out = Vec::new();
        for &gene_id in gene_ids {
            for tx in self.transcripts.transcripts_for_gene(gene_id) {
                debug!("{}", tx.name);
                for candidate in project::protein_to_chrom(&self.genome, &tx, &var) {
                    out.push((tx.name.clone(), candidate));
                }
            }
        }
        out
    }

    fn to_vcf_rna(
        &self,
        gene_ids: &[i64],
        record: &MentionRecord,
        fix: bool,
    ) -> Vec<(String, ChromVariant)> {
        let mut out = Vec::new();
        for &gene_id in gene_ids {
            // Mitochondrial genes use chromosome positions directly even
            // when the mention is written in cDNA style.
            if self.transcripts.chrom_for_gene(gene_id).as_deref() == Some("MT") {
                out.extend(self.to_vcf_mt(record, fix));
                return out;
            }
            for tx in self.transcripts.transcripts_for_gene(gene_id) {
                debug!("{}", tx.name);
                let var = match mention::parse_rna_var(&tx, record, fix) {
                    Some(var) => var,
                    None => continue,
                };
                for candidate in project::rna_to_chrom(&self.genome, &tx, &var) {
                    out.push((tx.name.clone(), candidate));
                }
            }
        }
        out
    }

    fn to_vcf_mt(&self, record: &MentionRecord, fix: bool) -> Vec<(String, ChromVariant)> {
        let var = match mention::parse_mt_var(record, fix) {
            Some(var) => var,
            None => return Vec::new(),
        };
        project::mt_to_chrom(&self.genome, &var)
            .into_iter()
            .map(|candidate| ("Mitochondrial".to_string(), candidate))
            .collect()
    }

    /// Convert a parsed transcript-level variant through every transcript
    /// of a gene.
    pub fn gene_rna_to_chrom(
        &self,
        gene_id: i64,
        var: &RnaVariant,
    ) -> Vec<(String, ChromVariant)> {
        self.rna_over_transcripts(self.transcripts.transcripts_for_gene(gene_id), var)
    }

    /// Convert a parsed transcript-level variant through every transcript
    /// with a RefSeq accession.
    pub fn refseq_rna_to_chrom(
        &self,
        refseq: &str,
        var: &RnaVariant,
    ) -> Vec<(String, ChromVariant)> {
        self.rna_over_transcripts(self.transcripts.transcripts_for_refseq(refseq), var)
    }

    /// Convert a protein substitution through every transcript of a gene.
    pub fn gene_protein_to_chrom(
        &self,
        gene_id: i64,
        var: &ProteinVariant,
    ) -> Vec<(String, ChromVariant)> {
        self.protein_over_transcripts(self.transcripts.transcripts_for_gene(gene_id), var)
    }

    /// Convert a protein substitution through every transcript with a
    /// RefSeq accession.
    pub fn refseq_protein_to_chrom(
        &self,
        refseq: &str,
        var: &ProteinVariant,
    ) -> Vec<(String, ChromVariant)> {
        self.protein_over_transcripts(self.transcripts.transcripts_for_refseq(refseq), var)
    }

    fn rna_over_transcripts(
        &self,
        transcripts: Vec<crate::reference::transcript::Transcript>,
        var: &RnaVariant,
    ) -> Vec<(String, ChromVariant)> {
        let mut out = Vec::new();
        for tx in transcripts {
            debug!("{}", tx.name);
            for candidate in project::rna_to_chrom(&self.genome, &tx, var) {
                out.push((tx.name.clone(), candidate));
            }
        }
        out
    }

    fn protein_over_transcripts(
        &self,
        transcripts: Vec<crate::reference::transcript::Transcript>,
        var: &ProteinVariant,
    ) -> Vec<(String, ChromVariant)> {
        let mut out = Vec::new();
        for tx in transcripts {
            debug!("{}", tx.name);
            for candidate in project::protein_to_chrom(&self.genome, &tx, var) {
                out.push((tx.name.clone(), candidate));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::genome::InMemoryGenome;
    use crate::reference::lookup::MemoryLookup;

    fn empty_normalizer() -> Normalizer<InMemoryGenome, MemoryLookup, MemoryLookup> {
        let lookup = MemoryLookup::new();
        Normalizer::new(InMemoryGenome::new(), lookup.clone(), lookup)
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let n = empty_normalizer();
        assert!(matches!(
            n.to_vcf(&[], "{not json"),
            Err(MutNormError::Json { .. })
        ));
    }

    #[test]
    fn test_unknown_tag_is_empty() {
        let n = empty_normalizer();
        let out = n.to_vcf(&[], r#"{"mut_type": "WAT"}"#).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_vcf_passthrough() {
        let n = empty_normalizer();
        let json = r#"{"mut_type": "VCF", "chrom": "chr9",
                       "position": "133748283", "ref": "C", "alt": "T"}"#;
        let out = n.to_vcf(&[], json).unwrap();
        assert_eq!(
            out,
            vec![(
                String::new(),
                ChromVariant::new("chr9", 133748283, "C", "T")
            )]
        );
    }

    #[test]
    fn test_vcf_passthrough_bad_position_is_empty() {
        let n = empty_normalizer();
        let json = r#"{"mut_type": "VCF", "chrom": "chr9",
                       "position": "abc", "ref": "C", "alt": "T"}"#;
        assert!(n.to_vcf(&[], json).unwrap().is_empty());
    }

    #[test]
    fn test_missing_seq_types_is_empty() {
        let n = empty_normalizer();
        let json = r#"{"mut_type": "SUB", "start": "5", "end": "5",
                       "wild_type": "A", "mutant": "G"}"#;
        assert!(n.to_vcf(&[1], json).unwrap().is_empty());
    }
}
