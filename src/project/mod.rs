//! Projection of parsed variants onto chromosome coordinates.
//!
//! Each projector resolves transcript-relative (or mitochondrial)
//! positions to 1-based chromosome positions, validates any claimed
//! reference allele against the genome, rewrites alleles per mutation
//! kind, and emits normalized [`ChromVariant`] candidates. Candidates
//! that fail to resolve or disagree with the reference are dropped with
//! a debug log, never an error.

pub mod codon;

use log::debug;

use crate::coords::{self, Position};
use crate::mention::{MtVariant, MutKind, ProteinVariant, RnaVariant};
use crate::reference::genome::SequenceStore;
use crate::reference::transcript::{Strand, Transcript};
use crate::vcf::{self, ChromVariant};

use self::codon::{codons_for, revcomp, three_to_one, translate};

fn resolve(tx: &Transcript, position: Position) -> Option<i64> {
    match coords::rna_to_chrom_pos(tx, position) {
        Some(cp) if cp > 0 => Some(cp),
        _ => None,
    }
}

/// Project a transcript-level variant onto its chromosome.
pub fn rna_to_chrom(
    genome: &dyn SequenceStore,
    tx: &Transcript,
    var: &RnaVariant,
) -> Vec<ChromVariant> {
    let mut start = var.start;
    let mut end = var.end.unwrap_or(var.start);
    let mut ref_allele = var.ref_allele.clone();
    let mut alt_allele = var.alt_allele.clone();

    if tx.strand == Strand::Minus {
        ref_allele = revcomp(&ref_allele);
        alt_allele = revcomp(&alt_allele);
        std::mem::swap(&mut start, &mut end);
    }

    // An insertion between start and end anchors at the genomic-left side.
    if var.kind == MutKind::Ins {
        start = end;
    }

    let (start_cp, end_cp) = match (resolve(tx, start), resolve(tx, end)) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            debug!("unresolvable position {} on {}", var.start, tx.name);
            return Vec::new();
        }
    };

    let ref_seq = genome.fetch(&tx.chrom, start_cp - 1, end_cp);

    if !ref_allele.is_empty() && ref_seq != ref_allele {
        debug!("{} != {} at {}", ref_seq, ref_allele, start_cp);
        return Vec::new();
    }

    match var.kind {
        MutKind::Del | MutKind::Indel => ref_allele = ref_seq.clone(),
        MutKind::Dup => {
            ref_allele = String::new();
            alt_allele = ref_seq.repeat((var.dup - 1).max(0) as usize);
        }
        _ => {}
    }

    vec![vcf::normalize(
        genome,
        ChromVariant::new(tx.chrom.clone(), start_cp, ref_allele, alt_allele),
    )]
}

/// Project a protein substitution onto its chromosome, fanning out over
/// every codon encoding the alternate residue.
pub fn protein_to_chrom(
    genome: &dyn SequenceStore,
    tx: &Transcript,
    var: &ProteinVariant,
) -> Vec<ChromVariant> {
    let ref_up = var.ref_aa.to_uppercase();
    let mut alt_up = var.alt_aa.to_uppercase();
    if alt_up == "=" {
        // Synonymous: same residue, possibly a different codon.
        alt_up = ref_up.clone();
    }
    let ref_aa = three_to_one(&ref_up);
    let alt_aa = three_to_one(&alt_up);

    // The first codon base in genome order; on the minus strand that is
    // the third base of the codon in transcript order.
    let codon_start = match tx.strand {
        Strand::Minus => Position::new(var.pos * 3),
        Strand::Plus => Position::new(var.pos * 3 - 2),
    };
    let chrom_pos = match resolve(tx, codon_start) {
        Some(cp) => cp,
        None => {
            debug!("unresolvable codon {} on {}", var.pos, tx.name);
            return Vec::new();
        }
    };

    // Genome-sense codon bases.
    let ref_seq = genome.fetch(&tx.chrom, chrom_pos - 1, chrom_pos + 2);
    if ref_seq.len() < 3 {
        debug!("codon {} out of range on {}", var.pos, tx.name);
        return Vec::new();
    }

    let tx_codon = match tx.strand {
        Strand::Minus => revcomp(&ref_seq),
        Strand::Plus => ref_seq.clone(),
    };
    let translated = translate(&tx_codon).map(|aa| aa.to_string());
    if translated.as_deref() != Some(ref_aa.as_str()) {
        debug!("{:?} != {} at codon {}", translated, ref_aa, var.pos);
        return Vec::new();
    }

    let mut alt_chars = alt_aa.chars();
    let alt_char = match (alt_chars.next(), alt_chars.next()) {
        (Some(c), None) => c,
        _ => return Vec::new(),
    };

    codons_for(alt_char)
        .into_iter()
        .map(|alt_codon| {
            let alt_seq = match tx.strand {
                Strand::Minus => revcomp(alt_codon),
                Strand::Plus => alt_codon.to_string(),
            };
            vcf::normalize(
                genome,
                ChromVariant::new(tx.chrom.clone(), chrom_pos, ref_seq.clone(), alt_seq),
            )
        })
        .collect()
}

/// Project a mitochondrial variant. Mitochondrial positions are already
/// chromosome positions on `chrM`, so no transcript is involved.
pub fn mt_to_chrom(genome: &dyn SequenceStore, var: &MtVariant) -> Vec<ChromVariant> {
    const MT_CHROM: &str = "chrM";

    let mut start = var.start;
    let end = var.end.unwrap_or(var.start);
    let mut ref_allele = var.ref_allele.clone();
    let mut alt_allele = var.alt_allele.clone();

    if var.kind == MutKind::Ins {
        start = end;
    }

    let ref_seq = genome.fetch(MT_CHROM, start - 1, end);

    if !ref_allele.is_empty() && ref_seq != ref_allele {
        debug!("{} != {} at {}", ref_seq, ref_allele, start);
        return Vec::new();
    }

    match var.kind {
        MutKind::Del | MutKind::Indel => ref_allele = ref_seq.clone(),
        MutKind::Dup => {
            ref_allele = String::new();
            alt_allele = ref_seq.repeat((var.dup - 1).max(0) as usize);
        }
        _ => {}
    }

    vec![vcf::normalize(
        genome,
        ChromVariant::new(MT_CHROM, start, ref_allele, alt_allele),
    )]
}
