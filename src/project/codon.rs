//! Codon translation tables and sequence helpers.
//!
//! Stop codons translate to `X`, and the three-letter forms `TER`, `STOP`
//! and the literal `*` all normalize to `X` as well, so stop-gain
//! substitutions compare cleanly against translated reference codons.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static CODON_TABLE: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    HashMap::from([
        ("TTT", 'F'), ("TTC", 'F'), ("TTA", 'L'), ("TTG", 'L'),
        ("TCT", 'S'), ("TCC", 'S'), ("TCA", 'S'), ("TCG", 'S'),
        ("TAT", 'Y'), ("TAC", 'Y'), ("TAA", 'X'), ("TAG", 'X'),
        ("TGT", 'C'), ("TGC", 'C'), ("TGA", 'X'), ("TGG", 'W'),
        ("CTT", 'L'), ("CTC", 'L'), ("CTA", 'L'), ("CTG", 'L'),
        ("CCT", 'P'), ("CCC", 'P'), ("CCA", 'P'), ("CCG", 'P'),
        ("CAT", 'H'), ("CAC", 'H'), ("CAA", 'Q'), ("CAG", 'Q'),
        ("CGT", 'R'), ("CGC", 'R'), ("CGA", 'R'), ("CGG", 'R'),
        ("ATT", 'I'), ("ATC", 'I'), ("ATA", 'I'), ("ATG", 'M'),
        ("ACT", 'T'), ("ACC", 'T'), ("ACA", 'T'), ("ACG", 'T'),
        ("AAT", 'N'), ("AAC", 'N'), ("AAA", 'K'), ("AAG", 'K'),
        ("AGT", 'S'), ("AGC", 'S'), ("AGA", 'R'), ("AGG", 'R'),
        ("GTT", 'V'), ("GTC", 'V'), ("GTA", 'V'), ("GTG", 'V'),
        ("GCT", 'A'), ("GCC", 'A'), ("GCA", 'A'), ("GCG", 'A'),
        ("GAT", 'D'), ("GAC", 'D'), ("GAA", 'E'), ("GAG", 'E'),
        ("GGT", 'G'), ("GGC", 'G'), ("GGA", 'G'), ("GGG", 'G'),
    ])
});

/// Reverse table: amino acid to every codon encoding it.
static BACK_TABLE: Lazy<HashMap<char, Vec<&'static str>>> = Lazy::new(|| {
    let mut back: HashMap<char, Vec<&'static str>> = HashMap::new();
    for (&codon, &aa) in CODON_TABLE.iter() {
        back.entry(aa).or_default().push(codon);
    }
    // Deterministic fan-out order.
    for codons in back.values_mut() {
        codons.sort_unstable();
    }
    back
});

static THREE_TO_ONE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("CYS", "C"), ("ASP", "D"), ("SER", "S"), ("GLN", "Q"), ("LYS", "K"),
        ("ILE", "I"), ("PRO", "P"), ("THR", "T"), ("PHE", "F"), ("ASN", "N"),
        ("GLY", "G"), ("HIS", "H"), ("LEU", "L"), ("ARG", "R"), ("TRP", "W"),
        ("ALA", "A"), ("VAL", "V"), ("GLU", "E"), ("TYR", "Y"), ("MET", "M"),
        ("TER", "X"), ("STOP", "X"), ("*", "X"),
    ])
});

/// Translate one codon to its single-letter amino acid, `None` for
/// anything that is not a valid codon.
pub fn translate(codon: &str) -> Option<char> {
    CODON_TABLE.get(codon).copied()
}

/// Every codon encoding the given amino acid, empty for unknown residues.
pub fn codons_for(aa: char) -> Vec<&'static str> {
    BACK_TABLE.get(&aa).cloned().unwrap_or_default()
}

/// Normalize a residue name to single-letter form. Already-single-letter
/// or unrecognized input passes through unchanged.
pub fn three_to_one(residue: &str) -> String {
    THREE_TO_ONE
        .get(residue)
        .map(|s| s.to_string())
        .unwrap_or_else(|| residue.to_string())
}

/// Reverse complement. Unknown bases become `N`; `-` gap markers are kept.
pub fn revcomp(seq: &str) -> String {
    seq.chars()
        .rev()
        .map(|c| match c {
            'A' => 'T',
            'C' => 'G',
            'G' => 'C',
            'T' => 'A',
            'N' => 'N',
            '-' => '-',
            _ => 'N',
        })
        .collect()
}
