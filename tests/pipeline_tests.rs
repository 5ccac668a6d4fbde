//! End-to-end tests: mention JSON in, normalized chromosome variants out.

use mutnorm::{
    ChromVariant, InMemoryGenome, MemoryLookup, Normalizer, RsidRecord, Strand, Transcript,
};

fn cycled(n: usize) -> String {
    b"ACGT".iter().cycle().take(n).map(|&b| b as char).collect()
}

fn test_genome() -> InMemoryGenome {
    // chr1 carries an ATG start codon at 1-based 15..17.
    let mut chr1 = cycled(200).into_bytes();
    chr1[14..17].copy_from_slice(b"ATG");

    let mut genome = InMemoryGenome::new();
    genome.insert("chr1", String::from_utf8(chr1).unwrap());
    genome.insert("chr2", cycled(100));
    genome.insert("chrM", cycled(60));
    genome
}

fn test_lookup() -> MemoryLookup {
    let mut lookup = MemoryLookup::new();
    lookup.add_transcript(Transcript {
        name: "NM_FWD".to_string(),
        chrom: "chr1".to_string(),
        strand: Strand::Plus,
        tx_start: 10,
        tx_end: 70,
        cds_start: 14,
        cds_end: 60,
        exon_starts: vec![10, 30, 50],
        exon_ends: vec![20, 40, 70],
        gene_id: 1,
    });
    lookup.add_transcript(Transcript {
        name: "NM_REV".to_string(),
        chrom: "chr2".to_string(),
        strand: Strand::Minus,
        tx_start: 10,
        tx_end: 42,
        cds_start: 12,
        cds_end: 40,
        exon_starts: vec![10, 30],
        exon_ends: vec![20, 42],
        gene_id: 2,
    });
    lookup.add_gene_chrom(3, "MT");
    // rs123 maps the T at chr1:100.
    lookup.add_rsid(
        123,
        RsidRecord {
            chrom: "chr1".to_string(),
            start: 99,
            ref_allele: "T".to_string(),
            observed: "A/C".to_string(),
        },
    );
    // rs15 maps the first base of NM_FWD's start codon.
    lookup.add_rsid(
        15,
        RsidRecord {
            chrom: "chr1".to_string(),
            start: 14,
            ref_allele: "A".to_string(),
            observed: "C/G".to_string(),
        },
    );
    lookup
}

fn normalizer() -> Normalizer<InMemoryGenome, MemoryLookup, MemoryLookup> {
    let lookup = test_lookup();
    Normalizer::new(test_genome(), lookup.clone(), lookup)
}

#[test]
fn substitution_through_forward_transcript() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["c"],
                   "start": "1", "end": "1", "wild_type": "A", "mutant": "C"}"#;
    let out = n.to_vcf(&[1], json).unwrap();
    assert_eq!(
        out,
        vec![("NM_FWD".to_string(), ChromVariant::new("chr1", 15, "A", "C"))]
    );
}

#[test]
fn substitution_through_reverse_transcript() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["c"],
                   "start": "1", "end": "1", "wild_type": "A", "mutant": "G"}"#;
    let out = n.to_vcf(&[2], json).unwrap();
    assert_eq!(
        out,
        vec![("NM_REV".to_string(), ChromVariant::new("chr2", 40, "T", "C"))]
    );
}

#[test]
fn numeric_reference_is_a_deletion_length() {
    let n = normalizer();
    let json = r#"{"mut_type": "DEL", "seq_types": ["c"],
                   "start": "2", "end": "", "wild_type": "3", "mutant": ""}"#;
    let out = n.to_vcf(&[1], json).unwrap();
    assert_eq!(
        out,
        vec![(
            "NM_FWD".to_string(),
            ChromVariant::new("chr1", 15, "ATGC", "A")
        )]
    );
}

#[test]
fn insertion_is_left_anchored() {
    let n = normalizer();
    let json = r#"{"mut_type": "INS", "seq_types": ["c"],
                   "start": "1", "end": "", "wild_type": "", "mutant": "TT"}"#;
    let out = n.to_vcf(&[1], json).unwrap();
    assert_eq!(
        out,
        vec![(
            "NM_FWD".to_string(),
            ChromVariant::new("chr1", 15, "A", "ATT")
        )]
    );
}

#[test]
fn duplication_repeats_reference_span() {
    let n = normalizer();
    let json = r#"{"mut_type": "DUP", "seq_types": ["c"],
                   "start": "1", "end": "3"}"#;
    let out = n.to_vcf(&[1], json).unwrap();
    assert_eq!(
        out,
        vec![(
            "NM_FWD".to_string(),
            ChromVariant::new("chr1", 14, "C", "CATG")
        )]
    );
}

#[test]
fn intron_notation_resolves_through_reverse_transcript() {
    let n = normalizer();
    let json = r#"{"mut_type": "DEL", "seq_types": ["c"],
                   "start": "IVS1-5", "end": "IVS1-5"}"#;
    let out = n.to_vcf(&[2], json).unwrap();
    assert_eq!(
        out,
        vec![(
            "NM_REV".to_string(),
            ChromVariant::new("chr2", 24, "TA", "T")
        )]
    );
}

#[test]
fn protein_substitution_fans_out_over_codons() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["p"],
                   "start": "1", "wild_type": "M", "mutant": "L"}"#;
    let out = n.to_vcf(&[1], json).unwrap();
    assert_eq!(out.len(), 6);
    assert!(out.iter().all(|(name, _)| name == "NM_FWD"));

    let variants: Vec<&ChromVariant> = out.iter().map(|(_, v)| v).collect();
    assert!(variants.contains(&&ChromVariant::new("chr1", 15, "A", "C")));
    assert!(variants.contains(&&ChromVariant::new("chr1", 15, "A", "T")));
    assert!(variants.contains(&&ChromVariant::new("chr1", 15, "ATG", "CTA")));

    // Candidates are distinct.
    let unique: std::collections::HashSet<_> = variants.iter().collect();
    assert_eq!(unique.len(), 6);
}

#[test]
fn protein_reference_mismatch_yields_nothing() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["p"],
                   "start": "1", "wild_type": "P", "mutant": "L"}"#;
    assert!(n.to_vcf(&[1], json).unwrap().is_empty());
}

#[test]
fn rsid_mention_fans_out_over_observed_alleles() {
    let n = normalizer();
    let json = r#"{"mut_type": "RSID", "rsid": "rs123"}"#;
    let out = n.to_vcf(&[], json).unwrap();
    assert_eq!(
        out,
        vec![
            (String::new(), ChromVariant::new("chr1", 100, "T", "A")),
            (String::new(), ChromVariant::new("chr1", 100, "T", "C")),
        ]
    );
}

#[test]
fn rsid_intersection_keeps_corroborated_candidates() {
    let n = normalizer();
    // c.1A>C maps to chr1:15 A>C, which rs15 corroborates; c.1A>T would not.
    let json = r#"{"mut_type": "RSID+SUB", "seq_types": ["c"], "rsid": "rs15",
                   "start": "1", "end": "1", "wild_type": "A", "mutant": "C"}"#;
    let out = n.to_vcf(&[1], json).unwrap();
    assert_eq!(
        out,
        vec![("NM_FWD".to_string(), ChromVariant::new("chr1", 15, "A", "C"))]
    );

    let json = r#"{"mut_type": "RSID+SUB", "seq_types": ["c"], "rsid": "rs15",
                   "start": "1", "end": "1", "wild_type": "A", "mutant": "T"}"#;
    assert!(n.to_vcf(&[1], json).unwrap().is_empty());
}

#[test]
fn mitochondrial_gene_reroutes_cdna_mentions() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["c"],
                   "start": "5", "end": "5", "wild_type": "A", "mutant": "G"}"#;
    let out = n.to_vcf(&[3], json).unwrap();
    assert_eq!(
        out,
        vec![(
            "Mitochondrial".to_string(),
            ChromVariant::new("chrM", 5, "A", "G")
        )]
    );
}

#[test]
fn mitochondrial_seq_type_is_direct() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["m"],
                   "start": "5", "end": "5", "wild_type": "A", "mutant": "G"}"#;
    let out = n.to_vcf(&[], json).unwrap();
    assert_eq!(
        out,
        vec![(
            "Mitochondrial".to_string(),
            ChromVariant::new("chrM", 5, "A", "G")
        )]
    );
}

#[test]
fn vcf_passthrough_is_untouched() {
    let n = normalizer();
    // Deliberately non-minimal: passthrough records are trusted as-is.
    let json = r#"{"mut_type": "VCF", "chrom": "chr1",
                   "position": "3", "ref": "GT", "alt": "GC"}"#;
    let out = n.to_vcf(&[], json).unwrap();
    assert_eq!(
        out,
        vec![(String::new(), ChromVariant::new("chr1", 3, "GT", "GC"))]
    );
}

#[test]
fn uncertain_position_yields_nothing() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["c"],
                   "start": "1?", "end": "1?", "wild_type": "A", "mutant": "C"}"#;
    assert!(n.to_vcf(&[1], json).unwrap().is_empty());
}

#[test]
fn unknown_gene_yields_nothing() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["c"],
                   "start": "1", "end": "1", "wild_type": "A", "mutant": "C"}"#;
    assert!(n.to_vcf(&[99], json).unwrap().is_empty());
}

#[test]
fn reference_mismatch_drops_candidate() {
    let n = normalizer();
    let json = r#"{"mut_type": "SUB", "seq_types": ["c"],
                   "start": "1", "end": "1", "wild_type": "G", "mutant": "C"}"#;
    assert!(n.to_vcf(&[1], json).unwrap().is_empty());
}

#[test]
fn shared_prefix_is_trimmed_with_position_shift() {
    let genome = test_genome();
    let out = mutnorm::vcf::normalize(&genome, ChromVariant::new("chr1", 100, "ATG", "ATC"));
    assert_eq!(out, ChromVariant::new("chr1", 102, "G", "C"));
}

#[test]
fn pure_insertion_never_keeps_an_empty_ref() {
    let genome = test_genome();
    let out = mutnorm::vcf::normalize(&genome, ChromVariant::new("chr1", 50, "", "A"));
    assert!(!out.ref_allele.is_empty());
    assert!(out.alt_allele.len() > out.ref_allele.len());
}

#[test]
fn results_are_stable_under_renormalization() {
    let n = normalizer();
    let genome = test_genome();
    let json = r#"{"mut_type": "DEL", "seq_types": ["c"],
                   "start": "2", "end": "", "wild_type": "3", "mutant": ""}"#;
    for (_, var) in n.to_vcf(&[1], json).unwrap() {
        let again = mutnorm::vcf::normalize(&genome, var.clone());
        assert_eq!(var, again);
    }
}

#[test]
fn direct_conversion_entry_points() {
    use mutnorm::mention::{MutKind, RnaVariant};
    use mutnorm::Position;

    let n = normalizer();
    let var = RnaVariant {
        kind: MutKind::Sub,
        start: Position::new(1),
        end: Some(Position::new(1)),
        ref_allele: "A".to_string(),
        alt_allele: "C".to_string(),
        dup: 2,
    };
    let by_gene = n.gene_rna_to_chrom(1, &var);
    let by_refseq = n.refseq_rna_to_chrom("NM_FWD", &var);
    assert_eq!(by_gene, by_refseq);
    assert_eq!(by_gene[0].1, ChromVariant::new("chr1", 15, "A", "C"));
}
