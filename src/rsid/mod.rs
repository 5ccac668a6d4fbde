//! dbSNP rsID resolution.

use crate::reference::genome::SequenceStore;
use crate::reference::lookup::RsidLookup;
use crate::vcf::{self, ChromVariant};

/// Parse an rsID name ("rs334") to its numeric id. Anything other than
/// `rs` followed by digits yields `None`.
pub fn parse_rsid(name: &str) -> Option<u64> {
    let digits = name.strip_prefix("rs").unwrap_or(name);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Resolve an rsID to normalized chromosome variants, one candidate per
/// observed alternate allele. dbSNP records deletions with `-` gap
/// markers, which are stripped; dbSNP starts are 0-based.
pub fn rsid_to_chrom(
    genome: &dyn SequenceStore,
    lookup: &dyn RsidLookup,
    name: &str,
) -> Vec<ChromVariant> {
    let id = match parse_rsid(name) {
        Some(id) => id,
        None => return Vec::new(),
    };

    let mut out = Vec::new();
    for record in lookup.variants_for_rsid(id) {
        let ref_allele = record.ref_allele.replace('-', "");
        for alt in record.observed.split('/') {
            let alt_allele = alt.replace('-', "");
            out.push(vcf::normalize(
                genome,
                ChromVariant::new(
                    record.chrom.clone(),
                    record.start + 1,
                    ref_allele.clone(),
                    alt_allele,
                ),
            ));
        }
    }
    out
}
